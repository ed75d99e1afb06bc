use earshot::domain::{Classification, Verdict};

#[test]
fn given_verdict_when_serialized_then_uses_wire_enum_names() {
    let verdict = Verdict {
        classification: Classification::AiGenerated,
        confidence: 0.6,
        explanation: "flat prosody".to_string(),
    };

    let json = serde_json::to_value(&verdict).unwrap();

    assert_eq!(json["classification"], "AI_GENERATED");
    assert_eq!(json["confidence"], 0.6);
    assert_eq!(json["explanation"], "flat prosody");
}

#[test]
fn given_out_of_range_confidence_when_checked_then_flagged() {
    let verdict = Verdict {
        classification: Classification::Human,
        confidence: 1.4,
        explanation: "overconfident".to_string(),
    };

    assert!(!verdict.confidence_in_range());
}

#[test]
fn given_boundary_confidences_when_checked_then_accepted() {
    for confidence in [0.0, 1.0] {
        let verdict = Verdict {
            classification: Classification::Human,
            confidence,
            explanation: "boundary".to_string(),
        };
        assert!(verdict.confidence_in_range());
    }
}
