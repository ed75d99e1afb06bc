use serde::{Deserialize, Serialize};

/// Outcome of the forensic analysis: who produced the audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "AI_GENERATED")]
    AiGenerated,
    #[serde(rename = "HUMAN")]
    Human,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiGenerated => "AI_GENERATED",
            Self::Human => "HUMAN",
        }
    }
}

/// Validated classification result relayed back to the caller.
///
/// `confidence` is only meaningful in `[0.0, 1.0]`; construction from model
/// output goes through the verdict parser, which enforces the range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub classification: Classification,
    pub confidence: f64,
    pub explanation: String,
}

impl Verdict {
    pub fn confidence_in_range(&self) -> bool {
        (0.0..=1.0).contains(&self.confidence)
    }
}
