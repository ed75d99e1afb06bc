use crate::domain::Verdict;

const MAX_EXCERPT_LENGTH: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum VerdictParseError {
    #[error("no json object in model output: {excerpt}")]
    NoJsonObject { excerpt: String },
    #[error("model output failed schema validation: {excerpt}")]
    SchemaViolation { excerpt: String },
    #[error("confidence {confidence} outside [0.0, 1.0]: {excerpt}")]
    ConfidenceOutOfRange { confidence: f64, excerpt: String },
}

/// Recovers a [`Verdict`] from raw model output.
///
/// The provider is asked for schema-constrained JSON, but that is a bias
/// rather than a guarantee: the text may arrive wrapped in prose or code
/// fences, truncated, or shaped wrong. Recovery is two-stage: a direct
/// parse first, then a parse of the substring between the first `{` and
/// the last `}` inclusive. Whatever parses must still carry all three
/// verdict fields, an in-enum classification, and an in-range confidence.
///
/// Errors embed a bounded excerpt of the raw output, never the whole text.
pub fn parse_verdict(raw: &str) -> Result<Verdict, VerdictParseError> {
    let verdict = match serde_json::from_str::<Verdict>(raw) {
        Ok(verdict) => verdict,
        Err(_) => parse_embedded_object(raw)?,
    };

    if !verdict.confidence_in_range() {
        return Err(VerdictParseError::ConfidenceOutOfRange {
            confidence: verdict.confidence,
            excerpt: output_excerpt(raw),
        });
    }

    Ok(verdict)
}

fn parse_embedded_object(raw: &str) -> Result<Verdict, VerdictParseError> {
    let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
        return Err(VerdictParseError::NoJsonObject {
            excerpt: output_excerpt(raw),
        });
    };
    if end < start {
        return Err(VerdictParseError::NoJsonObject {
            excerpt: output_excerpt(raw),
        });
    }

    serde_json::from_str::<Verdict>(&raw[start..=end]).map_err(|_| {
        VerdictParseError::SchemaViolation {
            excerpt: output_excerpt(raw),
        }
    })
}

/// Truncates raw model output for safe inclusion in logs and error
/// payloads. Counts characters, not bytes, so multibyte output never
/// splits mid-character.
pub fn output_excerpt(raw: &str) -> String {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total_chars = trimmed.chars().count();
    if total_chars > MAX_EXCERPT_LENGTH {
        let visible: String = trimmed.chars().take(MAX_EXCERPT_LENGTH).collect();
        format!("{}... ({} chars total)", visible, total_chars)
    } else {
        trimmed.to_string()
    }
}
