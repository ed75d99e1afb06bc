use async_trait::async_trait;

use crate::domain::AudioSample;

/// Port to the external generative model performing the actual audio
/// forensics. Implementations return the raw model output text; recovery
/// of a structured verdict from it is the caller's job.
#[async_trait]
pub trait AudioClassifier: Send + Sync {
    async fn classify(&self, sample: &AudioSample, prompt: &str)
        -> Result<String, ClassifierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    /// The provider signalled rate limiting or quota exhaustion. Transient;
    /// the caller may retry shortly.
    #[error("rate limited by provider")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
