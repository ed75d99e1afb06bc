use std::sync::Arc;

use crate::application::ports::{AudioClassifier, ClassifierError};
use crate::domain::{AudioSample, AudioSampleError, Verdict};

use super::verdict_parser::{VerdictParseError, parse_verdict};

pub struct DetectionService<C>
where
    C: AudioClassifier,
{
    classifier: Arc<C>,
}

impl<C> DetectionService<C>
where
    C: AudioClassifier,
{
    pub fn new(classifier: Arc<C>) -> Self {
        Self { classifier }
    }

    /// Runs one classification round-trip: normalize the submission, build
    /// the evaluation prompt, invoke the model once, and recover a
    /// validated verdict from whatever text came back. No retries; every
    /// failure is terminal for this request.
    pub async fn detect(
        &self,
        raw_audio: &str,
        mime_type: Option<String>,
        language: Option<String>,
    ) -> Result<Verdict, DetectionError> {
        let sample = AudioSample::new(raw_audio, mime_type, language)?;
        let prompt = evaluation_prompt(&sample.language);

        tracing::debug!(
            mime_type = %sample.mime_type,
            language = %sample.language,
            payload_chars = sample.data.len(),
            "Submitting audio for classification"
        );

        let raw_output = self.classifier.classify(&sample, &prompt).await?;
        let verdict = parse_verdict(&raw_output)?;

        tracing::info!(
            classification = verdict.classification.as_str(),
            confidence = verdict.confidence,
            "Audio classification complete"
        );

        Ok(verdict)
    }
}

/// Fixed audio-forensics prompt, parameterized only by the spoken language.
pub fn evaluation_prompt(language: &str) -> String {
    format!(
        "\
You are a specialized Audio Forensics AI participating in a Deepfake Detection Challenge.

TARGET: Classify the input audio as either 'AI_GENERATED' or 'HUMAN'.
LANGUAGE: {language}

EVALUATION CRITERIA:
1. Breath & Pauses: Real humans breathe. AI often forgets to breathe or places breaths unnaturally.
2. Prosody & Intonation: Human speech has irregular pitch curves. AI often produces flat or cyclic pitch patterns.
3. Spectral Artifacts: Metallic ringing, phasing, high-frequency buzz typical of vocoders.
4. Micro-details: Lip smacks, tongue clicks, throat clearing indicate HUMAN speech.
5. Background: Absolute digital silence between words can indicate AI_GENERATED.

OUTPUT: Return ONLY JSON with:
classification: \"AI_GENERATED\" or \"HUMAN\"
confidence: number between 0.0 and 1.0
explanation: short technical explanation"
    )
}

#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("{0}")]
    InvalidSample(#[from] AudioSampleError),
    #[error("classifier: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("verdict: {0}")]
    InvalidVerdict(#[from] VerdictParseError),
}
