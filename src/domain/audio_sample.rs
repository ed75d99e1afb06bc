/// Marker that terminates a data-URL header, e.g. `data:audio/mp3;base64,`.
pub const DATA_URL_MARKER: &str = "base64,";

pub const DEFAULT_MIME_TYPE: &str = "audio/*";
pub const DEFAULT_LANGUAGE: &str = "English";

/// Normalized audio submission: base64 payload with any data-URL header
/// stripped, plus the MIME type and spoken language to analyze against.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSample {
    pub data: String,
    pub mime_type: String,
    pub language: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AudioSampleError {
    #[error("audio payload is empty after normalization")]
    EmptyPayload,
}

impl AudioSample {
    /// Builds a sample from the raw submission fields.
    ///
    /// Everything up to and including the literal `base64,` marker is
    /// discarded; a payload without the marker is used unmodified. Empty
    /// MIME type or language fall back to the defaults.
    pub fn new(
        raw_audio: &str,
        mime_type: Option<String>,
        language: Option<String>,
    ) -> Result<Self, AudioSampleError> {
        let data = match raw_audio.find(DATA_URL_MARKER) {
            Some(idx) => &raw_audio[idx + DATA_URL_MARKER.len()..],
            None => raw_audio,
        };

        if data.trim().is_empty() {
            return Err(AudioSampleError::EmptyPayload);
        }

        Ok(Self {
            data: data.to_string(),
            mime_type: mime_type
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
            language: language
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        })
    }
}
