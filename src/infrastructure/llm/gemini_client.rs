use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{AudioClassifier, ClassifierError};
use crate::application::services::output_excerpt;
use crate::domain::AudioSample;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-pro-preview";

const THINKING_BUDGET: u32 = 2048;
const RESPONSE_TOKEN_BUDGET: u32 = 4096;

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            api_key,
            base_url: base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        }
    }

    /// Schema descriptor sent alongside the prompt so the provider biases
    /// its generation toward the verdict shape. Enforcement is best-effort
    /// on the provider side; local validation still happens downstream.
    fn response_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "classification": { "type": "STRING", "enum": ["AI_GENERATED", "HUMAN"] },
                "confidence": { "type": "NUMBER" },
                "explanation": { "type": "STRING" }
            },
            "required": ["classification", "confidence", "explanation"]
        })
    }
}

#[async_trait]
impl AudioClassifier for GeminiClient {
    #[tracing::instrument(skip(self, sample, prompt), fields(model = %self.model))]
    async fn classify(
        &self,
        sample: &AudioSample,
        prompt: &str,
    ) -> Result<String, ClassifierError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": sample.mime_type, "data": sample.data } },
                    { "text": prompt }
                ]
            }],
            "generationConfig": {
                "thinkingConfig": { "thinkingBudget": THINKING_BUDGET },
                "maxOutputTokens": THINKING_BUDGET + RESPONSE_TOKEN_BUDGET,
                "temperature": 0.0,
                "responseMimeType": "application/json",
                "responseSchema": Self::response_schema()
            }
        });

        tracing::debug!(mime_type = %sample.mime_type, "Sending audio to Gemini generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassifierError::ApiRequestFailed(format!("request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            // Structured status first; substring match on the failure body
            // only as a fallback for quota errors reported under other codes.
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS || is_quota_failure(&text) {
                tracing::warn!(status = %status, "Gemini signalled rate limiting or quota exhaustion");
                return Err(ClassifierError::RateLimited);
            }
            return Err(ClassifierError::ApiRequestFailed(format!(
                "status {}: {}",
                status,
                output_excerpt(&text)
            )));
        }

        let completion: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::InvalidResponse(format!("json: {e}")))?;

        let text = completion
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ClassifierError::InvalidResponse("no candidate text in response".to_string())
            })?;

        Ok(text)
    }
}

fn is_quota_failure(body: &str) -> bool {
    let lowered = body.to_lowercase();
    lowered.contains("quota") || lowered.contains("resource_exhausted") || body.contains("429")
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}
