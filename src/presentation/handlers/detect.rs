use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::ports::{AudioClassifier, ClassifierError};
use crate::application::services::DetectionError;
use crate::presentation::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectRequest {
    pub audio: Option<String>,
    pub mime_type: Option<String>,
    pub language: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    fn tag(error: &str) -> Self {
        Self {
            error: error.to_string(),
            message: None,
            details: None,
        }
    }

    fn with_message(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: Some(message.into()),
            details: None,
        }
    }

    fn with_details(error: &str, details: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: None,
            details: Some(details.into()),
        }
    }
}

fn error_response(status: StatusCode, body: ErrorResponse) -> Response {
    (status, Json(body)).into_response()
}

/// Classifies a submitted audio clip as AI-generated or human.
///
/// Gate order: submission-key configuration, caller credential, provider-key
/// configuration, body shape. Only a fully validated request reaches the
/// external model, and the external call is the last thing that happens.
#[tracing::instrument(skip(state, headers, payload))]
pub async fn detect_handler<C>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    payload: Result<Json<DetectRequest>, JsonRejection>,
) -> Response
where
    C: AudioClassifier + 'static,
{
    let Some(expected_key) = state.settings.auth.submission_api_key.as_deref() else {
        tracing::error!("SUBMISSION_API_KEY is not configured");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::with_message("Server misconfigured", "SUBMISSION_API_KEY not set."),
        );
    };

    let caller_key = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    if caller_key != Some(expected_key) {
        tracing::warn!("Rejected request with missing or invalid api key");
        return error_response(
            StatusCode::UNAUTHORIZED,
            ErrorResponse::with_message(
                "Unauthorized",
                format!("Invalid or missing '{API_KEY_HEADER}' header."),
            ),
        );
    }

    if state.settings.gemini.api_key.is_none() {
        tracing::error!("GEMINI_API_KEY is not configured");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::with_message("Server misconfigured", "GEMINI_API_KEY not set."),
        );
    }

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejected request with unreadable body");
            return error_response(
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_message(
                    "Bad Request",
                    "Request body must be JSON: {\"audio\": \"<base64 or data-URL>\", \
                     \"mimeType\": \"...\", \"language\": \"...\"}.",
                ),
            );
        }
    };

    let Some(audio) = request.audio.filter(|a| !a.trim().is_empty()) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::with_message(
                "Bad Request",
                "Missing 'audio' field in request body (Base64 required).",
            ),
        );
    };

    match state
        .detection_service
        .detect(&audio, request.mime_type, request.language)
        .await
    {
        Ok(verdict) => (StatusCode::OK, Json(verdict)).into_response(),
        Err(DetectionError::InvalidSample(e)) => {
            error_response(StatusCode::BAD_REQUEST, ErrorResponse::with_message("Bad Request", e.to_string()))
        }
        Err(DetectionError::Classifier(ClassifierError::RateLimited)) => error_response(
            StatusCode::TOO_MANY_REQUESTS,
            ErrorResponse::tag("Service busy. Please try again in a few seconds."),
        ),
        Err(DetectionError::InvalidVerdict(e)) => {
            tracing::error!(error = %e, "Model returned unusable output");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_details("Model output invalid", e.to_string()),
            )
        }
        Err(DetectionError::Classifier(e)) => {
            tracing::error!(error = %e, "Classifier invocation failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_details("Internal Server Error", e.to_string()),
            )
        }
    }
}

pub async fn method_not_allowed_handler() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::tag("Method Not Allowed. Use POST.")),
    )
}
