use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Json, State};
use axum::response::IntoResponse;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use earshot::application::ports::{AudioClassifier, ClassifierError};
use earshot::domain::AudioSample;
use earshot::infrastructure::llm::GeminiClient;

const GENERATE_CONTENT_PATH: &str = "/v1beta/models/gemini-test:generateContent";

async fn start_mock_gemini_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        GENERATE_CONTENT_PATH,
        post(move || async move {
            let status = axum::http::StatusCode::from_u16(response_status).unwrap();
            (status, response_body).into_response()
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

fn test_client(base_url: &str) -> GeminiClient {
    GeminiClient::new(
        "test-key".to_string(),
        Some(base_url.to_string()),
        Some("gemini-test".to_string()),
    )
}

fn test_sample() -> AudioSample {
    AudioSample::new("AAAA", Some("audio/mp3".to_string()), None).unwrap()
}

#[tokio::test]
async fn given_valid_completion_when_classifying_then_returns_candidate_text() {
    let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"classification\":\"HUMAN\",\"confidence\":0.8,\"explanation\":\"breaths\"}"}]}}]}"#;
    let (base_url, shutdown_tx) = start_mock_gemini_server(200, body).await;

    let client = test_client(&base_url);
    let result = client.classify(&test_sample(), "analyze this").await;

    assert!(result.is_ok());
    assert!(result.unwrap().contains("\"classification\":\"HUMAN\""));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_multiple_text_parts_when_classifying_then_parts_are_joined() {
    let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"classification\":"},{"text":"\"HUMAN\"}"}]}}]}"#;
    let (base_url, shutdown_tx) = start_mock_gemini_server(200, body).await;

    let client = test_client(&base_url);
    let result = client.classify(&test_sample(), "analyze this").await;

    assert_eq!(result.unwrap(), r#"{"classification":"HUMAN"}"#);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_http_429_when_classifying_then_returns_rate_limited() {
    let body = r#"{"error":{"code":429,"message":"Resource has been exhausted"}}"#;
    let (base_url, shutdown_tx) = start_mock_gemini_server(429, body).await;

    let client = test_client(&base_url);
    let result = client.classify(&test_sample(), "analyze this").await;

    assert!(matches!(result, Err(ClassifierError::RateLimited)));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_quota_failure_under_other_status_when_classifying_then_returns_rate_limited() {
    let body = r#"{"error":{"code":403,"status":"RESOURCE_EXHAUSTED","message":"Quota exceeded for requests"}}"#;
    let (base_url, shutdown_tx) = start_mock_gemini_server(403, body).await;

    let client = test_client(&base_url);
    let result = client.classify(&test_sample(), "analyze this").await;

    assert!(matches!(result, Err(ClassifierError::RateLimited)));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unrelated_provider_error_when_classifying_then_returns_api_request_failed() {
    let body = r#"{"error":{"code":400,"message":"Invalid audio payload"}}"#;
    let (base_url, shutdown_tx) = start_mock_gemini_server(400, body).await;

    let client = test_client(&base_url);
    let result = client.classify(&test_sample(), "analyze this").await;

    match result {
        Err(ClassifierError::ApiRequestFailed(message)) => {
            assert!(message.contains("400"));
        }
        other => panic!("expected ApiRequestFailed, got {:?}", other.map(|_| ())),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_empty_candidates_when_classifying_then_returns_invalid_response() {
    let body = r#"{"candidates":[]}"#;
    let (base_url, shutdown_tx) = start_mock_gemini_server(200, body).await;

    let client = test_client(&base_url);
    let result = client.classify(&test_sample(), "analyze this").await;

    assert!(matches!(result, Err(ClassifierError::InvalidResponse(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_any_request_when_classifying_then_wire_format_carries_audio_and_schema() {
    let captured: Arc<Mutex<Option<serde_json::Value>>> = Arc::new(Mutex::new(None));
    let captured_in_handler = Arc::clone(&captured);

    let app = Router::new()
        .route(
            GENERATE_CONTENT_PATH,
            post(
                |State(captured): State<Arc<Mutex<Option<serde_json::Value>>>>,
                 Json(body): Json<serde_json::Value>| async move {
                    *captured.lock().unwrap() = Some(body);
                    Json(serde_json::json!({
                        "candidates": [{"content": {"parts": [{"text":
                            "{\"classification\":\"HUMAN\",\"confidence\":0.5,\"explanation\":\"ok\"}"
                        }]}}]
                    }))
                },
            ),
        )
        .with_state(captured_in_handler);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    let client = test_client(&base_url);
    let sample = AudioSample::new(
        "data:audio/mp3;base64,QUJD",
        Some("audio/mp3".to_string()),
        None,
    )
    .unwrap();
    client.classify(&sample, "the prompt").await.unwrap();

    let body = captured.lock().unwrap().clone().unwrap();
    let parts = &body["contents"][0]["parts"];
    assert_eq!(parts[0]["inlineData"]["mimeType"], "audio/mp3");
    assert_eq!(parts[0]["inlineData"]["data"], "QUJD");
    assert_eq!(parts[1]["text"], "the prompt");

    let config = &body["generationConfig"];
    assert_eq!(config["responseMimeType"], "application/json");
    assert_eq!(config["temperature"], 0.0);
    assert_eq!(
        config["responseSchema"]["properties"]["classification"]["enum"],
        serde_json::json!(["AI_GENERATED", "HUMAN"])
    );
    assert_eq!(config["thinkingConfig"]["thinkingBudget"], 2048);
    assert_eq!(config["maxOutputTokens"], 6144);
}
