use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use earshot::application::services::DetectionService;
use earshot::infrastructure::llm::GeminiClient;
use earshot::infrastructure::observability::{TracingConfig, init_tracing};
use earshot::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();

    init_tracing(TracingConfig::default(), settings.server.port);

    if settings.auth.submission_api_key.is_none() {
        tracing::warn!("SUBMISSION_API_KEY is not set; every request will be rejected");
    }
    if settings.gemini.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; every request will be rejected");
    }

    let classifier = Arc::new(GeminiClient::new(
        settings.gemini.api_key.clone().unwrap_or_default(),
        settings.gemini.base_url.clone(),
        Some(settings.gemini.model.clone()),
    ));
    let detection_service = Arc::new(DetectionService::new(classifier));

    let state = AppState {
        detection_service,
        settings: settings.clone(),
    };
    let router = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
