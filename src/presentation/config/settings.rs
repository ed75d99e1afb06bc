use crate::infrastructure::llm::DEFAULT_GEMINI_MODEL;

/// Process-wide configuration, read once at startup and immutable for the
/// process lifetime. Missing secrets are carried as `None` rather than
/// failing startup: every request then terminates with a misconfiguration
/// error, which keeps the fault observable at the HTTP boundary.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub auth: AuthSettings,
    pub gemini: GeminiSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Credential callers must present in the `x-api-key` header.
    pub submission_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub model: String,
    /// Override for tests pointing at an in-process mock server.
    pub base_url: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            server: ServerSettings {
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3000),
            },
            auth: AuthSettings {
                submission_api_key: non_empty_env("SUBMISSION_API_KEY"),
            },
            gemini: GeminiSettings {
                api_key: non_empty_env("GEMINI_API_KEY"),
                model: std::env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: non_empty_env("GEMINI_BASE_URL"),
            },
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
