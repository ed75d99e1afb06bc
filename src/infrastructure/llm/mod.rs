mod gemini_client;

pub use gemini_client::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, GeminiClient};
