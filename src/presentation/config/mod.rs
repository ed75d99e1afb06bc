mod settings;

pub use settings::{AuthSettings, GeminiSettings, ServerSettings, Settings};
