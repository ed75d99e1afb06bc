mod detect;
mod health;

pub use detect::{
    API_KEY_HEADER, DetectRequest, ErrorResponse, detect_handler, method_not_allowed_handler,
};
pub use health::health_handler;
