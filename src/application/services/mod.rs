mod detection_service;
mod verdict_parser;

pub use detection_service::{DetectionError, DetectionService, evaluation_prompt};
pub use verdict_parser::{VerdictParseError, output_excerpt, parse_verdict};
