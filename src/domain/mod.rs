mod audio_sample;
mod verdict;

pub use audio_sample::{
    AudioSample, AudioSampleError, DATA_URL_MARKER, DEFAULT_LANGUAGE, DEFAULT_MIME_TYPE,
};
pub use verdict::{Classification, Verdict};
