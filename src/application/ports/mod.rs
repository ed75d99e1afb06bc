mod audio_classifier;

pub use audio_classifier::{AudioClassifier, ClassifierError};
