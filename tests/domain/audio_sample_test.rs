use earshot::domain::{AudioSample, AudioSampleError, DEFAULT_LANGUAGE, DEFAULT_MIME_TYPE};

#[test]
fn given_data_url_audio_when_normalizing_then_prefix_is_stripped() {
    let sample = AudioSample::new("data:audio/mp3;base64,AAAA", None, None).unwrap();

    assert_eq!(sample.data, "AAAA");
}

#[test]
fn given_raw_base64_audio_when_normalizing_then_payload_is_unchanged() {
    let sample = AudioSample::new("AAAA", None, None).unwrap();

    assert_eq!(sample.data, "AAAA");
}

#[test]
fn given_no_mime_or_language_when_normalizing_then_defaults_apply() {
    let sample = AudioSample::new("AAAA", None, None).unwrap();

    assert_eq!(sample.mime_type, DEFAULT_MIME_TYPE);
    assert_eq!(sample.language, DEFAULT_LANGUAGE);
}

#[test]
fn given_empty_mime_and_language_when_normalizing_then_defaults_apply() {
    let sample = AudioSample::new("AAAA", Some(String::new()), Some(String::new())).unwrap();

    assert_eq!(sample.mime_type, DEFAULT_MIME_TYPE);
    assert_eq!(sample.language, DEFAULT_LANGUAGE);
}

#[test]
fn given_explicit_mime_and_language_when_normalizing_then_they_are_kept() {
    let sample = AudioSample::new(
        "AAAA",
        Some("audio/wav".to_string()),
        Some("Japanese".to_string()),
    )
    .unwrap();

    assert_eq!(sample.mime_type, "audio/wav");
    assert_eq!(sample.language, "Japanese");
}

#[test]
fn given_data_url_with_empty_payload_when_normalizing_then_returns_empty_error() {
    let result = AudioSample::new("data:audio/mp3;base64,", None, None);

    assert!(matches!(result, Err(AudioSampleError::EmptyPayload)));
}

#[test]
fn given_whitespace_only_audio_when_normalizing_then_returns_empty_error() {
    let result = AudioSample::new("   ", None, None);

    assert!(matches!(result, Err(AudioSampleError::EmptyPayload)));
}
