use medchat_core::error::CoreError;
use medchat_core::model::{
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GenerationModel, GenerationRequest, MockModel,
};

#[test]
fn request_defaults_match_service_configuration() {
    let request = GenerationRequest::new("What medications is the patient on?");
    assert_eq!(request.max_tokens, DEFAULT_MAX_TOKENS);
    assert_eq!(request.temperature, DEFAULT_TEMPERATURE);
    assert!(request.system_prompt.is_none());
}

#[test]
fn request_builder_overrides_apply() {
    let request = GenerationRequest::new("query")
        .with_system_prompt("You are a helpful medical assistant.")
        .with_max_tokens(256)
        .with_temperature(0.0);
    assert_eq!(
        request.system_prompt.as_deref(),
        Some("You are a helpful medical assistant.")
    );
    assert_eq!(request.max_tokens, 256);
    assert_eq!(request.temperature, 0.0);
}

#[tokio::test]
async fn mock_model_is_deterministic() {
    let model = MockModel;
    let a = model
        .generate(GenerationRequest::new("test query"))
        .await
        .unwrap();
    let b = model
        .generate(GenerationRequest::new("test query"))
        .await
        .unwrap();
    assert_eq!(a, b);
    assert!(a.contains("test query"));
}

#[tokio::test]
async fn mock_model_notes_attached_context() {
    let model = MockModel;
    let with_context = model
        .generate(GenerationRequest::new("q").with_system_prompt("context block"))
        .await
        .unwrap();
    let without_context = model.generate(GenerationRequest::new("q")).await.unwrap();
    assert_ne!(with_context, without_context);
}

#[test]
fn model_error_retryable_flag_is_surfaced() {
    let transient = CoreError::Model {
        provider: "openai".into(),
        message: "rate limited".into(),
        retryable: true,
    };
    let permanent = CoreError::Model {
        provider: "openai".into(),
        message: "invalid request".into(),
        retryable: false,
    };
    assert!(transient.is_retryable());
    assert!(!permanent.is_retryable());
}
