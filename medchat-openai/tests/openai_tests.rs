use httpmock::prelude::*;
use serde_json::json;

use medchat_core::{GenerationModel, GenerationRequest};
use medchat_openai::{OpenAiChat, OpenAiEmbeddings};
use medchat_rag::{EmbeddingProvider, RagError};

#[tokio::test]
async fn embed_cleans_newlines_and_restores_index_order() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/embeddings").json_body(json!({
                "model": "text-embedding-ada-002",
                "input": ["line one line two", "second text"]
            }));
            then.status(200).json_body(json!({
                "object": "list",
                "data": [
                    { "object": "embedding", "index": 1, "embedding": [0.4, 0.5] },
                    { "object": "embedding", "index": 0, "embedding": [0.1, 0.2] }
                ]
            }));
        })
        .await;

    let provider = OpenAiEmbeddings::new("test-key")
        .unwrap()
        .with_base_url(server.base_url());

    let vectors = provider
        .embed(&["line one\nline two", "second text"])
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(vectors, vec![vec![0.1, 0.2], vec![0.4, 0.5]]);
}

#[tokio::test]
async fn embed_empty_input_makes_no_http_call() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/embeddings");
            then.status(200).json_body(json!({ "data": [] }));
        })
        .await;

    let provider = OpenAiEmbeddings::new("test-key")
        .unwrap()
        .with_base_url(server.base_url());

    let vectors = provider.embed(&[]).await.unwrap();

    assert!(vectors.is_empty());
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn rate_limit_is_a_retryable_embedding_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/embeddings");
            then.status(429)
                .json_body(json!({ "error": { "message": "Rate limit reached" } }));
        })
        .await;

    let provider = OpenAiEmbeddings::new("test-key")
        .unwrap()
        .with_base_url(server.base_url());

    let err = provider.embed(&["text"]).await.unwrap_err();
    match err {
        RagError::Embedding { retryable, ref message, .. } => {
            assert!(retryable);
            assert!(message.contains("Rate limit reached"));
        }
        ref other => panic!("expected Embedding error, got {other:?}"),
    }
}

#[tokio::test]
async fn client_errors_are_permanent_embedding_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/embeddings");
            then.status(400)
                .json_body(json!({ "error": { "message": "Invalid input" } }));
        })
        .await;

    let provider = OpenAiEmbeddings::new("test-key")
        .unwrap()
        .with_base_url(server.base_url());

    let err = provider.embed(&["text"]).await.unwrap_err();
    assert!(!err.is_retryable());
}

#[test]
fn empty_api_key_is_rejected() {
    assert!(OpenAiEmbeddings::new("").is_err());
    assert!(OpenAiChat::new("").is_err());
}

#[tokio::test]
async fn chat_sends_system_and_user_messages() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions").json_body(json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    { "role": "system", "content": "You are a helpful medical assistant." },
                    { "role": "user", "content": "What are the visiting hours?" }
                ],
                "max_tokens": 1000,
                "temperature": 0.5
            }));
            then.status(200).json_body(json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "  Visiting hours are 9-5.  " } }
                ]
            }));
        })
        .await;

    let model = OpenAiChat::new("test-key")
        .unwrap()
        .with_base_url(server.base_url());

    let request = GenerationRequest::new("What are the visiting hours?")
        .with_system_prompt("You are a helpful medical assistant.")
        .with_temperature(0.5);
    let answer = model.generate(request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(answer, "Visiting hours are 9-5.");
}

#[tokio::test]
async fn chat_server_errors_are_retryable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(503).body("upstream unavailable");
        })
        .await;

    let model = OpenAiChat::new("test-key")
        .unwrap()
        .with_base_url(server.base_url());

    let err = model.generate(GenerationRequest::new("query")).await.unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn chat_without_choices_is_a_permanent_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(json!({ "choices": [] }));
        })
        .await;

    let model = OpenAiChat::new("test-key")
        .unwrap()
        .with_base_url(server.base_url());

    let err = model.generate(GenerationRequest::new("query")).await.unwrap_err();
    assert!(!err.is_retryable());
}
