//! Ollama API round-trips against a mock server.

use chrono::Utc;
use httpmock::prelude::*;
use ragkit_core::{Chunk, DocumentMetadata, ModelProvider, Provenance, RagError, ScoredChunk};
use ragkit_ollama::OllamaClient;
use serde_json::json;

fn scored_chunk(title: &str, content: &str) -> ScoredChunk {
    ScoredChunk {
        chunk: Chunk {
            id: "c1".to_string(),
            content: content.to_string(),
            embedding: None,
            metadata: DocumentMetadata {
                url: None,
                title: Some(title.to_string()),
                provenance: Provenance::Manual,
                created_at: Utc::now(),
                chunk_index: Some(0),
                total_chunks: Some(1),
            },
        },
        score: 0.9,
    }
}

#[tokio::test]
async fn embed_posts_the_trimmed_prompt() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/embeddings")
                .json_body(json!({"model": "nomic-embed-text", "prompt": "hello"}));
            then.status(200).json_body(json!({"embedding": [0.1, 0.2, 0.3]}));
        })
        .await;

    let client = OllamaClient::new(server.base_url());
    let embedding = client.embed("  hello  ").await.unwrap();

    assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
    mock.assert_async().await;
}

#[tokio::test]
async fn embed_batch_preserves_input_order() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/embed")
                .json_body(json!({"model": "nomic-embed-text", "input": ["first", "second"]}));
            then.status(200).json_body(json!({"embeddings": [[1.0, 0.0], [0.0, 1.0]]}));
        })
        .await;

    let client = OllamaClient::new(server.base_url());
    let embeddings = client.embed_batch(&["first", "second"]).await.unwrap();

    assert_eq!(embeddings, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    mock.assert_async().await;
}

#[tokio::test]
async fn embed_batch_rejects_a_count_mismatch() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embed");
            then.status(200).json_body(json!({"embeddings": [[1.0, 0.0]]}));
        })
        .await;

    let client = OllamaClient::new(server.base_url());
    let result = client.embed_batch(&["first", "second"]).await;

    assert!(matches!(
        result,
        Err(RagError::Provider { ref message, .. }) if message.contains("1 vectors for 2 inputs")
    ));
}

#[tokio::test]
async fn embed_batch_of_nothing_skips_the_network() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embed");
            then.status(200).json_body(json!({"embeddings": []}));
        })
        .await;

    let client = OllamaClient::new(server.base_url());
    let embeddings = client.embed_batch(&[]).await.unwrap();

    assert!(embeddings.is_empty());
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn generate_answer_sends_chat_messages_and_trims_the_reply() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/chat")
                .json_body_partial(r#"{"model": "qwen2.5:0.5b", "stream": false}"#);
            then.status(200).json_body(json!({
                "message": {"role": "assistant", "content": "  Chunking splits text.  "}
            }));
        })
        .await;

    let client = OllamaClient::new(server.base_url());
    let answer = client
        .generate_answer("what is chunking?", &[scored_chunk("guide.md", "chunking splits text")])
        .await
        .unwrap();

    assert_eq!(answer, "Chunking splits text.");
    mock.assert_async().await;
}

#[tokio::test]
async fn generate_answer_honours_custom_model_and_options() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat").json_body_partial(
                r#"{"model": "llama3.2", "options": {"temperature": 0.25, "num_predict": 512}}"#,
            );
            then.status(200).json_body(json!({"message": {"content": "ok"}}));
        })
        .await;

    let client = OllamaClient::new(server.base_url())
        .with_model("llama3.2")
        .with_temperature(0.25)
        .with_max_tokens(512);
    let answer = client.generate_answer("q", &[]).await.unwrap();

    assert_eq!(answer, "ok");
    mock.assert_async().await;
}

#[tokio::test]
async fn server_errors_map_to_provider_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embeddings");
            then.status(500).body("model not loaded");
        })
        .await;

    let client = OllamaClient::new(server.base_url());
    let result = client.embed("hello").await;

    assert!(matches!(
        result,
        Err(RagError::Provider { ref provider, ref message })
            if provider == "ollama" && message.contains("500") && message.contains("model not loaded")
    ));
}

#[tokio::test]
async fn availability_tracks_the_tags_endpoint() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/tags");
            then.status(200).json_body(json!({"models": []}));
        })
        .await;

    let client = OllamaClient::new(server.base_url());
    assert!(client.is_available().await);

    let unreachable = OllamaClient::new("http://127.0.0.1:1");
    assert!(!unreachable.is_available().await);
}

#[tokio::test]
async fn list_models_returns_model_names() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/tags");
            then.status(200).json_body(json!({
                "models": [
                    {"name": "qwen2.5:0.5b", "size": 397821319},
                    {"name": "nomic-embed-text", "size": 274302450}
                ]
            }));
        })
        .await;

    let client = OllamaClient::new(server.base_url());
    let models = client.list_models().await.unwrap();

    assert_eq!(models, vec!["qwen2.5:0.5b", "nomic-embed-text"]);
}
