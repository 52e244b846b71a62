//! # Retrieval Persona Tests
//!
//! End-to-end tests for the retrieval persona: the latest user message is
//! embedded, the vector index is queried and the passages that carry text are
//! inserted into the system prompt before generation.

mod common;

use anyhow::Result;
use common::{sse_body, test_embedding, TestApp, EMBEDDING_KEY, PINECONE_KEY};
use httpmock::Method;
use serde_json::{json, Value};

#[tokio::test]
async fn test_retrieval_flow_end_to_end() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;

    let embeddings_mock = app.mock_server.mock(|when, then| {
        when.method(Method::POST)
            .path("/v1/embeddings")
            .header("Authorization", format!("Bearer {EMBEDDING_KEY}"))
            .json_body_partial(r#"{ "model": "mock-embedding-model", "input": "推荐点番" }"#);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({ "data": [{ "embedding": test_embedding() }] }));
    });

    let pinecone_mock = app.mock_server.mock(|when, then| {
        when.method(Method::POST)
            .path("/query")
            .header("Api-Key", PINECONE_KEY)
            .json_body_partial(r#"{ "topK": 15, "includeMetadata": true }"#);
        then.status(200).json_body(json!({
            "matches": [
                { "id": "m1", "score": 0.93, "metadata": { "text": "蛋子：看孤独摇滚" } },
                { "id": "m2", "score": 0.90, "metadata": { "speaker": "dan" } },
                { "id": "m3", "score": 0.88, "metadata": { "text": "蛋子：mygo闹麻了" } }
            ]
        }));
    });

    let chat_mock = app.mock_server.mock(|when, then| {
        when.method(Method::POST)
            .path("/chat/completions")
            .json_body_partial(r#"{ "max_tokens": 200, "stream": true }"#)
            .body_contains("与当前话题最相关的群聊记录：\\n蛋子：看孤独摇滚\\n蛋子：mygo闹麻了");
        then.status(200).body(sse_body(&["看", "mygo"]));
    });

    // --- 2. Act ---
    let response = app
        .client
        .post(app.persona_url("chat-dan"))
        .json(&json!({ "messages": [
            { "role": "user", "content": "早" },
            { "role": "assistant", "content": "早" },
            { "role": "user", "content": "推荐点番" }
        ] }))
        .send()
        .await?;

    // --- 3. Assert ---
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await?, "看mygo");
    embeddings_mock.assert();
    pinecone_mock.assert();
    chat_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_search_failure_aborts_without_generation() -> Result<()> {
    let app = TestApp::spawn().await?;
    let _embeddings_mock = app.mock_server.mock(|when, then| {
        when.method(Method::POST).path("/v1/embeddings");
        then.status(200)
            .json_body(json!({ "data": [{ "embedding": test_embedding() }] }));
    });
    let pinecone_mock = app.mock_server.mock(|when, then| {
        when.method(Method::POST).path("/query");
        then.status(503).body("index unavailable");
    });
    let chat_mock = app.mock_server.mock(|when, then| {
        when.method(Method::POST).path("/chat/completions");
        then.status(200).body(sse_body(&["should not happen"]));
    });

    let response = app
        .client
        .post(app.persona_url("chat-dan"))
        .json(&json!({ "messages": [{ "role": "user", "content": "q" }] }))
        .send()
        .await?;

    assert_eq!(response.status(), 502);
    let body: Value = response.json().await?;
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .contains("index unavailable"));
    pinecone_mock.assert();
    assert_eq!(chat_mock.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn test_embedding_dimension_mismatch_is_a_configuration_error() -> Result<()> {
    let app = TestApp::spawn().await?;
    let _embeddings_mock = app.mock_server.mock(|when, then| {
        when.method(Method::POST).path("/v1/embeddings");
        then.status(200)
            .json_body(json!({ "data": [{ "embedding": [0.1, 0.2] }] }));
    });
    let pinecone_mock = app.mock_server.mock(|when, then| {
        when.method(Method::POST).path("/query");
        then.status(200).json_body(json!({ "matches": [] }));
    });

    let response = app
        .client
        .post(app.persona_url("chat-dan"))
        .json(&json!({ "messages": [{ "role": "user", "content": "q" }] }))
        .send()
        .await?;

    assert_eq!(response.status(), 500);
    assert_eq!(pinecone_mock.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn test_missing_vector_credentials_fail_before_embedding() -> Result<()> {
    let app = TestApp::spawn_with(|config| config.vector_store.api_key = None).await?;
    let embeddings_mock = app.mock_server.mock(|when, then| {
        when.method(Method::POST).path("/v1/embeddings");
        then.status(200)
            .json_body(json!({ "data": [{ "embedding": test_embedding() }] }));
    });

    let response = app
        .client
        .post(app.persona_url("chat-dan"))
        .json(&json!({ "messages": [{ "role": "user", "content": "q" }] }))
        .send()
        .await?;

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await?;
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .contains("vector_store.api_key"));
    assert_eq!(embeddings_mock.hits(), 0);
    Ok(())
}
