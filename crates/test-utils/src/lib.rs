use async_trait::async_trait;
use futures::{stream, StreamExt};
use personachat::errors::PromptError;
use personachat::providers::ai::{ChatProvider, EmbeddingProvider};
use personachat::providers::vector::{VectorMatch, VectorStore};
use personachat::types::{ChatMessage, GenerationParams, TextStream};
use serde_json::json;
use std::sync::{Arc, Mutex};

// --- Mock Chat Provider ---

/// A chat provider that streams pre-programmed chunks and records every
/// message sequence it receives.
#[derive(Clone, Debug)]
pub struct MockChatProvider {
    chunks: Vec<String>,
    fail_with: Option<String>,
    calls: Arc<Mutex<Vec<(Vec<ChatMessage>, GenerationParams)>>>,
}

impl MockChatProvider {
    pub fn new(chunks: &[&str]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            fail_with: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider whose every request fails with an API error.
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::new(&[])
        }
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<(Vec<ChatMessage>, GenerationParams)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn stream_chat(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<TextStream, PromptError> {
        self.calls
            .lock()
            .unwrap()
            .push((messages.to_vec(), params.clone()));

        if let Some(message) = &self.fail_with {
            return Err(PromptError::AiApi(message.clone()));
        }
        let chunks: Vec<Result<String, PromptError>> =
            self.chunks.iter().cloned().map(Ok).collect();
        Ok(stream::iter(chunks).boxed())
    }
}

// --- Mock Embedding Provider ---

/// An embedding provider returning a constant vector of the given dimension.
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    dimension: usize,
    fail_with: Option<String>,
    inputs: Arc<Mutex<Vec<String>>>,
}

impl MockEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            fail_with: None,
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::new(0)
        }
    }

    /// The texts that were embedded, in call order.
    pub fn get_inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, input: &str) -> Result<Vec<f32>, PromptError> {
        self.inputs.lock().unwrap().push(input.to_string());
        if let Some(message) = &self.fail_with {
            return Err(PromptError::AiApi(message.clone()));
        }
        Ok(vec![0.1; self.dimension])
    }
}

// --- Mock Vector Store ---

/// A vector store returning a fixed list of matches.
#[derive(Clone, Debug)]
pub struct MockVectorStore {
    matches: Vec<VectorMatch>,
    fail_with: Option<String>,
    queries: Arc<Mutex<Vec<(usize, usize)>>>,
}

impl MockVectorStore {
    pub fn new(matches: Vec<VectorMatch>) -> Self {
        Self {
            matches,
            fail_with: None,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    /// Recorded `(vector dimension, top_k)` pairs.
    pub fn get_queries(&self) -> Vec<(usize, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorStore for MockVectorStore {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, PromptError> {
        self.queries.lock().unwrap().push((vector.len(), top_k));
        if let Some(message) = &self.fail_with {
            return Err(PromptError::VectorApi(message.clone()));
        }
        Ok(self.matches.iter().take(top_k).cloned().collect())
    }
}

// --- Test-Specific Helpers ---

/// Builds a match whose metadata carries `text`.
pub fn text_match(id: &str, score: f32, text: &str) -> VectorMatch {
    let metadata = json!({ "text": text });
    VectorMatch {
        id: id.to_string(),
        score,
        metadata: metadata.as_object().cloned(),
    }
}

/// Builds a match without any usable text.
pub fn bare_match(id: &str, score: f32) -> VectorMatch {
    VectorMatch {
        id: id.to_string(),
        score,
        metadata: None,
    }
}
