use thiserror::Error;

/// Custom error types for the chat pipeline and its providers.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("Failed to send request to vector store: {0}")]
    VectorRequest(reqwest::Error),
    #[error("Failed to deserialize vector store response: {0}")]
    VectorDeserialization(reqwest::Error),
    #[error("Vector store returned an error: {0}")]
    VectorApi(String),
    #[error("Streaming response failed: {0}")]
    Stream(String),
    #[error("Embedding has {actual} dimensions but the vector index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl PromptError {
    /// Returns `true` when the error stems from configuration rather than
    /// from an external service or the request itself.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PromptError::MissingConfiguration(_)
                | PromptError::DimensionMismatch { .. }
                | PromptError::ReqwestClientBuild(_)
                | PromptError::Regex(_)
        )
    }
}
