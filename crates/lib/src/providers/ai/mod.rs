pub mod chat;
pub mod embedding;

use crate::{
    errors::PromptError,
    types::{ChatMessage, GenerationParams, TextStream},
};
use async_trait::async_trait;
use dyn_clone::DynClone;
pub use chat::OpenAiChatProvider;
pub use embedding::OpenAiEmbeddingProvider;
use std::fmt::Debug;

/// A trait for turning text into an embedding vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug + DynClone {
    /// Embeds `input` into a fixed-length vector.
    async fn embed(&self, input: &str) -> Result<Vec<f32>, PromptError>;
}

dyn_clone::clone_trait_object!(EmbeddingProvider);

/// A trait for interacting with a chat completion provider.
///
/// The messages are sent in order; the caller is responsible for placing the
/// system prompt first.
#[async_trait]
pub trait ChatProvider: Send + Sync + Debug + DynClone {
    /// Starts a streamed completion. Errors that occur before the first token
    /// (transport, non-2xx status) are returned directly; later failures are
    /// yielded as items of the stream.
    async fn stream_chat(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<TextStream, PromptError>;
}

dyn_clone::clone_trait_object!(ChatProvider);
