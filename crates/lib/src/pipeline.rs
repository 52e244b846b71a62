//! # Chat Pipeline
//!
//! One request is one linear pass:
//!
//! 1. resolve the persona's context (retrieval: extract query → embed →
//!    search → filter; sample: load the sample file),
//! 2. assemble the system prompt,
//! 3. prepend it to the conversation and stream the completion.
//!
//! Nothing is shared between requests except the immutable clients held here.

use crate::{
    constants::{DEFAULT_DATA_DIR, DEFAULT_TOP_K, EMBEDDING_DIMENSION, PASSAGE_TEXT_FIELD},
    errors::PromptError,
    persona::{assemble_prompt, Persona, PersonaContext, PromptContext},
    providers::{
        ai::{ChatProvider, EmbeddingProvider},
        vector::VectorStore,
    },
    query::extract_query,
    sample::load_sample,
    types::{ChatMessage, RetrievedPassage, TextStream},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Runs persona chat requests against the configured providers.
#[derive(Clone, Debug)]
pub struct ChatPipeline {
    chat: Option<Box<dyn ChatProvider>>,
    embedder: Option<Box<dyn EmbeddingProvider>>,
    store: Option<Box<dyn VectorStore>>,
    sample_dir: PathBuf,
    top_k: usize,
    dimension: usize,
}

/// A builder for creating `ChatPipeline` instances.
///
/// Every provider is optional at build time. A request that needs a missing
/// provider fails with `PromptError::MissingConfiguration` before any external
/// call is made.
#[derive(Debug)]
pub struct ChatPipelineBuilder {
    chat: Option<Box<dyn ChatProvider>>,
    embedder: Option<Box<dyn EmbeddingProvider>>,
    store: Option<Box<dyn VectorStore>>,
    sample_dir: PathBuf,
    top_k: usize,
    dimension: usize,
}

impl Default for ChatPipelineBuilder {
    fn default() -> Self {
        Self {
            chat: None,
            embedder: None,
            store: None,
            sample_dir: PathBuf::from(DEFAULT_DATA_DIR),
            top_k: DEFAULT_TOP_K,
            dimension: EMBEDDING_DIMENSION,
        }
    }
}

impl ChatPipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chat completion provider.
    pub fn chat_provider(mut self, provider: Box<dyn ChatProvider>) -> Self {
        self.chat = Some(provider);
        self
    }

    /// Sets the embedding provider used by retrieval personas.
    pub fn embedding_provider(mut self, provider: Box<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(provider);
        self
    }

    /// Sets the vector index used by retrieval personas.
    pub fn vector_store(mut self, store: Box<dyn VectorStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the directory holding historical sample files.
    pub fn sample_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sample_dir = dir.into();
        self
    }

    /// Sets how many matches are requested from the vector index.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Sets the dimensionality the vector index was created with.
    pub fn dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn build(self) -> ChatPipeline {
        ChatPipeline {
            chat: self.chat,
            embedder: self.embedder,
            store: self.store,
            sample_dir: self.sample_dir,
            top_k: self.top_k,
            dimension: self.dimension,
        }
    }
}

impl ChatPipeline {
    pub fn builder() -> ChatPipelineBuilder {
        ChatPipelineBuilder::new()
    }

    pub fn sample_dir(&self) -> &Path {
        &self.sample_dir
    }

    /// Checks that every provider `persona` needs is configured.
    pub fn check_configuration(&self, persona: &Persona) -> Result<(), PromptError> {
        if self.chat.is_none() {
            return Err(PromptError::MissingConfiguration(
                "chat.api_key is not configured".to_string(),
            ));
        }
        if persona.context == PersonaContext::Retrieval {
            if self.embedder.is_none() {
                return Err(PromptError::MissingConfiguration(
                    "embedding.api_key is not configured".to_string(),
                ));
            }
            if self.store.is_none() {
                return Err(PromptError::MissingConfiguration(
                    "vector_store.api_key is not configured".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Embeds `query` and returns the passages of the nearest matches that
    /// carry text, in the order returned by the index.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedPassage>, PromptError> {
        let (Some(embedder), Some(store)) = (&self.embedder, &self.store) else {
            return Err(PromptError::MissingConfiguration(
                "retrieval requires both an embedding provider and a vector store".to_string(),
            ));
        };

        let vector = embedder.embed(query).await?;
        if vector.len() != self.dimension {
            return Err(PromptError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }

        let matches = store.query(&vector, self.top_k).await?;
        let total = matches.len();
        let passages: Vec<RetrievedPassage> = matches
            .into_iter()
            .filter_map(|m| {
                let text = m.text(PASSAGE_TEXT_FIELD)?.to_string();
                Some(RetrievedPassage {
                    text,
                    score: m.score,
                    metadata: m.metadata.unwrap_or_default(),
                })
            })
            .collect();

        info!(
            matches = total,
            passages = passages.len(),
            "Retrieved passages from vector index"
        );
        Ok(passages)
    }

    /// Resolves the persona's context and assembles its system prompt.
    pub async fn build_system_prompt(
        &self,
        persona: &Persona,
        conversation: &[ChatMessage],
    ) -> Result<String, PromptError> {
        let context = match &persona.context {
            PersonaContext::None => PromptContext::Empty,
            PersonaContext::Sample { stem } => {
                PromptContext::Sample(load_sample(&self.sample_dir, stem).await)
            }
            PersonaContext::Retrieval => {
                let query = extract_query(conversation);
                info!(query = %query, "Retrieving context for user query");
                let passages = self.retrieve(query).await?;
                PromptContext::Passages(passages.into_iter().map(|p| p.text).collect())
            }
        };
        Ok(assemble_prompt(&persona.system_prompt, &context))
    }

    /// Runs every step up to generation and returns the message sequence sent
    /// to the model: the assembled system prompt followed by the conversation.
    pub async fn prepare(
        &self,
        persona: &Persona,
        conversation: &[ChatMessage],
    ) -> Result<Vec<ChatMessage>, PromptError> {
        self.check_configuration(persona)?;

        let system_prompt = self.build_system_prompt(persona, conversation).await?;
        debug!(persona = %persona.name, chars = system_prompt.chars().count(), "Assembled system prompt");

        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.push(ChatMessage::system(system_prompt));
        messages.extend_from_slice(conversation);
        Ok(messages)
    }

    /// Sends prepared messages to the chat provider.
    pub async fn generate(
        &self,
        persona: &Persona,
        messages: &[ChatMessage],
    ) -> Result<TextStream, PromptError> {
        let chat = self.chat.as_ref().ok_or_else(|| {
            PromptError::MissingConfiguration("chat.api_key is not configured".to_string())
        })?;
        chat.stream_chat(messages, &persona.params).await
    }

    /// Runs the full pipeline for one request.
    pub async fn run(
        &self,
        persona: &Persona,
        conversation: &[ChatMessage],
    ) -> Result<TextStream, PromptError> {
        let messages = self.prepare(persona, conversation).await?;
        self.generate(persona, &messages).await
    }
}
