//! # Persona Chat
//!
//! This crate provides the building blocks of a persona chat service: request
//! validation, historical sample loading, prompt assembly, clients for the
//! embedding, vector search and chat completion services, and the pipeline
//! that ties them together for a single request.

pub mod constants;
pub mod errors;
pub mod persona;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod query;
pub mod sample;
pub mod sse;
pub mod transcript;
pub mod types;
pub mod validation;

pub use errors::PromptError;
pub use persona::{assemble_prompt, Persona, PersonaContext, PromptContext};
pub use pipeline::{ChatPipeline, ChatPipelineBuilder};
pub use query::extract_query;
pub use sample::HistoricalSample;
pub use types::{ChatMessage, Conversation, GenerationParams, RetrievedPassage, Role, TextStream};
pub use validation::{truncate_user_messages, validate_payload, ValidationError};
