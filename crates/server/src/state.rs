//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The `AppState` holds the configuration, the
//! resolved personas and the chat pipeline with its provider clients, making
//! them accessible to all request handlers.

use crate::config::AppConfig;
use personachat::{
    providers::{
        ai::{OpenAiChatProvider, OpenAiEmbeddingProvider},
        vector::PineconeProvider,
    },
    ChatPipeline, GenerationParams, Persona, PersonaContext,
};
use std::{collections::HashMap, sync::Arc};
use tracing::{info, warn};

/// The shared application state, accessible from all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    /// Fully resolved personas, keyed by endpoint name.
    pub personas: Arc<HashMap<String, Persona>>,
    /// The pipeline shared by every persona endpoint.
    pub pipeline: Arc<ChatPipeline>,
}

/// Builds the shared application state from the configuration.
///
/// Provider clients are created only for services that have credentials.
/// A request that needs a missing service is rejected with a configuration
/// error instead, so the server can start with a partial setup.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let mut builder = ChatPipeline::builder()
        .sample_dir(&config.data_dir)
        .top_k(config.vector_store.top_k)
        .dimension(config.embedding.dimension);

    match &config.chat.api_key {
        Some(api_key) => {
            builder = builder.chat_provider(Box::new(OpenAiChatProvider::new(
                config.chat.api_url.clone(),
                Some(api_key.clone()),
                config.chat.model_name.clone(),
            )?));
            info!(model = %config.chat.model_name, "Initialized chat provider.");
        }
        None => warn!("chat.api_key is not set; persona endpoints will fail."),
    }

    match &config.embedding.api_key {
        Some(api_key) => {
            builder = builder.embedding_provider(Box::new(OpenAiEmbeddingProvider::new(
                config.embedding.api_url.clone(),
                Some(api_key.clone()),
                config.embedding.model_name.clone(),
            )?));
            info!(model = %config.embedding.model_name, "Initialized embedding provider.");
        }
        None => warn!("embedding.api_key is not set; retrieval personas will fail."),
    }

    match (&config.vector_store.host, &config.vector_store.api_key) {
        (Some(host), Some(api_key)) => {
            builder = builder.vector_store(Box::new(PineconeProvider::new(
                host.clone(),
                api_key.clone(),
                config.vector_store.namespace.clone(),
            )?));
            info!(index = %config.vector_store.index_name, "Initialized vector store.");
        }
        _ => warn!("vector_store.host or vector_store.api_key is not set; retrieval personas will fail."),
    }

    // Every built-in persona carries all fields through the default layer, so a
    // missing system prompt means a new persona was declared incompletely.
    let mut resolved_personas = HashMap::new();
    for (name, persona_config) in &config.personas {
        let system_prompt = persona_config.system_prompt.clone().ok_or_else(|| {
            anyhow::anyhow!("Persona '{name}' is missing required 'system_prompt' field")
        })?;
        let defaults = GenerationParams::default();
        let params = GenerationParams {
            temperature: persona_config.temperature.unwrap_or(defaults.temperature),
            max_tokens: persona_config.max_tokens.unwrap_or(defaults.max_tokens),
            frequency_penalty: persona_config.frequency_penalty,
            presence_penalty: persona_config.presence_penalty,
        };

        resolved_personas.insert(
            name.clone(),
            Persona {
                name: name.clone(),
                system_prompt,
                context: persona_config
                    .context
                    .clone()
                    .unwrap_or(PersonaContext::None),
                params,
            },
        );
    }
    info!(count = resolved_personas.len(), "Resolved personas.");

    Ok(AppState {
        config: Arc::new(config),
        personas: Arc::new(resolved_personas),
        pipeline: Arc::new(builder.build()),
    })
}
