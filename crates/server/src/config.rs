//! # Application Configuration
//!
//! This module defines the configuration structure for the `personachat-server`
//! and the logic for loading it from a `config.yml` file and environment
//! variables. The built-in personas form the base layer, so a config file only
//! needs to carry endpoints and credentials.

use config::{
    Config as ConfigBuilder, Environment, File, FileFormat, Value as ConfigValue,
    ValueKind as ConfigValueKind,
};
use personachat::{
    constants::{
        DEFAULT_DATA_DIR, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TOP_K, EMBEDDING_DIMENSION,
        MAX_USER_CHARS,
    },
    persona::default_personas,
    PersonaContext,
};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The directory holding historical sample files. Loaded from `DATA_DIR`.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Upper bound on a whole chat request, including the streamed body.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Maximum characters kept from each user message.
    #[serde(default = "default_max_user_chars")]
    pub max_user_chars: usize,

    /// The chat completion service.
    #[serde(default)]
    pub chat: ChatConfig,
    /// The embedding service used by retrieval personas.
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// The vector index used by retrieval personas.
    #[serde(default)]
    pub vector_store: VectorStoreConfig,
    /// Personas keyed by endpoint name.
    #[serde(default)]
    pub personas: HashMap<String, PersonaConfig>,
}

fn default_port() -> u16 {
    3000
}

fn default_data_dir() -> String {
    DEFAULT_DATA_DIR.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_max_user_chars() -> usize {
    MAX_USER_CHARS
}

/// Configuration for the OpenAI-compatible chat completion service.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChatConfig {
    pub api_url: String,
    pub model_name: String,
    pub api_key: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.deepseek.com/chat/completions".to_string(),
            model_name: "deepseek-chat".to_string(),
            api_key: None,
        }
    }
}

/// Configuration for the text embedding model provider.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub api_url: String,
    pub model_name: String,
    pub api_key: Option<String>,
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.siliconflow.cn/v1/embeddings".to_string(),
            model_name: "BAAI/bge-large-zh-v1.5".to_string(),
            api_key: None,
            dimension: EMBEDDING_DIMENSION,
        }
    }
}

/// Configuration for the Pinecone index.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct VectorStoreConfig {
    /// The index host, e.g. `https://zh-rag-index-xxxx.svc.pinecone.io`.
    pub host: Option<String>,
    pub index_name: String,
    pub namespace: Option<String>,
    pub api_key: Option<String>,
    pub top_k: usize,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            host: None,
            index_name: "zh-rag-index".to_string(),
            namespace: None,
            api_key: None,
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// A persona as written in configuration. Every field is optional so a file
/// can override a single value of a built-in persona.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PersonaConfig {
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub context: Option<PersonaContext>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub frequency_penalty: Option<f32>,
    #[serde(default)]
    pub presence_penalty: Option<f32>,
}

fn context_value(context: &PersonaContext) -> ConfigValue {
    let mut table = HashMap::new();
    match context {
        PersonaContext::None => {
            table.insert("kind".to_string(), ConfigValue::from("none"));
        }
        PersonaContext::Sample { stem } => {
            table.insert("kind".to_string(), ConfigValue::from("sample"));
            table.insert("stem".to_string(), ConfigValue::from(stem.as_str()));
        }
        PersonaContext::Retrieval => {
            table.insert("kind".to_string(), ConfigValue::from("retrieval"));
        }
    }
    ConfigValue::new(None, ConfigValueKind::Table(table))
}

/// Constructs a `config::Value` map of the built-in personas from the library.
/// This serves as the base layer of configuration.
fn build_default_personas() -> HashMap<String, ConfigValue> {
    default_personas()
        .into_iter()
        .map(|persona| {
            let mut table = HashMap::new();
            table.insert(
                "system_prompt".to_string(),
                ConfigValue::from(persona.system_prompt),
            );
            table.insert("context".to_string(), context_value(&persona.context));
            table.insert(
                "temperature".to_string(),
                ConfigValue::from(f64::from(persona.params.temperature)),
            );
            table.insert(
                "max_tokens".to_string(),
                ConfigValue::from(u64::from(persona.params.max_tokens)),
            );
            if let Some(penalty) = persona.params.frequency_penalty {
                table.insert(
                    "frequency_penalty".to_string(),
                    ConfigValue::from(f64::from(penalty)),
                );
            }
            if let Some(penalty) = persona.params.presence_penalty {
                table.insert(
                    "presence_penalty".to_string(),
                    ConfigValue::from(f64::from(penalty)),
                );
            }
            (
                persona.name,
                ConfigValue::new(None, ConfigValueKind::Table(table)),
            )
        })
        .collect()
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(format!("Invalid substitution pattern: {e}")))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// - Layer 1: the built-in personas.
/// - Layer 2: the main YAML file. An explicit path must exist; otherwise
///   `config.yml` next to the crate manifest is used, falling back to
///   `config.example.yml`.
/// - Layer 3: plain environment variables for top-level keys (`PORT`, `DATA_DIR`).
/// - Layer 4: `PERSONACHAT_...` variables for nested keys
///   (e.g. `PERSONACHAT_CHAT__API_KEY`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder()
        // Layer 1: Programmatic defaults from the library.
        .set_default("personas", build_default_personas())?;

    // Layer 2: Main Config (with Fallback)
    let main_config_path = if let Some(override_path) = config_path_override {
        override_path.to_string()
    } else {
        let user_config_path = format!("{base_path}/config.yml");
        if std::path::Path::new(&user_config_path).exists() {
            info!("Loading user-defined configuration from '{user_config_path}'.");
            user_config_path
        } else {
            let fallback_path = format!("{base_path}/config.example.yml");
            info!("'{user_config_path}' not found. Falling back to '{fallback_path}'.");
            fallback_path
        }
    };

    let main_content = read_and_substitute(&main_config_path)?.ok_or_else(|| {
        ConfigError::NotFound(format!(
            "Main config file not found at '{main_config_path}'. Please create 'config.yml' from 'config.example.yml'."
        ))
    })?;
    builder = builder.add_source(File::from_str(&main_content, FileFormat::Yaml));

    let settings = builder
        // Layer 3: Load environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Layer 4: Load prefixed environment variables for deeper overrides.
        .add_source(
            Environment::with_prefix("PERSONACHAT")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    // `${VAR}` substitution leaves an empty string for unset variables.
    config.chat.api_key = non_empty(config.chat.api_key.take());
    config.embedding.api_key = non_empty(config.embedding.api_key.take());
    config.vector_store.api_key = non_empty(config.vector_store.api_key.take());
    config.vector_store.host = non_empty(config.vector_store.host.take());

    Ok(config)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
