pub mod pinecone;

use crate::errors::PromptError;
use async_trait::async_trait;
use dyn_clone::DynClone;
pub use pinecone::PineconeProvider;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;

/// A single nearest-neighbour match returned by a vector index.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VectorMatch {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl VectorMatch {
    /// Returns the passage text stored under `field` in the metadata, if it
    /// is a non-empty string.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.metadata
            .as_ref()?
            .get(field)?
            .as_str()
            .filter(|text| !text.is_empty())
    }
}

/// A trait for querying a hosted vector index.
#[async_trait]
pub trait VectorStore: Send + Sync + Debug + DynClone {
    /// Returns up to `top_k` matches for `vector`, most relevant first, in the
    /// order produced by the index.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, PromptError>;
}

dyn_clone::clone_trait_object!(VectorStore);
