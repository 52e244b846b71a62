//! # Pinecone Vector Store
//!
//! Queries a Pinecone index through its data-plane REST API
//! (`POST https://<index-host>/query`).

use super::{VectorMatch, VectorStore};
use crate::errors::PromptError;
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize, Debug)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<VectorMatch>,
}

/// A provider for a single Pinecone index.
#[derive(Clone, Debug)]
pub struct PineconeProvider {
    client: ReqwestClient,
    host: String,
    api_key: String,
    namespace: Option<String>,
}

impl PineconeProvider {
    /// Creates a new `PineconeProvider` for the index served at `host`.
    pub fn new(host: String, api_key: String, namespace: Option<String>) -> Result<Self, PromptError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(PromptError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            host: host.trim_end_matches('/').to_string(),
            api_key,
            namespace,
        })
    }

    fn query_url(&self) -> String {
        format!("{}/query", self.host)
    }
}

#[async_trait]
impl VectorStore for PineconeProvider {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, PromptError> {
        let request_body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            namespace: self.namespace.as_deref(),
        };
        debug!(top_k, dimension = vector.len(), "--> Querying Pinecone index");

        let response = self
            .client
            .post(self.query_url())
            .header("Api-Key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(PromptError::VectorRequest)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PromptError::VectorApi(format!(
                "query failed with {status}: {error_text}"
            )));
        }

        let query_response: QueryResponse = response
            .json()
            .await
            .map_err(PromptError::VectorDeserialization)?;

        Ok(query_response.matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_request_uses_camel_case() {
        let vector = [0.5f32, 0.25];
        let request = QueryRequest {
            vector: &vector,
            top_k: 15,
            include_metadata: true,
            namespace: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({ "vector": [0.5, 0.25], "topK": 15, "includeMetadata": true })
        );
    }

    #[test]
    fn test_match_text_requires_non_empty_string() {
        let with_text: VectorMatch =
            serde_json::from_value(json!({ "id": "a", "score": 0.9, "metadata": { "text": "hi" } }))
                .unwrap();
        assert_eq!(with_text.text("text"), Some("hi"));

        let empty: VectorMatch =
            serde_json::from_value(json!({ "id": "b", "score": 0.8, "metadata": { "text": "" } }))
                .unwrap();
        assert_eq!(empty.text("text"), None);

        let numeric: VectorMatch =
            serde_json::from_value(json!({ "id": "c", "score": 0.7, "metadata": { "text": 3 } }))
                .unwrap();
        assert_eq!(numeric.text("text"), None);

        let bare: VectorMatch = serde_json::from_value(json!({ "id": "d", "score": 0.6 })).unwrap();
        assert_eq!(bare.text("text"), None);
    }

    #[test]
    fn test_trailing_slash_is_trimmed_from_host() {
        let provider =
            PineconeProvider::new("https://idx.pinecone.io/".into(), "k".into(), None).unwrap();
        assert_eq!(provider.query_url(), "https://idx.pinecone.io/query");
    }
}
