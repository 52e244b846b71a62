//! # Common Test Utilities
//!
//! This module centralizes the test harness used across the `personachat-server`
//! integration tests.
//!
//! - `TestApp`: spawns the real router on a random port, configured so that
//!   the chat, embedding and vector index services all point at one
//!   `httpmock::MockServer`.
//! - Helpers for building mock upstream responses.

// Allow unused code because this is a test utility module, and not all
// functions might be used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use httpmock::MockServer;
use personachat_server::{
    config::{self, AppConfig},
    router,
    state::{build_app_state, AppState},
};
use reqwest::Client;
use std::{fs::File, io::Write, net::SocketAddr, path::Path};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

/// The embedding dimension the harness configures. Mock embedding responses
/// must return vectors of this length.
pub const TEST_DIMENSION: usize = 4;

pub const CHAT_KEY: &str = "test-chat-key";
pub const EMBEDDING_KEY: &str = "test-embedding-key";
pub const PINECONE_KEY: &str = "test-pinecone-key";

// --- Full Application Test Harness ---

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    pub data_dir: TempDir,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server with every service configured.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(|_| {}).await
    }

    /// Spawns the application server after letting the caller adjust the
    /// loaded configuration.
    pub async fn spawn_with(customize: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start();
        let data_dir = tempdir()?;

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
data_dir: "{}"
request_timeout_secs: 5
chat:
  api_url: "{}"
  model_name: "mock-chat-model"
  api_key: "{CHAT_KEY}"
embedding:
  api_url: "{}"
  model_name: "mock-embedding-model"
  api_key: "{EMBEDDING_KEY}"
  dimension: {TEST_DIMENSION}
vector_store:
  host: "{}"
  index_name: "test-index"
  api_key: "{PINECONE_KEY}"
  top_k: 15
"#,
            data_dir.path().display(),
            mock_server.url("/chat/completions"),
            mock_server.url("/v1/embeddings"),
            mock_server.base_url(),
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let mut config = config::get_config(Some(config_path.to_str().unwrap()))?;
        customize(&mut config);
        let app_state = build_app_state(config).await?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let router_state = app_state.clone();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(router_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state,
            data_dir,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// The URL of a persona endpoint.
    pub fn persona_url(&self, persona: &str) -> String {
        format!("{}/api/{persona}", self.address)
    }

    /// Writes a sample file into the server's data directory.
    pub fn write_sample(&self, file_name: &str, content: &str) -> Result<()> {
        std::fs::write(self.data_dir.path().join(file_name), content)?;
        Ok(())
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

// --- Mock Response Helpers ---

/// Builds an OpenAI-style server-sent event body streaming `chunks`.
pub fn sse_body(chunks: &[&str]) -> String {
    let mut body = String::from(
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\",\"content\":\"\"}}]}\n\n",
    );
    for chunk in chunks {
        let event = serde_json::json!({ "choices": [{ "delta": { "content": chunk } }] });
        body.push_str(&format!("data: {event}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

/// A constant embedding of the harness dimension.
pub fn test_embedding() -> Vec<f32> {
    vec![0.5; TEST_DIMENSION]
}
