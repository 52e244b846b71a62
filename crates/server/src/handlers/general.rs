//! # General Route Handlers
//!
//! The root, health check and persona listing endpoints.

use super::AppState;
use crate::types::{PersonaListResponse, PersonaSummary};
use axum::{extract::State, Json};

/// The handler for the root (`/`) endpoint.
pub async fn root() -> &'static str {
    "personachat server is running."
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Lists the configured personas, sorted by name.
pub async fn list_personas_handler(State(app_state): State<AppState>) -> Json<PersonaListResponse> {
    let mut personas: Vec<PersonaSummary> =
        app_state.personas.values().map(PersonaSummary::from).collect();
    personas.sort_by(|a, b| a.name.cmp(&b.name));
    Json(PersonaListResponse { personas })
}
