//! # Persona Chat Handler
//!
//! `POST /api/{persona}` validates the conversation, runs the pipeline for the
//! persona and streams the completion back as plain text.
//!
//! The configured request timeout covers the whole exchange: preparation
//! (sample loading or retrieval) and the opening of the completion stream fail
//! with 504 when the deadline passes, and the streamed body is cut at the same
//! deadline.

use super::{AppError, AppState};
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use futures::{future, StreamExt};
use personachat::{truncate_user_messages, validate_payload, Persona, TextStream};
use serde_json::Value;
use std::{convert::Infallible, time::Duration};
use tokio::time::{sleep_until, timeout_at, Instant};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// Handles one chat request for the persona named in the path.
pub async fn chat_handler(
    State(app_state): State<AppState>,
    Path(persona_name): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("chat", %request_id, persona = %persona_name);
    run_chat(app_state, persona_name, payload)
        .instrument(span)
        .await
}

async fn run_chat(
    app_state: AppState,
    persona_name: String,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let persona = app_state
        .personas
        .get(&persona_name)
        .cloned()
        .ok_or(AppError::UnknownPersona(persona_name))?;

    let Json(payload) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let conversation = validate_payload(&payload)?;
    let conversation = truncate_user_messages(conversation, app_state.config.max_user_chars);
    info!(messages = conversation.len(), "Received chat request");

    let timeout_secs = app_state.config.request_timeout_secs;
    let deadline = Instant::now() + Duration::from_secs(timeout_secs);

    let messages = timeout_at(deadline, app_state.pipeline.prepare(&persona, &conversation))
        .await
        .map_err(|_| AppError::Timeout(timeout_secs))??;
    let stream = timeout_at(deadline, app_state.pipeline.generate(&persona, &messages))
        .await
        .map_err(|_| AppError::Timeout(timeout_secs))??;

    Ok(streaming_response(&persona, stream, deadline))
}

/// Turns the completion stream into a `text/plain` body. A failure after the
/// first chunk can no longer change the status code, so it is logged and ends
/// the body.
fn streaming_response(persona: &Persona, stream: TextStream, deadline: Instant) -> Response {
    let persona_name = persona.name.clone();
    let body = stream
        .inspect(move |chunk| {
            if let Err(e) = chunk {
                error!(persona = %persona_name, error = %e, "Generation stream failed");
            }
        })
        .take_while(|chunk| future::ready(chunk.is_ok()))
        .filter_map(|chunk| future::ready(chunk.ok()))
        .map(Ok::<_, Infallible>)
        .take_until(sleep_until(deadline));

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(body),
    )
        .into_response()
}
