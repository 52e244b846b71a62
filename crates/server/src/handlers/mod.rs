//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for the `personachat-server`.
//! The handlers are split into sub-modules by functionality.

pub mod chat_handlers;
pub mod general;

// Re-export all handlers from the sub-modules to make them easily accessible
// to the router under a single `handlers::` path.
pub use chat_handlers::*;
pub use general::*;

// Shared items used by multiple handler modules.
use super::{errors::AppError, state::AppState};
