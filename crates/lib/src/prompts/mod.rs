//! # Prompt Template Modules
//!
//! This module organizes the persona prompt templates used by the chat
//! endpoints. Each template marks the place where context is inserted with
//! the `{context}` token.

pub mod personas;
