//! # External Service Providers
//!
//! Clients for the three hosted collaborators of the chat pipeline: the
//! embedding service and chat completion service (`ai`), and the vector
//! index (`vector`).

pub mod ai;
pub mod vector;
