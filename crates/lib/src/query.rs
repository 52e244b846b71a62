use crate::types::{ChatMessage, Role};

/// Returns the text of the most recent user message, or an empty string when
/// the conversation has none.
pub fn extract_query(messages: &[ChatMessage]) -> &str {
    messages
        .iter()
        .rev()
        .find(|message| message.role == Role::User)
        .map(|message| message.content.as_str())
        .unwrap_or("")
}
