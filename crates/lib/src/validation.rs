//! # Request Validation
//!
//! Every persona endpoint accepts the same body, `{ "messages": [{role, content}, ...] }`.
//! The payload is checked here before any external service is contacted, so a
//! malformed request never costs an embedding or completion call.

use crate::types::{ChatMessage, Conversation, Role};
use serde_json::Value;
use thiserror::Error;

/// Reasons a chat payload is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid message format: 'messages' must be an array")]
    MissingMessages,
    #[error("invalid message format: message {index} must be an object")]
    NotAnObject { index: usize },
    #[error("invalid message format: role must be 'user', 'assistant' or 'system', got '{role}'")]
    InvalidRole { index: usize, role: String },
    #[error("invalid message format: content of message {index} must be a string")]
    ContentNotString { index: usize },
}

/// Validates a raw JSON body and converts it into a typed conversation.
///
/// The first offending message determines the error.
pub fn validate_payload(payload: &Value) -> Result<Conversation, ValidationError> {
    let messages = payload
        .get("messages")
        .and_then(Value::as_array)
        .ok_or(ValidationError::MissingMessages)?;

    messages
        .iter()
        .enumerate()
        .map(|(index, message)| validate_message(index, message))
        .collect()
}

fn validate_message(index: usize, message: &Value) -> Result<ChatMessage, ValidationError> {
    let object = message
        .as_object()
        .ok_or(ValidationError::NotAnObject { index })?;

    let role = match object.get("role") {
        Some(Value::String(name)) => Role::parse(name).ok_or_else(|| ValidationError::InvalidRole {
            index,
            role: name.clone(),
        }),
        Some(other) => Err(ValidationError::InvalidRole {
            index,
            role: other.to_string(),
        }),
        None => Err(ValidationError::InvalidRole {
            index,
            role: "undefined".to_string(),
        }),
    }?;

    let content = object
        .get("content")
        .and_then(Value::as_str)
        .ok_or(ValidationError::ContentNotString { index })?;

    Ok(ChatMessage::new(role, content))
}

/// Truncates `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Caps the length of every user message. Assistant and system messages are
/// forwarded unchanged.
pub fn truncate_user_messages(conversation: Conversation, max_chars: usize) -> Conversation {
    conversation
        .into_iter()
        .map(|mut message| {
            if message.role == Role::User {
                let kept = truncate_chars(&message.content, max_chars).len();
                message.content.truncate(kept);
            }
            message
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_payload_is_converted() {
        let payload = json!({
            "messages": [
                { "role": "system", "content": "s" },
                { "role": "user", "content": "hello" },
                { "role": "assistant", "content": "hi" }
            ]
        });
        let conversation = validate_payload(&payload).unwrap();
        assert_eq!(
            conversation,
            vec![
                ChatMessage::system("s"),
                ChatMessage::user("hello"),
                ChatMessage::assistant("hi"),
            ]
        );
    }

    #[test]
    fn test_missing_messages_is_rejected() {
        assert_eq!(
            validate_payload(&json!({})),
            Err(ValidationError::MissingMessages)
        );
        assert_eq!(
            validate_payload(&json!({ "messages": "hello" })),
            Err(ValidationError::MissingMessages)
        );
        assert_eq!(
            validate_payload(&json!([1, 2])),
            Err(ValidationError::MissingMessages)
        );
    }

    #[test]
    fn test_invalid_role_names_the_value() {
        let payload = json!({ "messages": [{ "role": "moderator", "content": "x" }] });
        let err = validate_payload(&payload).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidRole {
                index: 0,
                role: "moderator".to_string()
            }
        );
        assert!(err.to_string().contains("'moderator'"));
    }

    #[test]
    fn test_role_with_trailing_garbage_is_rejected() {
        let payload = json!({ "messages": [{ "role": "user njkl", "content": "..." }] });
        let err = validate_payload(&payload).unwrap_err();
        assert!(err.to_string().contains("user njkl"));
    }

    #[test]
    fn test_non_object_message_is_rejected() {
        let payload = json!({ "messages": [{ "role": "user", "content": "ok" }, "bare"] });
        assert_eq!(
            validate_payload(&payload),
            Err(ValidationError::NotAnObject { index: 1 })
        );
    }

    #[test]
    fn test_non_string_content_is_rejected() {
        let payload = json!({ "messages": [{ "role": "user", "content": 42 }] });
        assert_eq!(
            validate_payload(&payload),
            Err(ValidationError::ContentNotString { index: 0 })
        );
    }

    #[test]
    fn test_user_message_is_truncated_to_limit() {
        let long = "字".repeat(250);
        let conversation = vec![ChatMessage::user(long), ChatMessage::assistant("a".repeat(250))];
        let truncated = truncate_user_messages(conversation, 200);
        assert_eq!(truncated[0].content.chars().count(), 200);
        assert_eq!(truncated[1].content.chars().count(), 250);
    }

    #[test]
    fn test_short_message_is_untouched() {
        assert_eq!(truncate_chars("short", 200), "short");
        assert_eq!(truncate_chars("", 200), "");
    }
}
