//! # Chat Export Transcripts
//!
//! Historical sample files are produced from group chat exports in which each
//! message is a record of the form:
//!
//! ```text
//! <name>:
//!
//! 时间: 2025-12-30 23:12:32
//!
//! 内容: <message>
//!
//! 提及: ...
//! ```
//!
//! This module extracts one person's messages, strips image markers and reply
//! prefixes, and joins them into the delimiter-separated sample format.

use crate::{errors::PromptError, sample::SEGMENT_DELIMITER};
use regex::Regex;
use std::sync::LazyLock;

static IMAGE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[图片:[^\]]+\]").expect("image marker pattern is valid")
});

static REPLY_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[回复\s+u_[^:\]]+:\s*原消息\]\s*:?\s*").expect("reply prefix pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Removes image markers and reply prefixes and collapses whitespace.
pub fn clean_content(text: &str) -> String {
    let text = IMAGE_MARKER.replace_all(text, "");
    let text = REPLY_PREFIX.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Returns the cleaned, non-empty messages written by `person`.
pub fn extract_person_messages(export: &str, person: &str) -> Result<Vec<String>, PromptError> {
    let pattern = format!(
        r"(?m){}:\s*\n+\s*时间:\s*[^\n]+\s*\n+\s*内容:\s*([^\n]+)",
        regex::escape(person)
    );
    let record = Regex::new(&pattern)?;

    Ok(record
        .captures_iter(export)
        .filter_map(|caps| caps.get(1))
        .map(|content| clean_content(content.as_str()))
        .filter(|content| !content.is_empty())
        .collect())
}

/// Joins messages into the delimiter-separated sample format.
pub fn join_segments(messages: &[String]) -> String {
    messages.join(&SEGMENT_DELIMITER.to_string())
}
