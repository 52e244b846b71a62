//! # Historical Samples
//!
//! Sample-backed personas append a body of real chat lines to their system
//! prompt. The lines live in a data directory in one of two formats:
//!
//! - `<stem>.txt`: plain text with segments separated by `:`.
//! - `<stem>.json`: an array whose entries are strings or objects carrying a
//!   `content` or `message` field.
//!
//! A missing or unreadable file is not an error: the persona simply runs
//! without a sample and the prompt receives a placeholder instead.

use crate::constants::SAMPLE_PLACEHOLDER;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// The segment separator of the plain-text sample format.
pub const SEGMENT_DELIMITER: char = ':';

/// One entry of a JSON sample array.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum SampleEntry {
    Text(String),
    Content { content: String },
    Message { message: String },
    Other(Value),
}

impl SampleEntry {
    /// Normalizes the entry into its text, if it carries any.
    pub fn into_text(self) -> Option<String> {
        match self {
            SampleEntry::Text(text)
            | SampleEntry::Content { content: text }
            | SampleEntry::Message { message: text } => Some(text).filter(|t| !t.is_empty()),
            SampleEntry::Other(_) => None,
        }
    }
}

/// Flattens a JSON sample into newline-separated text. Anything other than an
/// array flattens to an empty string.
pub fn flatten_entries(data: &Value) -> String {
    let Some(items) = data.as_array() else {
        return String::new();
    };
    items
        .iter()
        .filter_map(|item| SampleEntry::deserialize(item).ok())
        .filter_map(SampleEntry::into_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits plain-text sample content on the segment delimiter, dropping blank
/// segments, and joins the segments with newlines.
pub fn split_segments(content: &str) -> String {
    content
        .trim()
        .split(SEGMENT_DELIMITER)
        .filter(|segment| !segment.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The historical sample context of a persona, present or absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoricalSample {
    Present(String),
    Absent,
}

impl HistoricalSample {
    fn from_text(text: String) -> Self {
        if text.is_empty() {
            HistoricalSample::Absent
        } else {
            HistoricalSample::Present(text)
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, HistoricalSample::Present(_))
    }

    /// The text inserted into a prompt: the sample itself, or the placeholder.
    pub fn render(&self) -> &str {
        match self {
            HistoricalSample::Present(text) => text,
            HistoricalSample::Absent => SAMPLE_PLACEHOLDER,
        }
    }
}

/// Loads the sample for `stem` from `dir`, preferring the text format over the
/// JSON format.
pub async fn load_sample(dir: &Path, stem: &str) -> HistoricalSample {
    let txt_path = dir.join(format!("{stem}.txt"));
    match tokio::fs::read_to_string(&txt_path).await {
        Ok(content) => {
            let text = split_segments(&content);
            info!(
                path = %txt_path.display(),
                chars = text.chars().count(),
                "Loaded text sample"
            );
            return HistoricalSample::from_text(text);
        }
        Err(e) => {
            info!(path = %txt_path.display(), error = %e, "Text sample unavailable, trying JSON");
        }
    }

    let json_path = dir.join(format!("{stem}.json"));
    let content = match tokio::fs::read_to_string(&json_path).await {
        Ok(content) => content,
        Err(e) => {
            warn!(
                path = %json_path.display(),
                error = %e,
                "No sample file found for '{stem}', continuing without sample"
            );
            return HistoricalSample::Absent;
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(data) => {
            let text = flatten_entries(&data);
            info!(
                path = %json_path.display(),
                chars = text.chars().count(),
                "Loaded JSON sample"
            );
            HistoricalSample::from_text(text)
        }
        Err(e) => {
            warn!(path = %json_path.display(), error = %e, "Sample JSON is malformed, continuing without sample");
            HistoricalSample::Absent
        }
    }
}
