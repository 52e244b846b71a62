//! # Server-Sent Events Decoder
//!
//! OpenAI-compatible chat APIs stream completions as server-sent events:
//! `data: {json}` lines separated by blank lines, terminated by `data: [DONE]`.
//! Network chunks do not respect line boundaries, so bytes are buffered until a
//! full line is available.

use crate::errors::PromptError;

/// Maximum number of bytes buffered while waiting for a line terminator.
pub const MAX_LINE_BYTES: usize = 1_048_576;

/// A decoded event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// The payload of a `data:` field.
    Data(String),
    /// The `[DONE]` terminator.
    Done,
}

/// Incremental decoder turning byte chunks into `data` events.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk of bytes and returns every event completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<SseEvent>, PromptError> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            if let Some(event) = parse_line(&line[..line.len() - 1])? {
                events.push(event);
            }
        }

        if self.buffer.len() > MAX_LINE_BYTES {
            return Err(PromptError::Stream(format!(
                "event line exceeds {MAX_LINE_BYTES} bytes"
            )));
        }
        Ok(events)
    }

    /// Flushes a trailing line that was not terminated by a newline.
    pub fn finish(&mut self) -> Result<Option<SseEvent>, PromptError> {
        let line = std::mem::take(&mut self.buffer);
        parse_line(&line)
    }
}

fn parse_line(raw: &[u8]) -> Result<Option<SseEvent>, PromptError> {
    let line = std::str::from_utf8(raw)
        .map_err(|e| PromptError::Stream(format!("invalid UTF-8 in event stream: {e}")))?;
    let line = line.strip_suffix('\r').unwrap_or(line);

    // Blank lines separate events, `:` lines are comments (keep-alives).
    if line.is_empty() || line.starts_with(':') {
        return Ok(None);
    }

    let Some(data) = line.strip_prefix("data:") else {
        // `event:`, `id:` and `retry:` fields carry nothing we use.
        return Ok(None);
    };
    let data = data.strip_prefix(' ').unwrap_or(data);

    if data == "[DONE]" {
        Ok(Some(SseEvent::Done))
    } else {
        Ok(Some(SseEvent::Data(data.to_string())))
    }
}
