use crate::{
    errors::PromptError,
    providers::ai::ChatProvider,
    sse::{SseDecoder, SseEvent},
    types::{ChatMessage, GenerationParams, TextStream},
};
use async_trait::async_trait;
use futures::{stream, StreamExt};
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt::Debug;
use tracing::{debug, warn};

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize, Debug)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Deserialize, Debug, Default)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Extracts the text delta of a single `data:` payload.
fn parse_chunk(data: &str) -> Result<Option<String>, PromptError> {
    let chunk: ChatCompletionChunk = serde_json::from_str(data)?;
    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty()))
}

// --- Provider implementation ---

/// A provider for OpenAI-compatible chat completion APIs (e.g. DeepSeek).
#[derive(Clone, Debug)]
pub struct OpenAiChatProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiChatProvider {
    /// Creates a new `OpenAiChatProvider`. `api_url` is the full
    /// `.../chat/completions` URL.
    pub fn new(api_url: String, api_key: Option<String>, model: String) -> Result<Self, PromptError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(PromptError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

/// State carried between polls of the decoded completion stream.
struct StreamState<S> {
    body: S,
    decoder: SseDecoder,
    pending: VecDeque<Result<String, PromptError>>,
    finished: bool,
}

#[async_trait]
impl ChatProvider for OpenAiChatProvider {
    async fn stream_chat(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<TextStream, PromptError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            frequency_penalty: params.frequency_penalty,
            presence_penalty: params.presence_penalty,
            stream: true,
        };
        debug!(
            model = %self.model,
            messages = messages.len(),
            "--> Sending streamed chat completion request"
        );

        let mut request_builder = self.client.post(&self.api_url);
        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder
            .json(&request_body)
            .send()
            .await
            .map_err(PromptError::AiRequest)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PromptError::AiApi(format!(
                "chat completion failed with {status}: {error_text}"
            )));
        }

        let state = StreamState {
            body: response.bytes_stream().boxed(),
            decoder: SseDecoder::new(),
            pending: VecDeque::new(),
            finished: false,
        };

        let text_stream = stream::unfold(state, |mut state| async move {
            loop {
                if let Some(item) = state.pending.pop_front() {
                    return Some((item, state));
                }
                if state.finished {
                    return None;
                }

                let events = match state.body.next().await {
                    Some(Ok(bytes)) => state.decoder.push(&bytes),
                    Some(Err(e)) => {
                        state.finished = true;
                        Err(PromptError::Stream(e.to_string()))
                    }
                    None => {
                        state.finished = true;
                        state.decoder.finish().map(|last| last.into_iter().collect())
                    }
                };

                match events {
                    Ok(events) => {
                        for event in events {
                            match event {
                                SseEvent::Done => {
                                    state.finished = true;
                                    break;
                                }
                                SseEvent::Data(data) => match parse_chunk(&data) {
                                    Ok(Some(text)) => state.pending.push_back(Ok(text)),
                                    Ok(None) => {}
                                    Err(e) => {
                                        warn!(error = %e, "Skipping malformed completion chunk");
                                    }
                                },
                            }
                        }
                    }
                    Err(e) => {
                        state.finished = true;
                        state.pending.push_back(Err(e));
                    }
                }
            }
        });

        Ok(text_stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chunk_extracts_delta() {
        let data = r#"{"id":"1","choices":[{"index":0,"delta":{"content":"似了"}}]}"#;
        assert_eq!(parse_chunk(data).unwrap(), Some("似了".to_string()));
    }

    #[test]
    fn test_parse_chunk_without_content_is_skipped() {
        let role_only = r#"{"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_chunk(role_only).unwrap(), None);
        let finish = r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#;
        assert_eq!(parse_chunk(finish).unwrap(), None);
        assert_eq!(parse_chunk(r#"{"choices":[]}"#).unwrap(), None);
    }

    #[test]
    fn test_request_serializes_only_set_penalties() {
        let messages = vec![ChatMessage::system("s"), ChatMessage::user("u")];
        let request = ChatCompletionRequest {
            model: "deepseek-chat",
            messages: &messages,
            temperature: 1.2,
            max_tokens: 200,
            frequency_penalty: Some(1.2),
            presence_penalty: None,
            stream: true,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["frequency_penalty"], serde_json::json!(1.2f32));
        assert!(value.get("presence_penalty").is_none());
        assert_eq!(value["stream"], true);
    }
}
