use crate::error::{Result, TermbrainError};
use crate::llm::client::LlmClient;
use crate::llm::types::{Message, StreamEvent};
use futures::channel::mpsc;
use serde::Serialize;
use serde_json::Value;

const DEFAULT_CHAT_BASE: &str = "https://router.huggingface.co/v1";
const DEFAULT_IMAGE_BASE: &str = "https://router.huggingface.co/hf-inference/models";

/// Client for the Hugging Face inference router. Chat goes through the
/// OpenAI-compatible `/chat/completions` SSE endpoint; image generation
/// hits the model endpoint directly and gets raw bytes back.
pub struct HfClient {
    client: reqwest::Client,
    api_key: String,
    chat_base: String,
    image_base: String,
}

impl HfClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            chat_base: DEFAULT_CHAT_BASE.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
        }
    }

    pub fn with_chat_base(mut self, url: impl Into<String>) -> Self {
        self.chat_base = url.into();
        self
    }

    pub fn with_image_base(mut self, url: impl Into<String>) -> Self {
        self.image_base = url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    inputs: &'a str,
}

/// Extract the deltas carried by one SSE `data:` payload. A chunk may
/// carry `reasoning_content`, `content`, both, or neither.
fn delta_events(data: &str) -> Vec<StreamEvent> {
    let mut events = Vec::new();
    let Ok(value) = serde_json::from_str::<Value>(data) else {
        return events;
    };
    let Some(delta) = value
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("delta"))
    else {
        return events;
    };

    if let Some(reasoning) = delta.get("reasoning_content").and_then(|v| v.as_str()) {
        if !reasoning.is_empty() {
            events.push(StreamEvent::ReasoningDelta(reasoning.to_string()));
        }
    }
    if let Some(content) = delta.get("content").and_then(|v| v.as_str()) {
        if !content.is_empty() {
            events.push(StreamEvent::TextDelta(content.to_string()));
        }
    }
    events
}

/// Drain every complete line currently in the SSE buffer, forwarding the
/// events it carries. A partial trailing line stays buffered until the
/// next chunk completes it. Returns true once the `[DONE]` sentinel has
/// been seen.
fn drain_sse_lines(buffer: &mut String, tx: &mpsc::UnboundedSender<StreamEvent>) -> bool {
    while let Some(line_end) = buffer.find('\n') {
        let line = buffer[..line_end].trim().to_string();
        buffer.drain(..=line_end);

        if line.is_empty() || !line.starts_with("data: ") {
            continue;
        }

        let data = &line[6..];
        if data == "[DONE]" {
            let _ = tx.unbounded_send(StreamEvent::Done);
            return true;
        }

        for event in delta_events(data) {
            let _ = tx.unbounded_send(event);
        }
    }
    false
}

#[async_trait::async_trait]
impl LlmClient for HfClient {
    async fn chat_stream(
        &self,
        messages: &[Message],
        model: &str,
        max_tokens: u32,
    ) -> Result<mpsc::UnboundedReceiver<StreamEvent>> {
        let url = format!("{}/chat/completions", self.chat_base);

        let request_body = ChatRequest {
            model,
            messages,
            stream: true,
            max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(TermbrainError::stream(
                format!("chat request failed ({status}): {text}"),
                "",
            ));
        }

        let (tx, rx) = mpsc::unbounded();

        let mut stream = response.bytes_stream();
        tokio::spawn(async move {
            use futures::StreamExt;
            let mut buffer = String::new();

            while let Some(chunk) = stream.next().await {
                let chunk = match chunk {
                    Ok(c) => c,
                    Err(e) => {
                        let _ = tx.unbounded_send(StreamEvent::Error(e.to_string()));
                        return;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&chunk));
                if drain_sse_lines(&mut buffer, &tx) {
                    return;
                }
            }

            let _ = tx.unbounded_send(StreamEvent::Done);
        });

        Ok(rx)
    }

    async fn generate_image(&self, prompt: &str, model: &str) -> Result<Vec<u8>> {
        let url = format!("{}/{}", self.image_base, model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&ImageRequest { inputs: prompt })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(TermbrainError::stream(
                format!("image request failed ({status}): {text}"),
                "",
            ));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_events_extracts_content() {
        let data = r#"{"choices":[{"delta":{"content":"hello"}}]}"#;
        let events = delta_events(data);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], StreamEvent::TextDelta(s) if s == "hello"));
    }

    #[test]
    fn delta_events_extracts_reasoning_and_content() {
        let data = r#"{"choices":[{"delta":{"reasoning_content":"hmm","content":"ok"}}]}"#;
        let events = delta_events(data);
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], StreamEvent::ReasoningDelta(s) if s == "hmm"));
        assert!(matches!(&events[1], StreamEvent::TextDelta(s) if s == "ok"));
    }

    #[test]
    fn delta_events_ignores_empty_and_malformed() {
        assert!(delta_events(r#"{"choices":[{"delta":{}}]}"#).is_empty());
        assert!(delta_events(r#"{"choices":[{"delta":{"content":""}}]}"#).is_empty());
        assert!(delta_events("not json").is_empty());
        assert!(delta_events(r#"{"choices":[]}"#).is_empty());
    }

    #[test]
    fn sse_lines_split_across_chunks_reassemble() {
        let (tx, mut rx) = mpsc::unbounded();
        let mut buffer = String::new();

        // First chunk ends mid-payload: no complete line, no events.
        buffer.push_str("data: {\"choices\":[{\"delta\":{\"con");
        assert!(!drain_sse_lines(&mut buffer, &tx));
        assert!(rx.try_next().is_err());

        // Second chunk completes the line and carries the sentinel.
        buffer.push_str("tent\":\"hi\"}}]}\n\ndata: [DONE]\n");
        assert!(drain_sse_lines(&mut buffer, &tx));
        assert!(buffer.is_empty());

        assert!(matches!(
            rx.try_next(),
            Ok(Some(StreamEvent::TextDelta(s))) if s == "hi"
        ));
        assert!(matches!(rx.try_next(), Ok(Some(StreamEvent::Done))));
    }

    #[test]
    fn sse_drain_skips_keepalive_and_non_data_lines() {
        let (tx, mut rx) = mpsc::unbounded();
        let mut buffer = String::new();

        buffer.push_str(": keepalive\n\nevent: ping\ndata: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n");
        assert!(!drain_sse_lines(&mut buffer, &tx));

        assert!(matches!(
            rx.try_next(),
            Ok(Some(StreamEvent::TextDelta(s))) if s == "x"
        ));
        assert!(rx.try_next().is_err());
    }
}
