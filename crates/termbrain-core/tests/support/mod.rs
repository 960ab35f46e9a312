use futures::channel::mpsc;
use std::sync::Mutex;
use termbrain_core::error::{Result, TermbrainError};
use termbrain_core::llm::{LlmClient, Message, StreamEvent};

/// Scripted provider: each chat call pops and replays the next taped
/// event sequence; image calls return fixed bytes.
pub struct MockClient {
    scripts: Mutex<Vec<Vec<StreamEvent>>>,
    image_bytes: Vec<u8>,
}

impl MockClient {
    pub fn new(scripts: Vec<Vec<StreamEvent>>) -> Self {
        Self {
            scripts: Mutex::new(scripts),
            image_bytes: b"not-really-a-png".to_vec(),
        }
    }

    pub fn single(events: Vec<StreamEvent>) -> Self {
        Self::new(vec![events])
    }
}

#[async_trait::async_trait]
impl LlmClient for MockClient {
    async fn chat_stream(
        &self,
        _messages: &[Message],
        _model: &str,
        _max_tokens: u32,
    ) -> Result<mpsc::UnboundedReceiver<StreamEvent>> {
        let mut scripts = self.scripts.lock().unwrap();
        if scripts.is_empty() {
            return Err(TermbrainError::stream("no scripted response left", ""));
        }
        let events = scripts.remove(0);

        let (tx, rx) = mpsc::unbounded();
        for event in events {
            let _ = tx.unbounded_send(event);
        }
        Ok(rx)
    }

    async fn generate_image(&self, _prompt: &str, _model: &str) -> Result<Vec<u8>> {
        Ok(self.image_bytes.clone())
    }
}
