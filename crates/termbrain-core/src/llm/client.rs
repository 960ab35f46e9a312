use crate::error::Result;
use crate::llm::types::{Message, StreamEvent};
use futures::channel::mpsc;

/// The inference provider boundary. One implementation talks to the
/// Hugging Face router; tests script their own event sequences.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Submit a streaming chat request and get a receiver of incremental
    /// events. The stream ends with `Done` (or an `Error` mid-flight).
    async fn chat_stream(
        &self,
        messages: &[Message],
        model: &str,
        max_tokens: u32,
    ) -> Result<mpsc::UnboundedReceiver<StreamEvent>>;

    /// Single non-streaming text-to-image request. Returns the raw image
    /// bytes; the caller decides where they land on disk.
    async fn generate_image(&self, prompt: &str, model: &str) -> Result<Vec<u8>>;
}
