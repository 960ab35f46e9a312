mod client;
mod hf;
mod types;

pub use client::LlmClient;
pub use hf::HfClient;
pub use types::{ContentPart, ImageRef, Message, MessageContent, Role, StreamEvent};
