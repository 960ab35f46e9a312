pub mod config;
pub mod context;
pub mod directives;
pub mod engine;
pub mod error;
pub mod llm;
pub mod memory;
pub mod models;
pub mod search;
pub mod session;
pub mod stream;

// Re-export key types
pub use config::Settings;
pub use directives::{DirectiveOutcome, FileDirective, FileDirectiveExtractor};
pub use engine::{SessionEngine, TurnOutcome};
pub use error::{Result, TermbrainError};
pub use llm::{HfClient, LlmClient, Message, MessageContent, Role, StreamEvent};
pub use memory::MemoryStore;
pub use models::{ModelKind, ModelSpec};
pub use session::{ConversationHistory, SessionStore};
pub use stream::{StreamAccumulator, StreamConsumer};
