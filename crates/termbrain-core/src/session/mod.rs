mod history;
mod persistence;

pub use history::ConversationHistory;
pub use persistence::{DeepMemory, PersistedSession, SessionStore};
