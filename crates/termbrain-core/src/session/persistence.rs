use crate::error::{Result, TermbrainError};
use crate::llm::Message;
use crate::memory::{MemoryStore, DEFAULT_PERSONA};
use crate::session::history::ConversationHistory;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

fn default_persona() -> String {
    DEFAULT_PERSONA.to_string()
}

/// The on-disk session document. Every key defaults independently so a
/// document from an older revision (or a hand-edited one) still loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(default)]
    pub history: Vec<Message>,
    #[serde(default)]
    pub deep_mem: DeepMemory,
    #[serde(default = "default_persona")]
    pub custom_role: String,
}

impl Default for PersistedSession {
    fn default() -> Self {
        Self {
            history: Vec::new(),
            deep_mem: DeepMemory::default(),
            custom_role: default_persona(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeepMemory {
    #[serde(default)]
    pub files: IndexMap<String, String>,
}

impl PersistedSession {
    pub fn into_parts(self) -> (ConversationHistory, MemoryStore) {
        (
            ConversationHistory::from_messages(self.history),
            MemoryStore {
                files: self.deep_mem.files,
                persona: self.custom_role,
            },
        )
    }
}

/// Loads and saves the single session document. Persistence is
/// best-effort: a missing or corrupt document degrades to defaults, and
/// the caller treats save failures as non-fatal.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Never raises. Any read or parse failure yields fresh defaults.
    pub fn load(&self) -> PersistedSession {
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(_) => PersistedSession::default(),
        }
    }

    /// Write the current window of history plus memory and persona.
    pub fn save(
        &self,
        history: &ConversationHistory,
        memory: &MemoryStore,
        window: usize,
    ) -> Result<()> {
        let doc = PersistedSession {
            history: history.windowed(window),
            deep_mem: DeepMemory {
                files: memory.files.clone(),
            },
            custom_role: memory.persona.clone(),
        };

        let contents = serde_json::to_string(&doc)
            .map_err(|e| TermbrainError::Persistence(format!("serialize session: {e}")))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| TermbrainError::Persistence(format!("create session dir: {e}")))?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)
            .map_err(|e| TermbrainError::Persistence(format!("write session file: {e}")))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|e| TermbrainError::Persistence(format!("rename session file: {e}")))?;

        Ok(())
    }

    /// Remove the backing document. Missing file is fine.
    pub fn wipe(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(|e| TermbrainError::Persistence(format!("remove session file: {e}")))?;
        }
        Ok(())
    }
}
