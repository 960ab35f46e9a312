use crate::error::{Result, TermbrainError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const TOKEN_KEY: &str = "HF_TOKEN=";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Where uploads land, directives materialize, and session state lives.
    pub workspace_dir: PathBuf,
    /// Most-recent turns kept in the persisted transcript.
    pub history_window: usize,
    /// Output-token budget per streaming call.
    pub max_tokens: u32,
    /// Result bound for web searches.
    pub search_results: usize,
}

impl Default for Settings {
    fn default() -> Self {
        let workspace_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Termbrain");
        Self {
            workspace_dir,
            history_window: 20,
            max_tokens: 4000,
            search_results: 5,
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("termbrain")
            .join("config.toml")
    }

    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Tolerant read: a missing or unparseable file yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(content) = fs::read_to_string(path) {
                if let Ok(config) = toml::from_str(&content) {
                    return config;
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| TermbrainError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn images_dir(&self) -> PathBuf {
        self.workspace_dir.join("images")
    }

    pub fn session_path(&self) -> PathBuf {
        self.workspace_dir.join("memory.json")
    }

    pub fn credential_path(&self) -> PathBuf {
        self.workspace_dir.join(".env")
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.workspace_dir)
            .map_err(|e| TermbrainError::Config(format!("create workspace dir: {e}")))?;
        fs::create_dir_all(self.images_dir())
            .map_err(|e| TermbrainError::Config(format!("create images dir: {e}")))?;
        Ok(())
    }

    /// Read the stored credential, if any. Unreadable files are treated
    /// the same as a missing one; first-run capture handles the rest.
    pub fn load_token(&self) -> Option<String> {
        let content = fs::read_to_string(self.credential_path()).ok()?;
        content.lines().find_map(|line| {
            let token = line.strip_prefix(TOKEN_KEY)?.trim();
            if token.is_empty() {
                None
            } else {
                Some(token.to_string())
            }
        })
    }

    pub fn save_token(&self, token: &str) -> Result<()> {
        fs::create_dir_all(&self.workspace_dir)?;
        fs::write(self.credential_path(), format!("{TOKEN_KEY}{token}"))
            .map_err(|e| TermbrainError::Config(format!("failed to save credential: {e}")))?;
        Ok(())
    }

    pub fn remove_token(&self) -> Result<()> {
        let path = self.credential_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
