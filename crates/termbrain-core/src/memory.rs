use crate::error::{Result, TermbrainError};
use base64::Engine as _;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_PERSONA: &str = "You are a local developer AI.";

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Durable key/value context: uploaded files (text verbatim, images as
/// data URIs) plus the persona string. Keys are the original paths or
/// logical names; iteration order is insertion order, and re-uploading
/// a key overwrites in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryStore {
    pub files: IndexMap<String, String>,
    pub persona: String,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            files: IndexMap::new(),
            persona: DEFAULT_PERSONA.to_string(),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_text(&mut self, id: impl Into<String>, content: impl Into<String>) {
        self.files.insert(id.into(), content.into());
    }

    pub fn put_image(&mut self, id: impl Into<String>, media_type: &str, bytes: &[u8]) {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        self.files
            .insert(id.into(), format!("data:image/{media_type};base64,{encoded}"));
    }

    /// Read a file from disk into memory, keyed by its path. Known image
    /// extensions are stored as data URIs; everything else is read as
    /// (lossy) text.
    pub fn upload(&mut self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(TermbrainError::Persistence(format!(
                "file not found: {}",
                path.display()
            )));
        }

        let id = path.display().to_string();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            let bytes = std::fs::read(path)?;
            self.put_image(id.clone(), &ext, &bytes);
        } else {
            let bytes = std::fs::read(path)?;
            self.put_text(id.clone(), String::from_utf8_lossy(&bytes));
        }
        Ok(id)
    }

    /// Removing a nonexistent identifier is a no-op, not an error.
    pub fn remove(&mut self, id: &str) -> bool {
        self.files.shift_remove(id).is_some()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn is_image(content: &str) -> bool {
        content.starts_with("data:image")
    }
}
