use crate::directives::{DIRECTIVE_MARKER, DIRECTIVE_TERMINATOR};
use crate::llm::{ContentPart, Message};
use crate::memory::MemoryStore;
use std::path::{Path, PathBuf};

/// The assembled prompt for one turn: persona preamble with file and
/// search context, the literal user query, and any image attachments
/// (already gated on the target's capability).
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledPrompt {
    pub system_text: String,
    pub user_text: String,
    pub images: Vec<String>,
}

impl AssembledPrompt {
    /// The outgoing user message: preamble and query folded into one
    /// text body, with image parts ahead of it when present.
    pub fn into_message(self) -> Message {
        let combined = format!("{}\n\nUSER_QUERY: {}", self.system_text, self.user_text);
        if self.images.is_empty() {
            Message::user(combined)
        } else {
            let mut parts: Vec<ContentPart> =
                self.images.into_iter().map(ContentPart::image).collect();
            parts.push(ContentPart::text(combined));
            Message::user_parts(parts)
        }
    }
}

/// Pure read/transform: combines persona, workspace identity, memory
/// contents, and optional search results into one prompt payload.
pub struct ContextAssembler {
    workspace: PathBuf,
    search_text: Option<String>,
}

impl ContextAssembler {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
            search_text: None,
        }
    }

    pub fn with_search_results(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn assemble(
        &self,
        memory: &MemoryStore,
        user_text: &str,
        accepts_images: bool,
    ) -> AssembledPrompt {
        let mut txt_context = String::new();
        let mut images = Vec::new();

        for (id, content) in &memory.files {
            if MemoryStore::is_image(content) {
                // never sent to a non-vision target
                if accepts_images {
                    images.push(content.clone());
                }
            } else {
                let name = Path::new(id)
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(id.as_str());
                txt_context.push_str(&format!("FILE ({name}):\n{content}\n---\n"));
            }
        }

        if let Some(ref search) = self.search_text {
            txt_context.push_str(&format!("WEB_RESEARCH:\n{search}\n---\n"));
        }

        let system_text = format!(
            "{}\nProject Path: {}\nContext:\n{}\nTo write files, use '{} filename.ext' and end with '{}'.",
            memory.persona,
            self.workspace.display(),
            txt_context,
            DIRECTIVE_MARKER,
            DIRECTIVE_TERMINATOR,
        );

        AssembledPrompt {
            system_text,
            user_text: user_text.to_string(),
            images,
        }
    }
}
