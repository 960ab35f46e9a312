use regex::Regex;
use std::fs;
use std::path::PathBuf;

pub const DIRECTIVE_MARKER: &str = "SAVE_FILE:";
pub const DIRECTIVE_TERMINATOR: &str = "END_SAVE";

/// One embedded write instruction parsed out of model output. Ephemeral:
/// extract, sanitize, write or discard.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDirective {
    pub filename: String,
    pub body: String,
}

/// Per-directive result of a materialization pass. One bad or failing
/// directive never aborts the rest.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveOutcome {
    Written { filename: String, path: PathBuf },
    Skipped { filename: String },
    Rejected { filename: String, reason: String },
    Failed { filename: String, error: String },
}

/// Scans completed model output for the `SAVE_FILE:` mini-protocol and
/// materializes matching files under the workspace root.
///
/// Grammar: a marker, a filename in `[A-Za-z0-9_.-]+` terminated by a
/// newline, then a body running to the next marker, an `END_SAVE`
/// terminator, or end of text. Known limitation, kept on purpose: a body
/// that itself contains the literal marker text is truncated at that
/// marker, because the scan cannot tell a nested mention from a new
/// directive.
pub struct FileDirectiveExtractor {
    root: PathBuf,
    header: Regex,
    fence_open: Regex,
}

impl FileDirectiveExtractor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            header: Regex::new(r"SAVE_FILE:[ \t]*([A-Za-z0-9_.\-]+)[ \t]*\r?\n").unwrap(),
            fence_open: Regex::new(r"```[a-zA-Z0-9]*\r?\n").unwrap(),
        }
    }

    /// Parse every well-formed directive, in textual order, with fenced
    /// code markup already stripped from the bodies.
    pub fn extract(&self, text: &str) -> Vec<FileDirective> {
        // Every position where a body must stop, whichever comes first.
        let mut stops: Vec<usize> = text
            .match_indices(DIRECTIVE_MARKER)
            .chain(text.match_indices(DIRECTIVE_TERMINATOR))
            .map(|(pos, _)| pos)
            .collect();
        stops.sort_unstable();

        self.header
            .captures_iter(text)
            .map(|caps| {
                let whole = caps.get(0).expect("capture 0 always present");
                let body_start = whole.end();
                let body_end = stops
                    .iter()
                    .copied()
                    .find(|&pos| pos >= body_start)
                    .unwrap_or(text.len());
                FileDirective {
                    filename: caps[1].to_string(),
                    body: self.clean_body(&text[body_start..body_end]),
                }
            })
            .collect()
    }

    /// Extract and write. Overwrite semantics; empty bodies are skipped;
    /// unsafe names and write failures are reported and stepped over.
    pub fn materialize(&self, text: &str) -> Vec<DirectiveOutcome> {
        self.extract(text)
            .into_iter()
            .map(|directive| self.write_one(directive))
            .collect()
    }

    fn write_one(&self, directive: FileDirective) -> DirectiveOutcome {
        let FileDirective { filename, body } = directive;

        // The charset already excludes separators; this catches the two
        // names that still escape the root.
        if filename == "." || filename == ".." {
            return DirectiveOutcome::Rejected {
                filename,
                reason: "path traversal".to_string(),
            };
        }

        if body.is_empty() {
            return DirectiveOutcome::Skipped { filename };
        }

        let path = self.root.join(&filename);
        match fs::write(&path, &body) {
            Ok(()) => DirectiveOutcome::Written { filename, path },
            Err(e) => DirectiveOutcome::Failed {
                filename,
                error: e.to_string(),
            },
        }
    }

    fn clean_body(&self, raw: &str) -> String {
        let without_openers = self.fence_open.replace_all(raw, "");
        without_openers.replace("```", "").trim().to_string()
    }
}
