use thiserror::Error;

#[derive(Error, Debug)]
pub enum TermbrainError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Stream error: {message}")]
    Stream {
        message: String,
        /// Whatever had accumulated before the stream failed. The caller
        /// decides whether a partial answer is still usable.
        partial: String,
    },

    #[error("Directive error: {filename}: {message}")]
    Directive { filename: String, message: String },

    #[error("Search error: {0}")]
    Search(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TermbrainError {
    pub fn stream(message: impl Into<String>, partial: impl Into<String>) -> Self {
        Self::Stream {
            message: message.into(),
            partial: partial.into(),
        }
    }

    pub fn directive(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Directive {
            filename: filename.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TermbrainError>;
