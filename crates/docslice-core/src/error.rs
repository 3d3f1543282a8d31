use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChunkError>;

#[derive(Debug, Error)]
pub enum ChunkError {
    /// The source document could not be read; nothing is produced
    #[error("Failed to read document {path}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The token-counting oracle failed; no safe fallback offset exists
    #[error("Token counter for model '{model}' failed: {message}")]
    Oracle { model: String, message: String },

    #[error("Malformed markup at byte {position}: {message}")]
    Markup { position: u64, message: String },
}

impl ChunkError {
    pub fn oracle(model: impl Into<String>, message: impl ToString) -> Self {
        Self::Oracle {
            model: model.into(),
            message: message.to_string(),
        }
    }
}
