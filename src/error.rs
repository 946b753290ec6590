//! Errors surfaced by the search engine before or while launching workers.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Zero workers, an empty seed range, or an unusable suffix / program id.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),
}

impl SearchError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SearchError::InvalidConfiguration(msg.into())
    }
}
