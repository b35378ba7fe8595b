pub mod fetch;

use serde::{Deserialize, Serialize};

/// One ranked hit from the search backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// 1-based page number
    pub page: u32,
    /// Representative snippet of the hit
    pub text: String,
}

impl Match {
    pub fn new(page: u32, text: impl Into<String>) -> Self {
        Self {
            page,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorKind {
    InvalidUrl,
    Transport,
    Status(u16),
    Decode,
}

/// Error during a backend search
#[derive(Debug, Clone)]
pub struct SearchError {
    pub message: String,
    pub kind: SearchErrorKind,
}

impl SearchError {
    pub fn new(kind: SearchErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            SearchErrorKind::Status(code) => write!(f, "[status {}] {}", code, self.message),
            SearchErrorKind::InvalidUrl => write!(f, "[url] {}", self.message),
            SearchErrorKind::Transport => write!(f, "[transport] {}", self.message),
            SearchErrorKind::Decode => write!(f, "[decode] {}", self.message),
        }
    }
}

impl std::error::Error for SearchError {}

/// Full-text search service returning ranked matches.
///
/// Implementations are called from a worker thread, hence `Send + Sync`.
pub trait SearchBackend: Send + Sync {
    fn search(&self, query: &str, document_id: Option<&str>) -> Result<Vec<Match>, SearchError>;
}
