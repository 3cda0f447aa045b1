//! Where fragment and fixture text comes from.

pub mod directory;
pub mod http;

pub use directory::DirectorySource;
pub use http::HttpSource;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {path}")]
    Status { path: String, status: u16 },
    #[error("Empty body received for {0}")]
    EmptyBody(String),
    #[error("Request failed for {path}: {reason}")]
    Transport { path: String, reason: String },
    #[error("Request timed out for {0}")]
    Timeout(String),
    #[error("Invalid resource path {path}: {reason}")]
    InvalidPath { path: String, reason: String },
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    Html,
    Json,
}

impl Accept {
    pub fn mime(self) -> &'static str {
        match self {
            Accept::Html => "text/html",
            Accept::Json => "application/json",
        }
    }
}

#[async_trait]
pub trait FragmentSource: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Fetch the raw text at `path`. Non-success statuses and blank bodies are errors.
    async fn fetch(&self, path: &str, accept: Accept) -> Result<String, FetchError>;
}

pub(crate) fn ensure_non_empty(path: &str, body: String) -> Result<String, FetchError> {
    if body.trim().is_empty() {
        Err(FetchError::EmptyBody(path.to_string()))
    } else {
        Ok(body)
    }
}

#[cfg(test)]
mod tests;
