// Error types shared by the library modules. Every operation except argument
// parsing degrades gracefully, so these errors end up as diagnostic text in
// `session` rather than aborting the process.

use std::path::PathBuf;
use thiserror::Error;

/// Problems resolving the per-invocation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine a base directory (set KAMOS_HOME)")]
    NoBaseDir,
}

/// Failures of a single analysis request.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("KAMOS_API_TOKEN not found in environment variables or .env file.")]
    MissingToken,

    #[error("Failed to attach image {}: {message}", .path.display())]
    Image { path: PathBuf, message: String },

    #[error("HTTP Error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Error from Kamos: {message}")]
    Service { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failures reading or writing the persisted document pair.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{} not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt document {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

pub type StoreResult<T> = Result<T, StoreError>;
