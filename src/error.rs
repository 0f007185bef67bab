// src/error.rs
// =============================================================================
// Error types for the scanning core.
//
// Only fatal, run-aborting failures live here. A probe that cannot reach its
// target is NOT an error: it is recorded as an outcome (see probe/outcome.rs)
// and the run keeps going.
//
// The binary edge (main.rs) converts these into anyhow errors with context.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// The hostname list could not be opened or read
    #[error("failed to read hostname list {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A hostname + suffix join did not produce a valid absolute URL
    #[error("malformed candidate URL '{candidate}': {reason}")]
    MalformedCandidate { candidate: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load config file {path}: {reason}")]
    ConfigFile { path: PathBuf, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
