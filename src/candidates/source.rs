// src/candidates/source.rs
// =============================================================================
// Reads the hostname list from disk and expands it into candidates.
//
// The file is plain text, one hostname per line. We don't enforce an
// encoding: bytes that are not valid UTF-8 are replaced, and anything that
// then fails URL validation is reported as a malformed candidate.
// =============================================================================

use super::generate::{CandidateGenerator, CandidateUrl};
use crate::error::{Result, ScanError};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

// Loads the hostname list and expands every line into candidates
//
// Parameters:
//   path: the hostname file, one host per line (blank lines are skipped)
//   generator: decides the scheme and the suffix paths
//
// Returns: Result<HashSet<CandidateUrl>>
//   Success: every candidate for every non-blank line
//   Error: the file can't be read, or one line produced a malformed URL
pub async fn load_candidates(
    path: &Path,
    generator: &CandidateGenerator,
) -> Result<HashSet<CandidateUrl>> {
    debug!("Trying to open file: {}", path.display());

    // tokio::fs runs the read on the blocking pool, so the runtime stays free
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ScanError::SourceRead {
            path: path.to_path_buf(),
            source,
        })?;
    let text = String::from_utf8_lossy(&bytes);

    debug!("Successfully read {} bytes from {}", bytes.len(), path.display());

    generator.generate_all(text.lines())
}
