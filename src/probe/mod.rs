// src/probe/mod.rs
// =============================================================================
// This module checks whether a single candidate URL is exposed.
//
// Submodules:
// - outcome: the result of one probe
// - http: the real implementation, an HTTP GET with a deadline
//
// The dispatcher only knows about the Prober trait, so tests can swap in a
// probe that never touches the network.
// =============================================================================

mod http;
mod outcome;

pub use http::HttpProber;
pub use outcome::ProbeOutcome;

use crate::candidates::CandidateUrl;
use async_trait::async_trait;

// Probes one URL. Implementations must not fail: every problem is folded into
// the returned outcome.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &CandidateUrl) -> ProbeOutcome;
}
