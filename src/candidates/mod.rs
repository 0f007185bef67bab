// src/candidates/mod.rs
// =============================================================================
// This module builds the list of URLs to probe.
//
// Submodules:
// - generate: hostname + suffix paths -> candidate URLs
// - source: reads the hostname list file
// =============================================================================

mod generate;
mod source;

pub use generate::{generate, CandidateGenerator, CandidateUrl};
pub use source::load_candidates;
