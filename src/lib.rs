// src/lib.rs
// =============================================================================
// exposure-scout: probes hostnames for publicly reachable sensitive paths
// (.git, .env, ...) and reports which ones answered with a 2xx status.
//
// Pipeline:
//   candidates -> dispatch -> probe -> results
//
// main.rs is only a thin CLI around `scan::run_scan`.
// =============================================================================

pub mod candidates; // src/candidates/ - hostname + suffix -> candidate URLs
pub mod config;     // src/config.rs - run configuration
pub mod dispatch;   // src/dispatch/ - bounded-concurrency scheduling
pub mod error;      // src/error.rs - fatal error types
pub mod probe;      // src/probe/ - one HTTP GET per candidate
pub mod results;    // src/results.rs - outcome aggregation
pub mod scan;       // src/scan.rs - the whole pipeline

pub use candidates::CandidateUrl;
pub use config::{ConfigOverrides, CrawlConfig, DispatchStrategy};
pub use error::{Result, ScanError};
pub use probe::{HttpProber, ProbeOutcome, Prober};
pub use results::ResultSet;
