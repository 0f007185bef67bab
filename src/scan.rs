// src/scan.rs
// =============================================================================
// Ties the pipeline together:
//
//   hostname file -> candidates -> dispatch(probe) -> ResultSet
//
// Anything fatal (unreadable file, malformed candidate, broken HTTP client)
// comes back as an error and no partial results are returned.
// =============================================================================

use crate::candidates::{load_candidates, CandidateGenerator};
use crate::config::CrawlConfig;
use crate::dispatch::dispatch;
use crate::error::Result;
use crate::probe::{HttpProber, Prober};
use crate::results::ResultSet;
use std::sync::Arc;
use tracing::{debug, info};

// Runs a full scan with the real HTTP prober
pub async fn run_scan(config: &CrawlConfig) -> Result<ResultSet> {
    let prober = HttpProber::new(config)?;
    run_scan_with(config, Arc::new(prober)).await
}

// Same as run_scan, with the probe supplied by the caller
pub async fn run_scan_with(config: &CrawlConfig, prober: Arc<dyn Prober>) -> Result<ResultSet> {
    debug!("Starting the scan with the following configuration: {:?}", config);
    debug!("Getting the hostnames from: {}", config.src.display());

    let generator = CandidateGenerator::with_scheme(&config.scheme, &config.uris);
    let candidates = load_candidates(&config.src, &generator).await?;

    info!("{} candidate URLs to scan", candidates.len());

    Ok(dispatch(&candidates, prober, config).await)
}
