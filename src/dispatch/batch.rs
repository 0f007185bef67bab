// src/dispatch/batch.rs
// =============================================================================
// Batched fan-out.
//
// Candidates are cut into batches of at most `batch_size`. Each batch gets one
// task per candidate; we wait for the whole batch, pause for `batch_delay`,
// then move on. The last batch is not followed by a pause.
//
// Why batches at all?
// - Some servers only start rate limiting after a burst; a pause between
//   bursts keeps a long host list from tripping that
// - Every task in a batch is its own tokio task, so a panicking probe only
//   loses its own outcome
// =============================================================================

use crate::candidates::CandidateUrl;
use crate::probe::{ProbeOutcome, Prober};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, warn};

// Probes the candidates in consecutive batches
//
// Parameters:
//   candidates: the jobs, cut into batches in this order
//   prober: shared by every task in every batch
//   batch_size: max tasks per batch, which is also the concurrency bound
//   batch_delay: pause between two batches (none after the last batch)
//   request_delay: pause between two task spawns inside a batch
//
// Returns: one (url, outcome) pair per probe that finished
pub(super) async fn run_batched(
    candidates: Vec<CandidateUrl>,
    prober: Arc<dyn Prober>,
    batch_size: usize,
    batch_delay: Duration,
    request_delay: Duration,
) -> Vec<(CandidateUrl, ProbeOutcome)> {
    let mut outcomes = Vec::with_capacity(candidates.len());
    let total_batches = candidates.len().div_ceil(batch_size);
    let mut batches = candidates.chunks(batch_size).enumerate().peekable();

    while let Some((index, batch)) = batches.next() {
        debug!("Dispatching batch {}/{} ({} candidates)", index + 1, total_batches, batch.len());

        let mut tasks = JoinSet::new();
        for (position, url) in batch.iter().enumerate() {
            if position > 0 && !request_delay.is_zero() {
                tokio::time::sleep(request_delay).await;
            }
            let prober = Arc::clone(&prober);
            let url = url.clone();
            tasks.spawn(async move {
                let outcome = prober.probe(&url).await;
                (url, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(pair) => outcomes.push(pair),
                Err(e) => warn!("Probe task failed: {}", e),
            }
        }

        if batches.peek().is_some() && !batch_delay.is_zero() {
            debug!("Max connections reached, sleeping {:?}", batch_delay);
            tokio::time::sleep(batch_delay).await;
        }
    }

    outcomes
}
