// src/dispatch/pool.rs
// =============================================================================
// Fixed worker pool.
//
// How it works:
// 1. Spawn `workers` long-lived tasks that share one job queue
// 2. Push every candidate into the queue (optionally sleeping between pushes)
// 3. Close the queue; each worker exits once the queue is drained
// 4. Wait for every worker, then collect the outcomes
//
// Workers never write the ResultSet themselves. They send (url, outcome)
// pairs over a channel and the dispatcher records them afterwards.
//
// Rust concepts:
// - mpsc channels: many senders, one receiver
// - Arc<Mutex<Receiver>>: lets several workers take turns on one receiver
// - JoinHandle: awaiting a spawned task tells us if it panicked
// =============================================================================

use crate::candidates::CandidateUrl;
use crate::probe::{ProbeOutcome, Prober};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, warn};

type JobQueue = Arc<Mutex<mpsc::Receiver<CandidateUrl>>>;
type OutcomeSender = mpsc::UnboundedSender<(CandidateUrl, ProbeOutcome)>;

struct Worker {
    id: usize,
    queue: JobQueue,
    prober: Arc<dyn Prober>,
    outcomes: OutcomeSender,
}

impl Worker {
    // Pulls jobs until the queue is closed and empty
    async fn run(self) {
        loop {
            // The lock is only held while waiting for the next job, never
            // while probing
            let next = self.queue.lock().await.recv().await;
            let Some(url) = next else {
                break;
            };

            // Each probe runs in its own task: if it panics, only that job is
            // lost and this worker keeps draining the queue
            let prober = Arc::clone(&self.prober);
            let job = url.clone();
            let outcome = match tokio::spawn(async move { prober.probe(&job).await }).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Probe of {} failed on worker {}: {}", url, self.id, e);
                    continue;
                }
            };

            if self.outcomes.send((url, outcome)).is_err() {
                break;
            }
        }
        debug!("Worker {} finished", self.id);
    }
}

// Runs every candidate through a fixed set of workers
//
// Parameters:
//   candidates: the jobs, submitted in this order
//   prober: shared by all workers (that's why it's behind an Arc)
//   workers: how many workers to start, which is also the concurrency bound
//   request_delay: pause between two submissions (none after the last one)
//
// Returns: one (url, outcome) pair per probe that finished. A probe that
// panicked has no pair; the caller keeps its seeded outcome.
pub(super) async fn run_pool(
    candidates: Vec<CandidateUrl>,
    prober: Arc<dyn Prober>,
    workers: usize,
    request_delay: Duration,
) -> Vec<(CandidateUrl, ProbeOutcome)> {
    // No point in starting more workers than there are jobs
    let workers = workers.min(candidates.len());
    let (job_tx, job_rx) = mpsc::channel(candidates.len().max(1));
    let queue: JobQueue = Arc::new(Mutex::new(job_rx));
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();

    let mut pool = JoinSet::new();
    for id in 0..workers {
        let worker = Worker {
            id,
            queue: Arc::clone(&queue),
            prober: Arc::clone(&prober),
            outcomes: outcome_tx.clone(),
        };
        pool.spawn(worker.run());
    }
    // Only the workers hold senders now, so the channel closes when they exit
    drop(outcome_tx);

    debug!("Started {} workers for {} jobs", workers, candidates.len());

    for (index, url) in candidates.into_iter().enumerate() {
        if index > 0 && !request_delay.is_zero() {
            tokio::time::sleep(request_delay).await;
        }
        if job_tx.send(url).await.is_err() {
            warn!("Job queue closed before every job was submitted");
            break;
        }
    }
    drop(job_tx);

    while let Some(joined) = pool.join_next().await {
        if let Err(e) = joined {
            warn!("Worker task failed: {}", e);
        }
    }

    let mut outcomes = Vec::new();
    while let Some(pair) = outcome_rx.recv().await {
        outcomes.push(pair);
    }
    outcomes
}
