// src/dispatch/mod.rs
// =============================================================================
// This module runs the probes concurrently.
//
// Two strategies, same guarantees:
// - pool: a fixed number of workers pull jobs from a shared queue
// - batched: groups of at most max_connections, with a pause in between
//
// Guarantees:
// - never more than max_connections probes in flight
// - every candidate is probed exactly once
// - dispatch() returns only when every outcome is recorded
// - the returned ResultSet has exactly one entry per candidate
// =============================================================================

mod batch;
mod pool;

use crate::candidates::CandidateUrl;
use crate::config::{CrawlConfig, DispatchStrategy};
use crate::probe::Prober;
use crate::results::ResultSet;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

// Probes every candidate exactly once and collects the outcomes
//
// Parameters:
//   candidates: the URLs to probe (borrowed, the caller keeps the set)
//   prober: what actually probes one URL; HttpProber in production
//   config: concurrency bound, strategy and delays
//
// Returns: a ResultSet with one entry per candidate, even when probes fail
//
// Why seed the ResultSet first?
// - every candidate gets an entry before any task starts
// - a probe that never reports back (it panicked) still shows up as `false`
pub async fn dispatch(
    candidates: &HashSet<CandidateUrl>,
    prober: Arc<dyn Prober>,
    config: &CrawlConfig,
) -> ResultSet {
    let mut results = ResultSet::seeded(candidates);
    if candidates.is_empty() {
        return results;
    }

    // Sorted so two runs over the same input submit jobs in the same order
    let mut queue: Vec<CandidateUrl> = candidates.iter().cloned().collect();
    queue.sort();

    let limit = config.max_connections.max(1);
    info!(
        "Probing {} candidates with {:?} strategy, max {} concurrent",
        queue.len(),
        config.strategy,
        limit
    );

    let outcomes = match config.strategy {
        DispatchStrategy::Pool => pool::run_pool(queue, prober, limit, config.request_delay).await,
        DispatchStrategy::Batched => {
            batch::run_batched(queue, prober, limit, config.batch_delay, config.request_delay).await
        }
    };

    for (url, outcome) in &outcomes {
        results.record(url, *outcome);
    }

    info!("Finished probing. {} candidates scanned", results.len());
    results
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<dyn Prober>?
//    - Every task needs the prober, and tokio::spawn needs owned ('static) data
//    - Arc is a shared, reference-counted pointer: cloning it is cheap
//    - dyn Prober lets tests pass a fake prober without changing this code
//
// 2. What is JoinSet?
//    - A collection of spawned tasks that we can await one by one
//    - join_next() returns Err if the task panicked, instead of crashing us
//
// 3. Why is there no Mutex around the results?
//    - Tasks don't touch the ResultSet; they hand back (url, outcome) pairs
//    - Only dispatch() writes it, after the tasks are done
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{HttpProber, ProbeOutcome};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Records how many probes run at once and how often each URL was seen
    #[derive(Default)]
    struct CountingProber {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: Mutex<HashMap<String, usize>>,
        hold: Duration,
        exposed: Vec<String>,
    }

    impl CountingProber {
        fn holding(hold: Duration) -> Self {
            Self {
                hold,
                ..Self::default()
            }
        }

        fn total_calls(&self) -> usize {
            self.calls.lock().unwrap().values().sum()
        }

        fn max_seen(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Prober for CountingProber {
        async fn probe(&self, url: &CandidateUrl) -> ProbeOutcome {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;

            tokio::time::sleep(self.hold).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if self.exposed.iter().any(|e| e == url.as_str()) {
                ProbeOutcome::Success { status: 200 }
            } else {
                ProbeOutcome::Denied { status: 404 }
            }
        }
    }

    // Panics on any URL containing "boom", after counting the call
    #[derive(Default)]
    struct PanickingProber {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Prober for PanickingProber {
        async fn probe(&self, url: &CandidateUrl) -> ProbeOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if url.as_str().contains("boom") {
                panic!("blew up on {}", url);
            }
            ProbeOutcome::Success { status: 200 }
        }
    }

    fn candidates(n: usize) -> HashSet<CandidateUrl> {
        (0..n)
            .map(|i| CandidateUrl::parse(&format!("https://host{}.example.com/.git/", i)).unwrap())
            .collect()
    }

    fn config(strategy: DispatchStrategy, max_connections: usize) -> CrawlConfig {
        CrawlConfig {
            strategy,
            max_connections,
            ..CrawlConfig::default()
        }
    }

    async fn check_bound(strategy: DispatchStrategy, limit: usize, n: usize) {
        let prober = Arc::new(CountingProber::holding(Duration::from_millis(20)));
        let set = candidates(n);

        let results = dispatch(&set, prober.clone(), &config(strategy, limit)).await;

        assert_eq!(results.len(), n);
        assert_eq!(prober.total_calls(), n);
        assert!(prober.calls.lock().unwrap().values().all(|&c| c == 1));
        assert!(prober.max_seen() <= limit, "saw {} in flight, limit {}", prober.max_seen(), limit);
    }

    #[tokio::test]
    async fn test_pool_respects_concurrency_bound() {
        check_bound(DispatchStrategy::Pool, 3, 20).await;
    }

    #[tokio::test]
    async fn test_batched_respects_concurrency_bound() {
        check_bound(DispatchStrategy::Batched, 3, 20).await;
    }

    #[tokio::test]
    async fn test_single_connection_runs_one_at_a_time() {
        for strategy in [DispatchStrategy::Pool, DispatchStrategy::Batched] {
            let prober = Arc::new(CountingProber::holding(Duration::from_millis(5)));
            let results = dispatch(&candidates(5), prober.clone(), &config(strategy, 1)).await;

            assert_eq!(results.len(), 5);
            assert_eq!(prober.total_calls(), 5);
            assert_eq!(prober.max_seen(), 1);
        }
    }

    #[tokio::test]
    async fn test_pool_actually_runs_in_parallel() {
        let prober = Arc::new(CountingProber::holding(Duration::from_millis(50)));
        dispatch(&candidates(8), prober.clone(), &config(DispatchStrategy::Pool, 4)).await;
        assert!(prober.max_seen() > 1);
    }

    #[tokio::test]
    async fn test_empty_input_issues_no_probes() {
        for strategy in [DispatchStrategy::Pool, DispatchStrategy::Batched] {
            let prober = Arc::new(CountingProber::default());
            let results = dispatch(&HashSet::new(), prober.clone(), &config(strategy, 4)).await;

            assert!(results.is_empty());
            assert_eq!(prober.total_calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_outcomes_land_in_result_set() {
        let exposed = "https://host1.example.com/.git/".to_string();
        let prober = Arc::new(CountingProber {
            exposed: vec![exposed.clone()],
            ..CountingProber::default()
        });

        let results = dispatch(&candidates(4), prober, &config(DispatchStrategy::Pool, 2)).await;

        let positive: Vec<String> = results.positive().iter().map(|u| u.to_string()).collect();
        assert_eq!(positive, vec![exposed]);
        assert_eq!(results.all().values().filter(|v| !**v).count(), 3);
    }

    #[tokio::test]
    async fn test_batch_pause_only_between_batches() {
        let prober = Arc::new(CountingProber::default());
        let config = CrawlConfig {
            batch_delay: Duration::from_millis(150),
            ..config(DispatchStrategy::Batched, 2)
        };

        // 5 candidates in batches of 2 -> 3 batches -> 2 pauses
        let started = Instant::now();
        let results = dispatch(&candidates(5), prober, &config).await;
        let elapsed = started.elapsed();

        assert_eq!(results.len(), 5);
        assert!(elapsed >= Duration::from_millis(300), "too fast: {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(450), "trailing pause? {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_request_delay_spaces_out_submissions() {
        let prober = Arc::new(CountingProber::default());
        let config = CrawlConfig {
            request_delay: Duration::from_millis(40),
            ..config(DispatchStrategy::Pool, 4)
        };

        let started = Instant::now();
        dispatch(&candidates(4), prober.clone(), &config).await;

        // 4 submissions -> 3 gaps
        assert_eq!(prober.total_calls(), 4);
        assert!(started.elapsed() >= Duration::from_millis(120));
    }

    #[tokio::test]
    async fn test_single_job_has_no_trailing_delay() {
        for strategy in [DispatchStrategy::Pool, DispatchStrategy::Batched] {
            let prober = Arc::new(CountingProber::default());
            let config = CrawlConfig {
                request_delay: Duration::from_millis(500),
                batch_delay: Duration::from_millis(500),
                ..config(strategy, 4)
            };

            let started = Instant::now();
            let results = dispatch(&candidates(1), prober.clone(), &config).await;
            let elapsed = started.elapsed();

            assert_eq!(results.len(), 1);
            assert_eq!(prober.total_calls(), 1);
            assert!(elapsed < Duration::from_millis(400), "{:?}: waited {:?}", strategy, elapsed);
        }
    }

    #[tokio::test]
    async fn test_panic_on_one_url_leaves_the_rest_running() {
        let mut set = candidates(4);
        // "boom" sorts before every "host" entry, so it is the first job out
        let boom = CandidateUrl::parse("https://boom.example.com/.git/").unwrap();
        set.insert(boom.clone());

        for strategy in [DispatchStrategy::Pool, DispatchStrategy::Batched] {
            // A single worker has to survive the panic to reach the other four
            let prober = Arc::new(PanickingProber::default());
            let results = dispatch(&set, prober.clone(), &config(strategy, 1)).await;

            assert_eq!(prober.calls.load(Ordering::SeqCst), set.len(), "{:?}", strategy);
            assert_eq!(results.len(), 5);
            assert_eq!(results.positive().len(), 4);
            assert_eq!(results.outcome(&boom), Some(ProbeOutcome::Unreachable));
        }
    }

    #[tokio::test]
    async fn test_slow_target_does_not_stall_dispatch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow/"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;
        for fast in ["/fast-a/", "/fast-b/"] {
            Mock::given(method("GET"))
                .and(path(fast))
                .respond_with(ResponseTemplate::new(200))
                .mount(&server)
                .await;
        }

        let config = CrawlConfig {
            request_timeout: Duration::from_millis(200),
            connect_timeout: Duration::from_secs(2),
            ..config(DispatchStrategy::Pool, 4)
        };
        let prober = Arc::new(HttpProber::new(&config).unwrap());

        let url = |p: &str| CandidateUrl::parse(&format!("{}{}", server.uri(), p)).unwrap();
        let slow = url("/slow/");
        let set: HashSet<CandidateUrl> = [slow.clone(), url("/fast-a/"), url("/fast-b/")].into();

        let started = Instant::now();
        let results = dispatch(&set, prober, &config).await;
        let elapsed = started.elapsed();

        assert!(elapsed < Duration::from_secs(2), "took {:?}", elapsed);
        assert_eq!(results.len(), 3);
        assert_eq!(results.outcome(&slow), Some(ProbeOutcome::Timeout));
        assert_eq!(results.outcome(&url("/fast-a/")), Some(ProbeOutcome::Success { status: 200 }));
        assert_eq!(results.outcome(&url("/fast-b/")), Some(ProbeOutcome::Success { status: 200 }));
    }
}
