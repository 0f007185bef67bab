// src/probe/http.rs
// =============================================================================
// This module probes candidate URLs with real HTTP GET requests.
//
// Key functionality:
// - One shared reqwest Client per run (connection pooling, cheap to clone)
// - Redirects are NOT followed: a 301 pointing at some login page on another
//   host would otherwise look like a hit
// - Two timeouts:
//     * connect_timeout: how long the transport may spend opening a connection
//     * request_timeout: deadline for the whole request, body included
// - The body is read and thrown away, we only look at the status code
// - Errors never leave this module: they become a ProbeOutcome
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - tokio::time::timeout: Wraps a future with a deadline and drops it
//   (cancelling the request) when the deadline passes
// - Traits: HttpProber is one implementation of the Prober trait
// =============================================================================

use super::{ProbeOutcome, Prober};
use crate::candidates::CandidateUrl;
use crate::config::CrawlConfig;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, trace};

#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    request_timeout: Duration,
}

impl HttpProber {
    // Builds the shared client from the run configuration
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            request_timeout: config.request_timeout,
        })
    }

    // Sends the GET and drains the body. Returns the status on success.
    async fn fetch_status(&self, url: &CandidateUrl) -> std::result::Result<StatusCode, reqwest::Error> {
        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();

        // Draining the body lets the connection go back to the pool.
        // A broken body does not change the classification.
        if let Err(e) = response.bytes().await {
            debug!("Failed to read body of {}: {}", url, e);
        }

        Ok(status)
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &CandidateUrl) -> ProbeOutcome {
        trace!("Starting request to: {}", url);

        let outcome = match tokio::time::timeout(self.request_timeout, self.fetch_status(url)).await {
            Ok(Ok(status)) => ProbeOutcome::from_status(status),
            Ok(Err(e)) => categorize_error(url, e),
            Err(_) => {
                debug!("Request to {} exceeded {:?}", url, self.request_timeout);
                ProbeOutcome::Timeout
            }
        };

        if outcome.is_exposed() {
            info!("[ Exposed ] {}", url);
        }

        outcome
    }
}

// Maps a reqwest error to an outcome and logs it
fn categorize_error(url: &CandidateUrl, error: reqwest::Error) -> ProbeOutcome {
    if error.is_timeout() {
        debug!("Timed out fetching {}: {}", url, error);
        ProbeOutcome::Timeout
    } else {
        debug!("Failed to fetch {}: {}", url, error);
        ProbeOutcome::Unreachable
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Policy::none()?
//    - With redirects disabled, reqwest hands us the 3xx response itself
//    - We classify that response like any other non-2xx status
//
// 2. Why read the body if we never look at it?
//    - An unread body keeps the connection busy, so it can't be reused
//    - The request deadline also covers the body, a server that trickles
//      bytes forever still ends up as Timeout
//
// 3. What does tokio::time::timeout return?
//    - Ok(value) if the inner future finished in time
//    - Err(Elapsed) if it didn't; the inner future is dropped, which aborts
//      the in-flight request without touching other probes
// -----------------------------------------------------------------------------
