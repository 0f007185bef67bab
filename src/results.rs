// src/results.rs
// =============================================================================
// Collects probe outcomes for one run.
//
// Lifecycle:
// 1. seeded with every candidate (all Unreachable) before dispatch starts
// 2. filled in by the dispatcher, which is the only writer
// 3. handed out read-only once dispatch returns
//
// Seeding first means a candidate can never go missing: if its probe task
// dies, the entry simply stays `false`.
// =============================================================================

use crate::candidates::CandidateUrl;
use crate::probe::ProbeOutcome;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    entries: HashMap<CandidateUrl, ProbeOutcome>,
}

// One line of the JSON report
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry<'a> {
    pub url: &'a CandidateUrl,
    pub exposed: bool,
    pub outcome: ProbeOutcome,
}

// How many candidates ended up in each outcome bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub exposed: usize,
    pub denied: usize,
    pub unreachable: usize,
    pub timed_out: usize,
}

impl ResultSet {
    pub(crate) fn seeded<'a, I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = &'a CandidateUrl>,
    {
        let entries = candidates
            .into_iter()
            .map(|url| (url.clone(), ProbeOutcome::Unreachable))
            .collect();
        Self { entries }
    }

    // Only overwrites candidates that were seeded, so the key set stays fixed
    pub(crate) fn record(&mut self, url: &CandidateUrl, outcome: ProbeOutcome) {
        if let Some(slot) = self.entries.get_mut(url) {
            *slot = outcome;
        }
    }

    // Every candidate with its boolean outcome, sorted by URL
    pub fn all(&self) -> BTreeMap<&CandidateUrl, bool> {
        self.entries
            .iter()
            .map(|(url, outcome)| (url, outcome.is_exposed()))
            .collect()
    }

    // Only the candidates that answered with a 2xx status
    pub fn positive(&self) -> BTreeSet<&CandidateUrl> {
        self.entries
            .iter()
            .filter(|(_, outcome)| outcome.is_exposed())
            .map(|(url, _)| url)
            .collect()
    }

    pub fn outcome(&self, url: &CandidateUrl) -> Option<ProbeOutcome> {
        self.entries.get(url).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            total: self.entries.len(),
            ..Summary::default()
        };
        for outcome in self.entries.values() {
            match outcome {
                ProbeOutcome::Success { .. } => summary.exposed += 1,
                ProbeOutcome::Denied { .. } => summary.denied += 1,
                ProbeOutcome::Unreachable => summary.unreachable += 1,
                ProbeOutcome::Timeout => summary.timed_out += 1,
            }
        }
        summary
    }

    // Sorted entries ready for serde_json
    pub fn report_entries(&self) -> Vec<ReportEntry<'_>> {
        let mut entries: Vec<ReportEntry<'_>> = self
            .entries
            .iter()
            .map(|(url, outcome)| ReportEntry {
                url,
                exposed: outcome.is_exposed(),
                outcome: *outcome,
            })
            .collect();
        entries.sort_by(|a, b| a.url.cmp(b.url));
        entries
    }
}
