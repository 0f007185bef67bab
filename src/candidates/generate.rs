// src/candidates/generate.rs
// =============================================================================
// Turns one hostname into the set of URLs we want to probe.
//
// For every suffix path we build two candidates:
//   https://<host>/<suffix>/
//   https://www.<host>/<suffix>/
//
// Both variants are always kept, even when they end up at the same server.
//
// Normalization rules (deterministic and idempotent):
// - whitespace around the hostname and the suffix is dropped
// - trailing slashes on the hostname are dropped
// - leading/trailing slashes on the suffix are dropped
// - host and suffix are joined with exactly one '/', and the path always ends
//   with '/'
//
// Every joined string is validated with the `url` crate. One bad candidate
// aborts the whole generation step (the caller decides what that means).
//
// IP-literal hosts are the exception: "www.192.168.1.10" is not a valid host,
// but the line itself is fine. That www. variant is kept as-is and simply
// fails when probed, so it is reported as `false` like any unreachable host.
// =============================================================================

use crate::error::{Result, ScanError};
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use url::{Host, Url};

// Characters that would silently move part of the hostname into the path,
// query, fragment or userinfo of the URL
const FORBIDDEN_HOST_CHARS: [char; 4] = ['/', '?', '#', '@'];

// An absolute URL to probe, stored in its serialized form. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateUrl(String);

impl CandidateUrl {
    // Parses an already-joined absolute URL
    pub fn parse(raw: &str) -> Result<Self> {
        parse_url(raw).map(|url| Self(url.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CandidateUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| ScanError::MalformedCandidate {
        candidate: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.host_str().is_none() {
        return Err(ScanError::MalformedCandidate {
            candidate: raw.to_string(),
            reason: "URL has no host".to_string(),
        });
    }

    Ok(url)
}

// Holds the scheme and the suffix set so every hostname is expanded the same way
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    scheme: String,
    suffixes: Vec<String>,
}

impl CandidateGenerator {
    pub fn new(suffixes: &[String]) -> Self {
        Self::with_scheme("https", suffixes)
    }

    pub fn with_scheme(scheme: &str, suffixes: &[String]) -> Self {
        Self {
            scheme: scheme.to_string(),
            suffixes: suffixes.to_vec(),
        }
    }

    // Expands a single hostname line. Blank lines give an empty set.
    pub fn generate(&self, hostname: &str) -> Result<HashSet<CandidateUrl>> {
        let mut candidates = HashSet::new();

        let host = normalize_host(hostname);
        if host.is_empty() {
            return Ok(candidates);
        }

        if let Some(bad) = host
            .chars()
            .find(|c| c.is_whitespace() || FORBIDDEN_HOST_CHARS.contains(c))
        {
            return Err(ScanError::MalformedCandidate {
                candidate: host.to_string(),
                reason: format!("hostname contains invalid character {:?}", bad),
            });
        }

        for suffix in &self.suffixes {
            let bare = parse_url(&self.join(host, suffix))?;
            let ip_literal = matches!(bare.host(), Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)));
            candidates.insert(CandidateUrl(bare.to_string()));

            let www = self.join(&format!("www.{}", host), suffix);
            if ip_literal {
                // Not a valid URL, but still one hypothesis to report
                candidates.insert(CandidateUrl(www));
            } else {
                candidates.insert(CandidateUrl::parse(&www)?);
            }
        }

        Ok(candidates)
    }

    // Expands every line. Stops at the first malformed candidate.
    pub fn generate_all<'a, I>(&self, lines: I) -> Result<HashSet<CandidateUrl>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut candidates = HashSet::new();
        for line in lines {
            candidates.extend(self.generate(line)?);
        }
        Ok(candidates)
    }

    // Joins host and suffix with exactly one '/', no validation
    fn join(&self, host: &str, suffix: &str) -> String {
        let suffix = normalize_suffix(suffix);
        if suffix.is_empty() {
            format!("{}://{}/", self.scheme, host)
        } else {
            format!("{}://{}/{}/", self.scheme, host, suffix)
        }
    }
}

// Convenience wrapper using the default https scheme
pub fn generate(hostname: &str, suffixes: &[String]) -> Result<HashSet<CandidateUrl>> {
    CandidateGenerator::new(suffixes).generate(hostname)
}

fn normalize_host(hostname: &str) -> &str {
    hostname.trim().trim_end_matches('/')
}

fn normalize_suffix(suffix: &str) -> &str {
    suffix.trim().trim_matches('/')
}
