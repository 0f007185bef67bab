// src/config.rs
// =============================================================================
// Run configuration.
//
// A CrawlConfig is built once in main.rs and then only borrowed. Nothing in
// the scanning core reads global state or re-parses flags.
//
// Layering (later wins):
//   1. built-in defaults (CrawlConfig::default)
//   2. optional TOML file, [scan] table
//   3. command-line flags (ConfigOverrides)
// =============================================================================

use crate::error::{Result, ScanError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

// How candidates are spread over concurrent probes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStrategy {
    /// Fixed set of long-lived workers pulling from a shared queue
    Pool,
    /// Groups of at most max_connections, with a pause between groups
    Batched,
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Upper bound on probes in flight at the same time
    pub max_connections: usize,
    /// Transport-level connection establishment timeout
    pub connect_timeout: Duration,
    /// Deadline for a whole request: connect, send and body read
    pub request_timeout: Duration,
    /// Pause between two batches (batched strategy only)
    pub batch_delay: Duration,
    /// Pause between two job submissions (both strategies)
    pub request_delay: Duration,
    /// Suffix paths appended to every hostname, e.g. ".git"
    pub uris: Vec<String>,
    pub show_results: bool,
    /// Hostname list, one per line
    pub src: PathBuf,
    pub strategy: DispatchStrategy,
    pub scheme: String,
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_connections: 150,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(5),
            batch_delay: Duration::ZERO,
            request_delay: Duration::ZERO,
            uris: vec![".env".to_string(), ".git".to_string()],
            show_results: true,
            src: PathBuf::from("urls.txt"),
            strategy: DispatchStrategy::Pool,
            scheme: "https".to_string(),
            user_agent: format!("exposure-scout/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

// Mirrors the [scan] table of the config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    scan: Option<ScanSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScanSection {
    max_connections: Option<usize>,
    connect_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    batch_delay_secs: Option<u64>,
    request_delay_secs: Option<u64>,
    uris: Option<Vec<String>>,
    show_results: Option<bool>,
    src: Option<PathBuf>,
    strategy: Option<DispatchStrategy>,
    scheme: Option<String>,
    user_agent: Option<String>,
}

// Values given on the command line. None means "not given, keep what we have".
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub max_connections: Option<usize>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub batch_delay_secs: Option<u64>,
    pub request_delay_secs: Option<u64>,
    pub uris: Vec<String>,
    pub show_results: Option<bool>,
    pub src: Option<PathBuf>,
    pub strategy: Option<DispatchStrategy>,
    pub scheme: Option<String>,
    pub user_agent: Option<String>,
}

impl CrawlConfig {
    // Builds the final configuration: defaults, then the optional file, then
    // the command-line overrides. The result is validated before returning.
    pub fn resolve(config_path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    // Loads a TOML file on top of the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ScanError::ConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|reason| ScanError::ConfigFile {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn from_toml_str(content: &str) -> std::result::Result<Self, String> {
        let file_config: FileConfig = toml::from_str(content).map_err(|e| e.to_string())?;
        let mut config = Self::default();

        if let Some(scan) = file_config.scan {
            config.apply(ConfigOverrides {
                max_connections: scan.max_connections,
                connect_timeout_secs: scan.connect_timeout_secs,
                request_timeout_secs: scan.request_timeout_secs,
                batch_delay_secs: scan.batch_delay_secs,
                request_delay_secs: scan.request_delay_secs,
                uris: scan.uris.unwrap_or_default(),
                show_results: scan.show_results,
                src: scan.src,
                strategy: scan.strategy,
                scheme: scan.scheme,
                user_agent: scan.user_agent,
            });
        }

        Ok(config)
    }

    fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(n) = overrides.max_connections {
            self.max_connections = n;
        }
        if let Some(secs) = overrides.connect_timeout_secs {
            self.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = overrides.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = overrides.batch_delay_secs {
            self.batch_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = overrides.request_delay_secs {
            self.request_delay = Duration::from_secs(secs);
        }
        // An empty list means "not given": the suffix set is replaced, never merged
        if !overrides.uris.is_empty() {
            self.uris = overrides.uris;
        }
        if let Some(show) = overrides.show_results {
            self.show_results = show;
        }
        if let Some(src) = overrides.src {
            self.src = src;
        }
        if let Some(strategy) = overrides.strategy {
            self.strategy = strategy;
        }
        if let Some(scheme) = overrides.scheme {
            self.scheme = scheme.to_ascii_lowercase();
        }
        if let Some(ua) = overrides.user_agent {
            self.user_agent = ua;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(ScanError::InvalidConfig(
                "max_connections must be at least 1".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ScanError::InvalidConfig(
                "request timeout must be greater than 0".to_string(),
            ));
        }
        if self.connect_timeout.is_zero() {
            return Err(ScanError::InvalidConfig(
                "connection timeout must be greater than 0".to_string(),
            ));
        }
        if self.uris.is_empty() {
            return Err(ScanError::InvalidConfig(
                "at least one suffix path is required".to_string(),
            ));
        }
        if self.scheme != "http" && self.scheme != "https" {
            return Err(ScanError::InvalidConfig(format!(
                "unsupported scheme '{}', expected http or https",
                self.scheme
            )));
        }
        Ok(())
    }
}
