// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Every scan setting is an Option here: None means "not given on the command
// line", so values from the config file (or the defaults) stay in place.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use exposure_scout::{ConfigOverrides, DispatchStrategy};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "exposure-scout",
    version,
    about = "Probe hostnames for exposed sensitive paths like .git and .env",
    long_about = "exposure-scout reads a list of hostnames, builds candidate URLs for every \
                  configured suffix path (bare and www. variants) and reports which of them \
                  answer with a 2xx status."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level: trace, debug, info, warn or error (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines instead of plain text
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe every candidate URL and report the exposed ones
    ///
    /// Example: exposure-scout scan --file hosts.txt --concurrent 50
    Scan(ScanArgs),

    /// Print the candidate URLs that a scan would probe, without sending requests
    ///
    /// Example: exposure-scout candidates --file hosts.txt --uri .svn
    Candidates(TargetArgs),
}

// Settings shared by both subcommands: what to probe
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// File containing the hostnames to scan, one per line [default: urls.txt]
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Suffix path to probe on every host (repeatable) [default: .env, .git]
    #[arg(long = "uri", value_name = "PATH")]
    pub uris: Vec<String>,

    /// URL scheme for candidates: http or https [default: https]
    #[arg(long)]
    pub scheme: Option<String>,

    /// TOML configuration file with a [scan] table
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Max number of concurrent requests or workers [default: 150]
    #[arg(long)]
    pub concurrent: Option<usize>,

    /// Timeout (in seconds) before an http request is aborted [default: 5]
    #[arg(long)]
    pub req_timeout: Option<u64>,

    /// Timeout (in seconds) for opening a new connection [default: 10]
    #[arg(long)]
    pub conn_timeout: Option<u64>,

    /// Seconds to sleep after each batch of --concurrent requests (batched strategy)
    #[arg(long)]
    pub batch_sleep: Option<u64>,

    /// Seconds to sleep after submitting each request
    #[arg(long)]
    pub sleep: Option<u64>,

    /// How requests are scheduled [default: pool]
    #[arg(long, value_enum)]
    pub strategy: Option<DispatchStrategy>,

    /// User-Agent header sent with every probe
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Print the URLs that returned a valid response [default: true]
    #[arg(long, value_name = "BOOL")]
    pub show_results: Option<bool>,

    /// Print every candidate as <url>:<bool> instead of only the exposed ones
    #[arg(long)]
    pub show_all: bool,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

impl TargetArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            uris: self.uris.clone(),
            src: self.file.clone(),
            scheme: self.scheme.clone(),
            ..ConfigOverrides::default()
        }
    }
}

impl ScanArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            max_connections: self.concurrent,
            connect_timeout_secs: self.conn_timeout,
            request_timeout_secs: self.req_timeout,
            batch_delay_secs: self.batch_sleep,
            request_delay_secs: self.sleep,
            show_results: self.show_results,
            strategy: self.strategy,
            user_agent: self.user_agent.clone(),
            ..self.target.overrides()
        }
    }
}
