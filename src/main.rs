// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing) on stderr
// 3. Build the run configuration (defaults < config file < flags)
// 4. Dispatch to the appropriate subcommand handler
// 5. Print results on stdout
// 6. Exit with proper code (0 = nothing exposed, 1 = exposed paths, 2 = error)
// =============================================================================

mod cli; // src/cli.rs - command-line parsing

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ScanArgs, TargetArgs};
use exposure_scout::candidates::{load_candidates, CandidateGenerator};
use exposure_scout::results::ResultSet;
use exposure_scout::{scan, CrawlConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_json);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins; otherwise the --log-level flag decides
fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("exposure_scout={}", level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Scan(args) => handle_scan(&args).await,
        Commands::Candidates(args) => handle_candidates(&args).await,
    }
}

// Handles the 'scan' subcommand
async fn handle_scan(args: &ScanArgs) -> Result<i32> {
    let config = CrawlConfig::resolve(args.target.config.as_deref(), args.overrides())
        .context("Failed to build the scan configuration")?;

    eprintln!("🔍 Scanning hosts from: {}", config.src.display());

    let results = scan::run_scan(&config)
        .await
        .with_context(|| format!("Failed to scan the hosts in {}", config.src.display()))?;

    print_results(&results, &config, args)?;
    print_summary(&results);

    if results.positive().is_empty() {
        Ok(0)
    } else {
        Ok(1) // Exit code 1 = at least one exposed path
    }
}

// Handles the 'candidates' subcommand: no requests are sent
async fn handle_candidates(args: &TargetArgs) -> Result<i32> {
    let config = CrawlConfig::resolve(args.config.as_deref(), args.overrides())
        .context("Failed to build the scan configuration")?;

    let generator = CandidateGenerator::with_scheme(&config.scheme, &config.uris);
    let candidates = load_candidates(&config.src, &generator)
        .await
        .with_context(|| format!("Failed to obtain the urls from {}", config.src.display()))?;

    let mut sorted: Vec<_> = candidates.iter().collect();
    sorted.sort();
    for url in sorted {
        println!("{}", url);
    }

    Ok(0)
}

// Prints either JSON, every candidate, or only the exposed ones
fn print_results(results: &ResultSet, config: &CrawlConfig, args: &ScanArgs) -> Result<()> {
    if args.json {
        let json_output = serde_json::to_string_pretty(&results.report_entries())?;
        println!("{}", json_output);
    } else if args.show_all {
        for (url, exposed) in results.all() {
            println!("{}:{}", url, exposed);
        }
    } else if config.show_results {
        for url in results.positive() {
            println!("{}", url);
        }
    }
    Ok(())
}

fn print_summary(results: &ResultSet) {
    let summary = results.summary();

    eprintln!();
    eprintln!("📊 Summary:");
    eprintln!("   🚨 Exposed: {}", summary.exposed);
    eprintln!("   🚫 Denied: {}", summary.denied);
    eprintln!("   🌐 Unreachable: {}", summary.unreachable);
    eprintln!("   ⏱️  Timed out: {}", summary.timed_out);
    eprintln!("   📋 Total: {}", summary.total);
}
