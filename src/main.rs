//! Koun Edge - offline cache worker and client risk heuristics
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use koun_edge::cli::{Cli, Commands};
use koun_edge::config::{Config, ConfigManager};
use koun_edge::error::EdgeResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> EdgeResult<()> {
    let cli = Cli::parse();

    // Completions need neither config nor logging
    if let Commands::Completions(args) = cli.command {
        return koun_edge::cli::commands::completions(args);
    }

    let manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let config = manager.load().await?;

    init_logging(cli.verbose, &config);
    koun_edge::ui::init_theme();
    ConfigManager::ensure_state_dirs().await?;

    match cli.command {
        Commands::Completions(_) => unreachable!("Completions handled above"),
        Commands::Install(args) => koun_edge::cli::commands::install(args, &config).await,
        Commands::Fetch(args) => koun_edge::cli::commands::fetch(args, &config).await,
        Commands::Cache(args) => koun_edge::cli::commands::cache(args, &config).await,
        Commands::Fingerprint(args) => koun_edge::cli::commands::fingerprint(args, &config).await,
        Commands::Status => koun_edge::cli::commands::status(&config).await,
        Commands::Config(args) => koun_edge::cli::commands::config(args, &config, &manager).await,
    }
}

/// Logging: 0 = warn (spinners only), 1 = info, 2+ = debug; config can
/// raise the baseline to info and switch the format to JSON lines
fn init_logging(verbose: u8, config: &Config) {
    let level = match verbose {
        0 if config.general.verbose => "info",
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::new(format!("koun_edge={level}"));

    if config.general.log_format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .init();
    }
}
