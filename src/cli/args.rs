//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Koun Edge - offline cache worker and client risk heuristics
///
/// Operates the storefront's versioned shell cache (install, fetch,
/// partition GC) and computes fingerprint records from captured client
/// environments.
#[derive(Parser, Debug)]
#[command(name = "koun-edge")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "KOUN_EDGE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install and activate the worker (seed shell, purge stale partitions)
    Install(InstallArgs),

    /// Run one request through the interception policy
    Fetch(FetchArgs),

    /// Manage cache partitions
    Cache(CacheArgs),

    /// Compute a fingerprint record from a captured environment
    Fingerprint(FingerprintArgs),

    /// Show effective configuration and cache state
    Status,

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the install command
#[derive(Parser, Debug)]
pub struct InstallArgs {
    /// Print the shell manifest without fetching anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Absolute URL, or a path resolved against the worker origin
    pub target: String,

    /// Treat the request as a page navigation
    #[arg(long)]
    pub navigate: bool,

    /// HTTP method
    #[arg(short, long, default_value = "GET")]
    pub method: String,

    /// Write the response body to a file instead of summarizing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List all cache partitions
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Delete every partition except the current one
    Purge {
        /// Show what would be deleted without deleting
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete all partitions, including the current one
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the fingerprint command
#[derive(Parser, Debug)]
pub struct FingerprintArgs {
    /// JSON file with captured environment attributes
    #[arg(short, long)]
    pub env: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., worker.partition)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

/// Output format for list-style commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
