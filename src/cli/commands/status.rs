//! Status command - effective configuration and cache state
//!
//! Plain diagnostics, no network.

use crate::config::{Config, ConfigManager};
use crate::error::EdgeResult;
use crate::store::PartitionStore;
use console::{style, Emoji};

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "[OK] ");
static WARN: Emoji<'_, '_> = Emoji("⚠ ", "[WARN] ");

/// Execute the status command
pub async fn execute(config: &Config) -> EdgeResult<()> {
    println!("{}", style("Koun Edge Status").bold().cyan());
    println!();

    println!("{}", style("Worker:").bold());
    println!("  {} Partition: {}", CHECK, config.worker.partition);
    println!("  {} Origin: {}", CHECK, config.worker.origin);
    println!(
        "  {} Shell manifest: {} path(s)",
        CHECK,
        config.worker.shell_manifest.len()
    );

    println!();
    println!("{}", style("Cache:").bold());
    println!("  {} Root: {}", CHECK, ConfigManager::cache_root().display());

    let store = super::open_store().await?;
    let partitions = store.list_partitions().await?;
    if partitions.is_empty() {
        println!(
            "  {} No partitions yet - run: koun-edge install",
            WARN
        );
    } else {
        for name in &partitions {
            let stats = store.stats(name).await?;
            let marker = if *name == config.worker.partition {
                "current"
            } else {
                "stale"
            };
            println!(
                "  {} {} ({} entries, {} bytes, {})",
                CHECK, name, stats.entries, stats.bytes, marker
            );
        }
        let has_current = partitions.iter().any(|p| *p == config.worker.partition);
        if !has_current {
            println!(
                "  {} Current partition {} not seeded - run: koun-edge install",
                WARN, config.worker.partition
            );
        }
    }

    println!();
    println!("{}", style("Event log:").bold());
    if config.general.event_log {
        println!(
            "  {} Enabled: {}",
            CHECK,
            ConfigManager::event_log_path().display()
        );
    } else {
        println!("  {} Disabled in config", WARN);
    }

    Ok(())
}
