//! Cache command - manage cache partitions

use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::Config;
use crate::error::EdgeResult;
use crate::store::{PartitionStats, PartitionStore};
use crate::ui::{self, UiContext};
use console::style;
use tracing::debug;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> EdgeResult<()> {
    let store = super::open_store().await?;

    match args.action {
        CacheAction::List { format } => list_partitions(&store, config, format).await,
        CacheAction::Purge { dry_run } => purge_stale(&store, config, dry_run).await,
        CacheAction::Clear { yes } => clear_all(&store, yes).await,
    }
}

struct PartitionRow {
    name: String,
    stats: PartitionStats,
    current: bool,
}

async fn collect_rows(
    store: &dyn PartitionStore,
    current: &str,
) -> EdgeResult<Vec<PartitionRow>> {
    let mut rows = Vec::new();
    for name in store.list_partitions().await? {
        let stats = store.stats(&name).await?;
        rows.push(PartitionRow {
            current: name == current,
            name,
            stats,
        });
    }
    Ok(rows)
}

async fn list_partitions(
    store: &dyn PartitionStore,
    config: &Config,
    format: OutputFormat,
) -> EdgeResult<()> {
    let rows = collect_rows(store, &config.worker.partition).await?;

    if rows.is_empty() {
        println!("No cache partitions found.");
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_table(&rows),
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Plain => {
            for row in &rows {
                println!("{}", row.name);
            }
        }
    }

    Ok(())
}

fn print_table(rows: &[PartitionRow]) {
    println!("{:<30} {:>8} {:>12}  {}", "PARTITION", "ENTRIES", "SIZE", "");
    println!("{}", "-".repeat(60));

    for row in rows {
        let marker = if row.current {
            style("current").green().to_string()
        } else {
            style("stale").dim().to_string()
        };
        println!(
            "{:<30} {:>8} {:>12}  {}",
            row.name,
            row.stats.entries,
            format_bytes(row.stats.bytes),
            marker
        );
    }

    println!();
    println!("Total: {} partition(s)", rows.len());
}

fn print_json(rows: &[PartitionRow]) -> EdgeResult<()> {
    #[derive(serde::Serialize)]
    struct PartitionJson {
        name: String,
        entries: usize,
        bytes: u64,
        current: bool,
    }

    let json_rows: Vec<PartitionJson> = rows
        .iter()
        .map(|r| PartitionJson {
            name: r.name.clone(),
            entries: r.stats.entries,
            bytes: r.stats.bytes,
            current: r.current,
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&json_rows)?);
    Ok(())
}

/// The activation GC pass, exposed as an ops command
async fn purge_stale(store: &dyn PartitionStore, config: &Config, dry_run: bool) -> EdgeResult<()> {
    let ctx = UiContext::detect();
    let current = &config.worker.partition;

    let stale: Vec<String> = store
        .list_partitions()
        .await?
        .into_iter()
        .filter(|name| name != current)
        .collect();

    if stale.is_empty() {
        println!("No stale partitions; only {} present.", current);
        return Ok(());
    }

    println!("Stale partitions (current is {}):", current);
    for name in &stale {
        println!("  {} {}", style("•").red(), name);
    }

    if dry_run {
        println!();
        println!("Dry run - nothing deleted.");
        return Ok(());
    }

    let mut deleted = 0;
    for name in &stale {
        debug!("Deleting partition {}", name);
        if store.delete_partition(name).await? {
            deleted += 1;
        }
    }

    ui::step_ok(&ctx, &format!("Deleted {} stale partition(s)", deleted));
    Ok(())
}

async fn clear_all(store: &dyn PartitionStore, skip_confirm: bool) -> EdgeResult<()> {
    let ctx = UiContext::detect().with_auto_yes(skip_confirm);
    let partitions = store.list_partitions().await?;

    if partitions.is_empty() {
        println!("No cache partitions to clear.");
        return Ok(());
    }

    println!("This will remove {} partition(s):", partitions.len());
    for name in &partitions {
        println!("  {} {}", style("•").red(), name);
    }
    println!();

    if !ui::confirm(&ctx, "Are you sure?", false).await? {
        println!("Aborted.");
        return Ok(());
    }

    let mut deleted = 0;
    for name in &partitions {
        if store.delete_partition(name).await? {
            deleted += 1;
        }
    }

    ui::step_ok(&ctx, &format!("Cleared {} partition(s)", deleted));
    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    match bytes {
        0..=1023 => format!("{} B", bytes),
        1024..=1048575 => format!("{:.1} KiB", bytes as f64 / KIB as f64),
        _ => format!("{:.1} MiB", bytes as f64 / MIB as f64),
    }
}
