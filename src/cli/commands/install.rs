//! Install command - bring up the worker against the disk store

use crate::cli::args::InstallArgs;
use crate::config::Config;
use crate::error::EdgeResult;
use crate::events::EventLog;
use crate::net::HttpNetwork;
use crate::ui::{self, TaskSpinner, UiContext};
use crate::worker::{LoggingClients, Worker};
use std::sync::Arc;

/// Execute the install command
pub async fn execute(args: InstallArgs, config: &Config) -> EdgeResult<()> {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "Koun Edge Install");

    if args.dry_run {
        ui::step_info(
            &ctx,
            &format!("Would seed partition {}", config.worker.partition),
        );
        for path in &config.worker.shell_manifest {
            ui::key_value(&ctx, path, &resolve(config, path));
        }
        ui::outro_warn(&ctx, "Dry run - nothing seeded");
        return Ok(());
    }

    let store = Arc::new(super::open_store().await?);
    let worker = Worker::new(
        config,
        store,
        Arc::new(HttpNetwork::new(&config.fetch)),
        Arc::new(LoggingClients),
        EventLog::new(config),
    );

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!(
        "Seeding {} shell assets into {}...",
        config.worker.shell_manifest.len(),
        config.worker.partition
    ));

    if let Err(e) = worker.install().await {
        spinner.stop_error("Shell seeding failed");
        return Err(e);
    }
    spinner.stop("Shell manifest seeded");

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Activating: purging stale partitions...");
    let purged = match worker.activate().await {
        Ok(purged) => purged,
        Err(e) => {
            spinner.stop_error("Activation failed");
            return Err(e);
        }
    };

    if purged.is_empty() {
        spinner.stop("Activated; no stale partitions found");
    } else {
        spinner.stop(&format!(
            "Activated; purged {}: {}",
            purged.len(),
            purged.join(", ")
        ));
    }

    ui::outro_success(
        &ctx,
        &format!("Worker active on partition {}", config.worker.partition),
    );
    Ok(())
}

fn resolve(config: &Config, path: &str) -> String {
    let origin = config.worker.origin.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{origin}{path}")
    } else {
        format!("{origin}/{path}")
    }
}
