//! Fingerprint command - compute a record from a captured environment
//!
//! The storefront page serializes its collected attributes (including the
//! two probe results) to JSON; this command replays that capture through
//! the heuristic pipeline.

use crate::cli::args::{FingerprintArgs, OutputFormat};
use crate::config::Config;
use crate::error::{EdgeError, EdgeResult};
use crate::fingerprint::{compute_fingerprint, ClientEnv, StaticProbes};
use crate::ui::{self, UiContext};
use tokio::fs;

/// Execute the fingerprint command
pub async fn execute(args: FingerprintArgs, config: &Config) -> EdgeResult<()> {
    let ctx = UiContext::detect();

    let content = fs::read_to_string(&args.env)
        .await
        .map_err(|e| EdgeError::EnvCapture {
            path: args.env.clone(),
            reason: e.to_string(),
        })?;
    let env: ClientEnv = serde_json::from_str(&content).map_err(|e| EdgeError::EnvCapture {
        path: args.env.clone(),
        reason: e.to_string(),
    })?;

    // Captured probe results stand in for live probes
    let probes = StaticProbes::new(env.gpu_renderer.clone(), env.canvas_hash.clone());
    let record = compute_fingerprint(&env.attrs, &probes, &config.heuristics).await;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Table | OutputFormat::Plain => {
            ui::key_value(&ctx, "visitor_id", &record.visitor_id);
            ui::key_value(&ctx, "os", &record.os);
            ui::key_value_status(&ctx, "vm", &record.vm.to_string(), !record.vm);
            ui::key_value_status(
                &ctx,
                "vpn_suspect",
                &record.vpn_suspect.to_string(),
                !record.vpn_suspect,
            );
            ui::key_value_status(
                &ctx,
                "risk_score",
                &record.risk_score.to_string(),
                record.risk_score == 0,
            );
        }
    }

    Ok(())
}
