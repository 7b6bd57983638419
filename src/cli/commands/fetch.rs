//! Fetch command - run one request through the interception policy

use crate::cli::args::FetchArgs;
use crate::config::Config;
use crate::error::{EdgeError, EdgeResult};
use crate::events::EventLog;
use crate::http::{FetchRequest, Method, RequestMode, ResponseSource};
use crate::net::HttpNetwork;
use crate::ui::{self, UiContext};
use crate::worker::{LoggingClients, Worker};
use std::sync::Arc;
use tokio::fs;

/// Execute the fetch command
pub async fn execute(args: FetchArgs, config: &Config) -> EdgeResult<()> {
    let ctx = UiContext::detect();

    let method: Method = args.method.parse()?;
    let mode = if args.navigate {
        RequestMode::Navigate
    } else {
        RequestMode::Resource
    };

    let store = Arc::new(super::open_store().await?);
    let worker = Worker::resume_activated(
        config,
        store,
        Arc::new(HttpNetwork::new(&config.fetch)),
        Arc::new(LoggingClients),
        EventLog::new(config),
    );

    let req = FetchRequest::new(method, worker.resolve_url(&args.target), mode);
    let outcome = worker.handle_fetch(&req).await?;

    ui::key_value(&ctx, "url", &req.url);
    ui::key_value(&ctx, "status", &outcome.response.status.to_string());
    ui::key_value(&ctx, "source", outcome.source.as_label());
    ui::key_value(
        &ctx,
        "size",
        &format!("{} bytes", outcome.response.body.len()),
    );

    match outcome.source {
        ResponseSource::Bypass => ui::remark(&ctx, "Not intercepted; served straight from origin"),
        ResponseSource::Shell => ui::remark(&ctx, "Offline; served the cached shell document"),
        ResponseSource::Synthetic => ui::remark(&ctx, "Offline with no cached fallback"),
        ResponseSource::Cache | ResponseSource::Network => {}
    }

    if let Some(path) = args.output {
        fs::write(&path, &outcome.response.body)
            .await
            .map_err(|e| EdgeError::io(format!("writing body to {}", path.display()), e))?;
        ui::step_ok_detail(&ctx, "Body written", &path.display().to_string());
    }

    Ok(())
}
