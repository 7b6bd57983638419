//! Worker event log
//!
//! Appends JSON lines to `<state>/events.log`: installs, activations,
//! partition purges, offline fallbacks, push receipts. On by default and
//! opt-out via config; an edge cache that misbehaves offline is hard to
//! debug without a trail.

use crate::config::{schema::Config, ConfigManager};
use chrono::Utc;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// File-based event logger that appends JSON lines
pub struct EventLog {
    enabled: bool,
    path: PathBuf,
}

impl EventLog {
    /// Create a new event logger from config
    pub fn new(config: &Config) -> Self {
        Self {
            enabled: config.general.event_log,
            path: ConfigManager::event_log_path(),
        }
    }

    /// An event logger that drops everything; used by tests and embedded
    /// hosts that bring their own telemetry
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            path: PathBuf::new(),
        }
    }

    /// The log file location
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Record an event as a JSON line
    ///
    /// Silently drops events on IO failure — the event log must never
    /// block or fail the request path.
    pub async fn record(&self, event: &str, data: &serde_json::Value) {
        if !self.enabled {
            return;
        }

        let entry = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "event": event,
            "data": data,
        });

        let mut line = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize event: {}", e);
                return;
            }
        };
        line.push('\n');

        if let Err(e) = self.append(&line).await {
            warn!("Failed to write event log: {}", e);
        }
    }

    async fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_event_log(dir: &TempDir, enabled: bool) -> EventLog {
        EventLog {
            enabled,
            path: dir.path().join("events.log"),
        }
    }

    #[tokio::test]
    async fn writes_json_line() {
        let dir = TempDir::new().unwrap();
        let events = test_event_log(&dir, true);

        events
            .record(
                "worker.activated",
                &serde_json::json!({"partition": "koun-shell-v4"}),
            )
            .await;

        let content = tokio::fs::read_to_string(&events.path).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(content.trim()).unwrap();

        assert_eq!(parsed["event"], "worker.activated");
        assert_eq!(parsed["data"]["partition"], "koun-shell-v4");
        assert!(parsed["timestamp"].is_string());
    }

    #[tokio::test]
    async fn appends_multiple_lines() {
        let dir = TempDir::new().unwrap();
        let events = test_event_log(&dir, true);

        events.record("event.one", &serde_json::json!({})).await;
        events.record("event.two", &serde_json::json!({})).await;

        let content = tokio::fs::read_to_string(&events.path).await.unwrap();
        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);
    }

    #[tokio::test]
    async fn skips_when_disabled() {
        let dir = TempDir::new().unwrap();
        let events = test_event_log(&dir, false);

        events.record("should.not.appear", &serde_json::json!({})).await;

        assert!(!events.path.exists());
    }
}
