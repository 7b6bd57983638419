//! Offline cache worker
//!
//! Owns the versioned shell partition and the interception policy:
//! installs by seeding the shell manifest, activates by purging every
//! other partition, serves cached-first with background revalidation,
//! and falls back to the shell document (or a synthetic 408) when the
//! network is down.
//!
//! One deliberate policy choice: a cache hit is always served as-is, even
//! seconds after a deploy. Freshness arrives via the detached revalidation
//! task; the only hard invalidation is bumping the partition name.

pub mod clients;
pub mod lifecycle;
pub mod policy;
pub mod push;

pub use clients::{ClientSurface, LoggingClients};
pub use lifecycle::WorkerPhase;
pub use policy::{decide, BypassReason, Decision};
pub use push::{Notification, PushPayload};

use crate::config::schema::{Config, InterceptConfig, WorkerConfig};
use crate::error::{EdgeError, EdgeResult};
use crate::events::EventLog;
use crate::http::{FetchOutcome, FetchRequest, Response, ResponseSource, StoredResponse};
use crate::net::Network;
use crate::store::PartitionStore;
use futures_util::future::join_all;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// The offline cache worker
pub struct Worker {
    cfg: WorkerConfig,
    rules: InterceptConfig,
    store: Arc<dyn PartitionStore>,
    net: Arc<dyn Network>,
    clients: Arc<dyn ClientSurface>,
    events: EventLog,
    phase: Mutex<WorkerPhase>,
}

impl Worker {
    /// A fresh worker instance, ready to install
    pub fn new(
        config: &Config,
        store: Arc<dyn PartitionStore>,
        net: Arc<dyn Network>,
        clients: Arc<dyn ClientSurface>,
        events: EventLog,
    ) -> Self {
        Self::with_phase(config, store, net, clients, events, WorkerPhase::Installing)
    }

    /// A worker whose lifecycle already completed in an earlier process
    ///
    /// Hosts persist the phase across restarts; tooling that serves one
    /// request at a time resumes straight into `Activated`.
    pub fn resume_activated(
        config: &Config,
        store: Arc<dyn PartitionStore>,
        net: Arc<dyn Network>,
        clients: Arc<dyn ClientSurface>,
        events: EventLog,
    ) -> Self {
        Self::with_phase(config, store, net, clients, events, WorkerPhase::Activated)
    }

    fn with_phase(
        config: &Config,
        store: Arc<dyn PartitionStore>,
        net: Arc<dyn Network>,
        clients: Arc<dyn ClientSurface>,
        events: EventLog,
        phase: WorkerPhase,
    ) -> Self {
        Self {
            cfg: config.worker.clone(),
            rules: config.intercept.clone(),
            store,
            net,
            clients,
            events,
            phase: Mutex::new(phase),
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> WorkerPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The partition this worker reads and writes
    pub fn partition(&self) -> &str {
        &self.cfg.partition
    }

    fn set_phase(&self, next: WorkerPhase) -> EdgeResult<()> {
        let mut guard = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = guard.transition(next)?;
        Ok(())
    }

    /// Resolve a path against the worker origin; absolute URLs pass through
    pub fn resolve_url(&self, path_or_url: &str) -> String {
        if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            return path_or_url.to_string();
        }
        let origin = self.cfg.origin.trim_end_matches('/');
        if path_or_url.starts_with('/') {
            format!("{origin}{path_or_url}")
        } else {
            format!("{origin}/{path_or_url}")
        }
    }

    /// Seed the shell manifest into the current partition
    ///
    /// All assets are fetched concurrently; any failure (transport or
    /// non-success status) fails the install and the phase stays
    /// `Installing` so the host can retry or supersede.
    pub async fn install(&self) -> EdgeResult<()> {
        let phase = self.phase();
        if phase != WorkerPhase::Installing {
            return Err(EdgeError::Lifecycle {
                from: phase.to_string(),
                to: WorkerPhase::Installed.to_string(),
            });
        }

        info!(
            "Installing: seeding {} shell assets into {}",
            self.cfg.shell_manifest.len(),
            self.cfg.partition
        );

        let seeds = self
            .cfg
            .shell_manifest
            .iter()
            .map(|path| self.seed_asset(path));
        for result in join_all(seeds).await {
            result?;
        }

        self.set_phase(WorkerPhase::Installed)?;
        self.events
            .record(
                "worker.installed",
                &serde_json::json!({
                    "partition": self.cfg.partition,
                    "assets": self.cfg.shell_manifest.len(),
                }),
            )
            .await;
        info!("Install complete");
        Ok(())
    }

    async fn seed_asset(&self, path: &str) -> EdgeResult<()> {
        let req = FetchRequest::get(self.resolve_url(path));
        let resp = self
            .net
            .fetch(&req)
            .await
            .map_err(|e| EdgeError::shell_seed(path, e.to_string()))?;
        if !resp.is_success() {
            return Err(EdgeError::shell_seed(path, format!("status {}", resp.status)));
        }

        self.store
            .put(
                &self.cfg.partition,
                &req.cache_key(),
                StoredResponse::from_response(&resp),
            )
            .await
            .map_err(|e| EdgeError::shell_seed(path, e.to_string()))?;
        debug!("Seeded {}", path);
        Ok(())
    }

    /// Purge every partition except the current one, then claim clients
    ///
    /// Returns the purged partition names. Purge and claim failures are
    /// logged and do not abort activation; the phase still advances.
    pub async fn activate(&self) -> EdgeResult<Vec<String>> {
        self.set_phase(WorkerPhase::Activating)?;
        info!("Activating: current partition is {}", self.cfg.partition);

        let purged = self.purge_stale_partitions().await;
        let claimed = match self.clients.claim().await {
            Ok(n) => n,
            Err(e) => {
                warn!("Client claim failed: {}", e);
                0
            }
        };

        self.set_phase(WorkerPhase::Activated)?;
        self.events
            .record(
                "worker.activated",
                &serde_json::json!({
                    "partition": self.cfg.partition,
                    "purged": purged,
                    "claimed": claimed,
                }),
            )
            .await;
        info!(
            "Activation complete: {} stale partitions purged, {} clients claimed",
            purged.len(),
            claimed
        );
        Ok(purged)
    }

    async fn purge_stale_partitions(&self) -> Vec<String> {
        let names = match self.store.list_partitions().await {
            Ok(names) => names,
            Err(e) => {
                warn!("Could not enumerate partitions: {}", e);
                return Vec::new();
            }
        };

        let mut purged = Vec::new();
        for name in names {
            if name == self.cfg.partition {
                continue;
            }
            match self.store.delete_partition(&name).await {
                Ok(_) => {
                    info!("Purged stale partition {}", name);
                    purged.push(name);
                }
                Err(e) => warn!("Failed to purge partition {}: {}", name, e),
            }
        }
        purged
    }

    /// Mark this worker superseded by a newer version
    ///
    /// Only legal before activation completes; replacing a controlling
    /// worker is the host's job.
    pub fn supersede(&self) -> EdgeResult<()> {
        let was = self.phase();
        self.set_phase(WorkerPhase::Redundant)?;
        info!("Worker superseded (was {})", was);
        Ok(())
    }

    /// Run one request through the interception policy
    ///
    /// Bypassed requests go straight to the network and their transport
    /// errors propagate; handled requests always resolve to a response.
    pub async fn handle_fetch(&self, req: &FetchRequest) -> EdgeResult<FetchOutcome> {
        let phase = self.phase();
        if !phase.is_active() {
            return Err(EdgeError::WorkerNotActive(phase.to_string()));
        }

        if let Decision::Bypass(reason) = policy::decide(req, &self.cfg.origin, &self.rules) {
            debug!("Bypassing {} {} ({})", req.method, req.url, reason);
            let response = self.net.fetch(req).await?;
            return Ok(FetchOutcome {
                response,
                source: ResponseSource::Bypass,
            });
        }

        let key = req.cache_key();

        // Cache I/O must never abort the response path
        let cached = match self.store.get(&self.cfg.partition, &key).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Cache read failed for {}: {}", key, e);
                None
            }
        };

        if let Some(entry) = cached {
            debug!("Cache hit: {}", key);
            self.spawn_revalidate(req.clone());
            return Ok(FetchOutcome {
                response: entry.to_response(),
                source: ResponseSource::Cache,
            });
        }

        debug!("Cache miss: {}", key);
        match self.net.fetch(req).await {
            Ok(response) => {
                if response.is_success() {
                    self.store_response(&key, &response).await;
                }
                Ok(FetchOutcome {
                    response,
                    source: ResponseSource::Network,
                })
            }
            Err(e) => {
                debug!("Network failed for {}: {}", key, e);
                Ok(self.offline_fallback(req).await)
            }
        }
    }

    async fn store_response(&self, key: &str, response: &Response) {
        let entry = StoredResponse::from_response(response);
        if let Err(e) = self.store.put(&self.cfg.partition, key, entry).await {
            warn!("Cache write failed for {}: {}", key, e);
        }
    }

    /// Offline resolution for a handled request: navigations get the
    /// cached root document when present, everything else the synthetic
    /// 408.
    async fn offline_fallback(&self, req: &FetchRequest) -> FetchOutcome {
        if req.is_navigation() {
            let shell_key = FetchRequest::get(self.resolve_url("/")).cache_key();
            match self.store.get(&self.cfg.partition, &shell_key).await {
                Ok(Some(shell)) => {
                    info!("Serving offline shell for {}", req.url);
                    self.events
                        .record(
                            "fetch.fallback",
                            &serde_json::json!({"url": req.url, "kind": "shell"}),
                        )
                        .await;
                    return FetchOutcome {
                        response: shell.to_response(),
                        source: ResponseSource::Shell,
                    };
                }
                Ok(None) => {}
                Err(e) => warn!("Shell lookup failed: {}", e),
            }
        }

        debug!("Serving synthetic 408 for {}", req.url);
        self.events
            .record(
                "fetch.fallback",
                &serde_json::json!({"url": req.url, "kind": "synthetic"}),
            )
            .await;
        FetchOutcome {
            response: Response::network_error(),
            source: ResponseSource::Synthetic,
        }
    }

    /// Detach a refresh behind a cache hit. The task owns its errors:
    /// nothing awaits it, no completion signal exists, and a failure only
    /// leaves the cached copy in place.
    fn spawn_revalidate(&self, req: FetchRequest) {
        let store = Arc::clone(&self.store);
        let net = Arc::clone(&self.net);
        let partition = self.cfg.partition.clone();
        tokio::spawn(async move {
            if let Err(e) = revalidate(store, net, &partition, &req).await {
                debug!("Background revalidation failed: {}", e);
            }
        });
    }

    /// Deliver a push message: parse, default, display
    pub async fn handle_push(&self, data: Option<&[u8]>) -> EdgeResult<Notification> {
        let phase = self.phase();
        if !phase.is_active() {
            return Err(EdgeError::WorkerNotActive(phase.to_string()));
        }

        let notification = Notification::from_payload(PushPayload::parse(data));
        info!("Push received: {}", notification.title);
        self.clients.show_notification(&notification).await?;
        self.events
            .record(
                "push.received",
                &serde_json::json!({"title": notification.title}),
            )
            .await;
        Ok(notification)
    }

    /// Dismiss the notification and bring a client to its target URL
    pub async fn handle_notification_click(&self, notification: &Notification) -> EdgeResult<()> {
        self.clients.dismiss(&notification.tag).await?;
        self.clients
            .open_or_focus(&self.resolve_url(&notification.url))
            .await?;
        Ok(())
    }
}

/// Refresh one cached entry from the network
///
/// Non-success statuses keep the cached copy; only a success-range
/// response overwrites it.
async fn revalidate(
    store: Arc<dyn PartitionStore>,
    net: Arc<dyn Network>,
    partition: &str,
    req: &FetchRequest,
) -> EdgeResult<()> {
    let response = net.fetch(req).await?;
    if !response.is_success() {
        debug!(
            "Revalidation of {} returned {}, keeping cached copy",
            req.url, response.status
        );
        return Ok(());
    }

    store
        .put(partition, &req.cache_key(), StoredResponse::from_response(&response))
        .await?;
    debug!("Revalidated {}", req.cache_key());
    Ok(())
}
