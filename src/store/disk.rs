//! Disk-backed partition store
//!
//! Layout: `<root>/<partition>/<hash>.json` plus `<hash>.body`, one pair per
//! entry, where `<hash>` is the first 16 hex chars of SHA-256 of the cache
//! key. The metadata file carries the original key so partitions can be
//! listed without reverse hashing.

use super::{PartitionStats, PartitionStore};
use crate::error::{EdgeError, EdgeResult};
use crate::http::StoredResponse;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Metadata sidecar for one cache entry
#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    key: String,
    status: u16,
    headers: Vec<(String, String)>,
    stored_at: DateTime<Utc>,
    body_len: u64,
}

/// Partition store persisted under a root directory
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub async fn open(root: impl Into<PathBuf>) -> EdgeResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| EdgeError::StoreOpen {
                path: root.clone(),
                source: e,
            })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn partition_dir(&self, partition: &str) -> PathBuf {
        self.root.join(sanitize_name(partition))
    }

    fn entry_paths(&self, partition: &str, key: &str) -> (PathBuf, PathBuf) {
        let dir = self.partition_dir(partition);
        let hash = hash_key(key);
        (dir.join(format!("{hash}.json")), dir.join(format!("{hash}.body")))
    }
}

#[async_trait]
impl PartitionStore for DiskStore {
    async fn get(&self, partition: &str, key: &str) -> EdgeResult<Option<StoredResponse>> {
        let (meta_path, body_path) = self.entry_paths(partition, key);
        if !meta_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&meta_path)
            .await
            .map_err(|e| EdgeError::io(format!("reading entry meta {}", meta_path.display()), e))?;
        let meta: EntryMeta =
            serde_json::from_str(&content).map_err(|e| EdgeError::EntryCorrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        let body = fs::read(&body_path)
            .await
            .map_err(|e| EdgeError::EntryCorrupt {
                key: key.to_string(),
                reason: format!("missing body file: {e}"),
            })?;

        Ok(Some(StoredResponse {
            status: meta.status,
            headers: meta.headers,
            body,
            stored_at: meta.stored_at,
        }))
    }

    async fn put(&self, partition: &str, key: &str, entry: StoredResponse) -> EdgeResult<()> {
        let dir = self.partition_dir(partition);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| EdgeError::PartitionCreate {
                name: partition.to_string(),
                reason: e.to_string(),
            })?;

        let (meta_path, body_path) = self.entry_paths(partition, key);
        let meta = EntryMeta {
            key: key.to_string(),
            status: entry.status,
            headers: entry.headers,
            stored_at: entry.stored_at,
            body_len: entry.body.len() as u64,
        };

        // Body first; the meta file is the commit point, so a torn write
        // never yields a readable entry.
        fs::write(&body_path, &entry.body)
            .await
            .map_err(|e| EdgeError::io(format!("writing entry body {}", body_path.display()), e))?;
        let content = serde_json::to_string_pretty(&meta)?;
        fs::write(&meta_path, content)
            .await
            .map_err(|e| EdgeError::io(format!("writing entry meta {}", meta_path.display()), e))?;

        debug!("Stored {} in partition {}", key, partition);
        Ok(())
    }

    async fn list_partitions(&self) -> EdgeResult<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| EdgeError::io("reading cache root", e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| EdgeError::io("reading cache root entry", e))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map_err(|e| EdgeError::io("reading cache entry type", e))?
                .is_dir();
            if is_dir {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        names.sort();
        Ok(names)
    }

    async fn delete_partition(&self, partition: &str) -> EdgeResult<bool> {
        let dir = self.partition_dir(partition);
        if !dir.exists() {
            return Ok(false);
        }

        fs::remove_dir_all(&dir)
            .await
            .map_err(|e| EdgeError::io(format!("deleting partition {partition}"), e))?;
        debug!("Deleted partition {}", partition);
        Ok(true)
    }

    async fn keys(&self, partition: &str) -> EdgeResult<Vec<String>> {
        let mut keys = Vec::new();
        for meta in self.read_all_meta(partition).await? {
            keys.push(meta.key);
        }
        keys.sort();
        Ok(keys)
    }

    async fn stats(&self, partition: &str) -> EdgeResult<PartitionStats> {
        let mut stats = PartitionStats::default();
        for meta in self.read_all_meta(partition).await? {
            stats.entries += 1;
            stats.bytes += meta.body_len;
        }
        Ok(stats)
    }
}

impl DiskStore {
    /// Read every entry meta in a partition, skipping corrupt files
    async fn read_all_meta(&self, partition: &str) -> EdgeResult<Vec<EntryMeta>> {
        let dir = self.partition_dir(partition);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut metas = Vec::new();
        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| EdgeError::io(format!("reading partition {partition}"), e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| EdgeError::io("reading partition entry", e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let content = fs::read_to_string(&path)
                    .await
                    .map_err(|e| EdgeError::io(format!("reading {}", path.display()), e))?;
                match serde_json::from_str::<EntryMeta>(&content) {
                    Ok(meta) => metas.push(meta),
                    Err(e) => debug!("Skipping corrupt entry {}: {}", path.display(), e),
                }
            }
        }

        Ok(metas)
    }
}

/// First 16 hex chars of SHA-256; plenty within one partition
fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}

/// Restrict partition directory names to a safe charset
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}
