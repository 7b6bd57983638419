//! In-memory partition store
//!
//! Backs unit tests and ephemeral hosts; no persistence.

use super::{PartitionStats, PartitionStore};
use crate::error::EdgeResult;
use crate::http::StoredResponse;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

type Partitions = HashMap<String, HashMap<String, StoredResponse>>;

/// Partition store held entirely in memory
#[derive(Default)]
pub struct MemoryStore {
    partitions: RwLock<Partitions>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Partitions> {
        self.partitions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Partitions> {
        self.partitions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PartitionStore for MemoryStore {
    async fn get(&self, partition: &str, key: &str) -> EdgeResult<Option<StoredResponse>> {
        Ok(self
            .read()
            .get(partition)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    async fn put(&self, partition: &str, key: &str, entry: StoredResponse) -> EdgeResult<()> {
        self.write()
            .entry(partition.to_string())
            .or_default()
            .insert(key.to_string(), entry);
        Ok(())
    }

    async fn list_partitions(&self) -> EdgeResult<Vec<String>> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn delete_partition(&self, partition: &str) -> EdgeResult<bool> {
        Ok(self.write().remove(partition).is_some())
    }

    async fn keys(&self, partition: &str) -> EdgeResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .read()
            .get(partition)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }

    async fn stats(&self, partition: &str) -> EdgeResult<PartitionStats> {
        let partitions = self.read();
        let Some(entries) = partitions.get(partition) else {
            return Ok(PartitionStats::default());
        };
        Ok(PartitionStats {
            entries: entries.len(),
            bytes: entries.values().map(|e| e.size_bytes() as u64).sum(),
        })
    }
}
