//! Cache partition stores
//!
//! A partition is a named, isolated bucket of request/response pairs. The
//! worker only writes to the current partition and deletes every other one
//! on activation; the rest of this API exists for ops tooling.

mod disk;
mod memory;

pub use disk::DiskStore;
pub use memory::MemoryStore;

use crate::error::EdgeResult;
use crate::http::StoredResponse;
use async_trait::async_trait;

/// Entry count and payload size of one partition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionStats {
    pub entries: usize,
    pub bytes: u64,
}

/// Storage backend for cache partitions
#[async_trait]
pub trait PartitionStore: Send + Sync {
    /// Look up an entry by cache key
    async fn get(&self, partition: &str, key: &str) -> EdgeResult<Option<StoredResponse>>;

    /// Insert or overwrite an entry
    async fn put(&self, partition: &str, key: &str, entry: StoredResponse) -> EdgeResult<()>;

    /// All partition names, sorted
    async fn list_partitions(&self) -> EdgeResult<Vec<String>>;

    /// Delete a whole partition; `Ok(false)` when it did not exist
    async fn delete_partition(&self, partition: &str) -> EdgeResult<bool>;

    /// Cache keys in a partition, sorted
    async fn keys(&self, partition: &str) -> EdgeResult<Vec<String>>;

    /// Entry count and byte size of a partition
    async fn stats(&self, partition: &str) -> EdgeResult<PartitionStats>;
}
