//! CLI command implementations

pub mod cache;
pub mod completions;
pub mod config;
pub mod fetch;
pub mod fingerprint;
pub mod install;
pub mod status;

pub use cache::execute as cache;
pub use completions::execute as completions;
pub use config::execute as config;
pub use fetch::execute as fetch;
pub use fingerprint::execute as fingerprint;
pub use install::execute as install;
pub use status::execute as status;

use crate::config::ConfigManager;
use crate::error::EdgeResult;
use crate::store::DiskStore;

/// Open the disk store every worker-facing command uses
pub(crate) async fn open_store() -> EdgeResult<DiskStore> {
    DiskStore::open(ConfigManager::cache_root()).await
}
