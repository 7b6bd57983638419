//! Configuration schema for koun-edge
//!
//! Configuration is stored at `~/.config/koun-edge/config.toml`

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Worker identity and shell manifest
    pub worker: WorkerConfig,

    /// Interception bypass rules
    pub intercept: InterceptConfig,

    /// Outbound fetch settings
    pub fetch: FetchConfig,

    /// Fingerprint heuristic denylists and weights
    pub heuristics: HeuristicConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,

    /// Log format: "text" or "json"
    pub log_format: String,

    /// Enable the worker event log
    pub event_log: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: "text".to_string(),
            event_log: true,
        }
    }
}

/// Worker identity and shell manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Current cache partition; bumping this name is the only cache
    /// invalidation mechanism
    pub partition: String,

    /// Origin this worker controls; anything else is passed through
    pub origin: String,

    /// Paths seeded into the partition on install
    pub shell_manifest: Vec<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            partition: "koun-shell-v4".to_string(),
            origin: "https://shop.koun.app".to_string(),
            shell_manifest: vec![
                "/".to_string(),
                "/index.html".to_string(),
                "/manifest.webmanifest".to_string(),
            ],
        }
    }
}

/// Interception bypass rules
///
/// Requests matching any of these never touch the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterceptConfig {
    /// Path prefixes for live API traffic
    pub api_prefixes: Vec<String>,

    /// Dev-server path markers (module reload plumbing)
    pub internal_markers: Vec<String>,

    /// Query params whose presence marks a cache-busting request
    pub bust_params: Vec<String>,
}

impl Default for InterceptConfig {
    fn default() -> Self {
        Self {
            api_prefixes: vec!["/api/".to_string()],
            internal_markers: vec![
                "/@vite".to_string(),
                "/@react-refresh".to_string(),
                "/@fs/".to_string(),
                "/node_modules/".to_string(),
            ],
            bust_params: vec!["t".to_string()],
        }
    }
}

/// Outbound fetch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent on worker-originated fetches
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: format!("koun-edge/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Fingerprint heuristic denylists and weights
///
/// Kept as configuration data so deployments can tune the lists and test
/// suites can substitute fixtures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// GPU renderer substrings that indicate a virtual machine
    pub vm_renderers: Vec<String>,

    /// Exact screen resolutions typical of VM consoles
    pub vm_resolutions: Vec<String>,

    /// User-agent substrings that indicate an anonymity tool
    pub anonymity_markers: Vec<String>,

    /// User-agent substrings that indicate a headless browser
    pub headless_markers: Vec<String>,

    /// Ordered user-agent substring -> OS label table; first match wins
    pub os_markers: Vec<OsMarker>,

    /// Additive risk score weights
    pub weights: RiskWeights,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            vm_renderers: vec![
                "swiftshader".to_string(),
                "llvmpipe".to_string(),
                "virtualbox".to_string(),
                "vmware".to_string(),
                "parallels".to_string(),
                "basic render driver".to_string(),
            ],
            vm_resolutions: vec![
                "1024x768".to_string(),
                "1280x800".to_string(),
                "800x600".to_string(),
            ],
            anonymity_markers: vec![
                "tor".to_string(),
                "vpn".to_string(),
                "proxy".to_string(),
            ],
            headless_markers: vec![
                "headless".to_string(),
                "phantomjs".to_string(),
                "puppeteer".to_string(),
            ],
            os_markers: vec![
                OsMarker::new("android", "Android"),
                OsMarker::new("iphone", "iOS"),
                OsMarker::new("ipad", "iOS"),
                OsMarker::new("windows", "Windows"),
                OsMarker::new("mac", "macOS"),
                OsMarker::new("linux", "Linux"),
            ],
            weights: RiskWeights::default(),
        }
    }
}

/// One entry of the ordered OS classification table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsMarker {
    /// Lowercase substring searched in the user agent
    pub needle: String,

    /// Label reported when the needle matches
    pub label: String,
}

impl OsMarker {
    pub fn new(needle: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
            label: label.into(),
        }
    }
}

/// Additive risk score weights
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub vm: u32,
    pub vpn: u32,
    pub cookies_disabled: u32,
    pub storage_disabled: u32,
    pub headless: u32,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            vm: 50,
            vpn: 30,
            cookies_disabled: 10,
            storage_disabled: 10,
            headless: 20,
        }
    }
}
