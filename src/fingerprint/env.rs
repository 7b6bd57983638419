//! Client environment attributes and probe seam
//!
//! The storefront page collects `EnvAttributes` synchronously; the two
//! probe results (canvas, GPU) arrive through `EnvProbes` so hosts can
//! wire real rendering surfaces and tests can pin fixture values.

use crate::error::EdgeResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Attributes readable without touching a rendering surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvAttributes {
    pub user_agent: String,

    pub language: String,

    /// Screen resolution as `"WxH"`
    pub screen: String,

    /// IANA timezone name, or the `"UTC"` placeholder
    pub timezone: String,

    /// Numeric UTC offset in minutes
    pub timezone_offset_min: i32,

    pub platform: String,

    /// Logical core count
    pub hardware_concurrency: u32,

    pub device_memory_gb: f64,

    pub cookies_enabled: bool,

    pub local_storage: bool,
}

impl Default for EnvAttributes {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            language: String::new(),
            screen: String::new(),
            timezone: String::new(),
            timezone_offset_min: 0,
            platform: String::new(),
            hardware_concurrency: 0,
            device_memory_gb: 0.0,
            // Browsers ship with both on; a capture that omits them
            // should not look like a locked-down client
            cookies_enabled: true,
            local_storage: true,
        }
    }
}

/// The full attribute tuple the visitor id hashes over
///
/// `gpu_renderer` and `canvas_hash` are probe-supplied and empty when the
/// probe was unavailable or failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientEnv {
    #[serde(flatten)]
    pub attrs: EnvAttributes,

    #[serde(default)]
    pub gpu_renderer: String,

    #[serde(default)]
    pub canvas_hash: String,
}

impl ClientEnv {
    pub fn new(attrs: EnvAttributes, gpu_renderer: String, canvas_hash: String) -> Self {
        Self {
            attrs,
            gpu_renderer,
            canvas_hash,
        }
    }
}

/// Probe seam for the two environment reads that can fail
///
/// Each probe degrades independently: an `Err` turns into an empty string
/// feature, never into a failed fingerprint.
#[async_trait]
pub trait EnvProbes: Send + Sync {
    /// Serialize the canvas probe bitmap to a string
    ///
    /// The single suspension point of the fingerprint computation.
    async fn canvas_data(&self) -> EdgeResult<String>;

    /// Unmasked GPU renderer identifier, if the surface exposes one
    fn gpu_renderer(&self) -> EdgeResult<String>;
}

/// Probes with pinned results; fixtures and captured-environment files
pub struct StaticProbes {
    gpu: String,
    canvas: String,
}

impl StaticProbes {
    pub fn new(gpu: impl Into<String>, canvas: impl Into<String>) -> Self {
        Self {
            gpu: gpu.into(),
            canvas: canvas.into(),
        }
    }

    /// Probes for an environment with no rendering surface at all
    pub fn unavailable() -> Self {
        Self::new("", "")
    }
}

#[async_trait]
impl EnvProbes for StaticProbes {
    async fn canvas_data(&self) -> EdgeResult<String> {
        Ok(self.canvas.clone())
    }

    fn gpu_renderer(&self) -> EdgeResult<String> {
        Ok(self.gpu.clone())
    }
}
