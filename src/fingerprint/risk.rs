//! Risk heuristics
//!
//! Pure functions from an environment record plus configuration data to
//! boolean indicators and the additive risk score. Every denylist comes
//! in through `HeuristicConfig` so deployments can tune them and tests
//! can substitute fixtures.

use super::env::{ClientEnv, EnvAttributes};
use crate::config::schema::{HeuristicConfig, OsMarker};

pub const UNKNOWN_OS: &str = "Unknown";

/// Virtual machine indicator
///
/// True when the GPU renderer matches a known software/virtual renderer,
/// or the screen resolution is one of the common VM console defaults.
pub fn is_vm(env: &ClientEnv, cfg: &HeuristicConfig) -> bool {
    let renderer = env.gpu_renderer.to_lowercase();
    cfg.vm_renderers
        .iter()
        .any(|needle| renderer.contains(&needle.to_lowercase()))
        || cfg.vm_resolutions.iter().any(|r| *r == env.attrs.screen)
}

/// VPN/proxy indicator
///
/// Legacy heuristic preserved as shipped: a reported `"UTC"` timezone
/// with a non-zero numeric offset is an internal inconsistency, and an
/// anonymity-tool marker in the user agent counts as well. Best-effort
/// signal with a high false-negative rate; not a security control.
pub fn is_vpn_suspect(attrs: &EnvAttributes, cfg: &HeuristicConfig) -> bool {
    if attrs.timezone == "UTC" && attrs.timezone_offset_min != 0 {
        return true;
    }
    let ua = attrs.user_agent.to_lowercase();
    cfg.anonymity_markers
        .iter()
        .any(|needle| ua.contains(&needle.to_lowercase()))
}

/// Headless-browser indicator
pub fn is_headless(attrs: &EnvAttributes, cfg: &HeuristicConfig) -> bool {
    let ua = attrs.user_agent.to_lowercase();
    cfg.headless_markers
        .iter()
        .any(|needle| ua.contains(&needle.to_lowercase()))
}

/// Ordered substring scan over the user agent; first match wins
pub fn classify_os(user_agent: &str, markers: &[OsMarker]) -> String {
    let ua = user_agent.to_lowercase();
    markers
        .iter()
        .find(|m| ua.contains(&m.needle.to_lowercase()))
        .map(|m| m.label.clone())
        .unwrap_or_else(|| UNKNOWN_OS.to_string())
}

/// Additive risk score
///
/// Starts at 0, adds the configured weight per positive indicator, with
/// no normalization and no upper bound.
pub fn risk_score(env: &ClientEnv, cfg: &HeuristicConfig) -> u32 {
    let w = &cfg.weights;
    let mut score = 0;

    if is_vm(env, cfg) {
        score += w.vm;
    }
    if is_vpn_suspect(&env.attrs, cfg) {
        score += w.vpn;
    }
    if !env.attrs.cookies_enabled {
        score += w.cookies_disabled;
    }
    if !env.attrs.local_storage {
        score += w.storage_disabled;
    }
    if is_headless(&env.attrs, cfg) {
        score += w.headless;
    }

    score
}
