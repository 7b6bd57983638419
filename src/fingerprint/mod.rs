//! Client fingerprint heuristic
//!
//! Derives a stable pseudo-identifier and an additive risk score from
//! observable environment attributes. Runs in the page context, makes no
//! network calls, and persists nothing; callers own storage and
//! transmission. The computation never fails under normal operation:
//! each probe degrades independently to an empty feature.

pub mod env;
pub mod hash;
pub mod risk;

pub use env::{ClientEnv, EnvAttributes, EnvProbes, StaticProbes};
pub use hash::visitor_id;
pub use risk::{classify_os, is_headless, is_vm, is_vpn_suspect, risk_score};

use crate::config::schema::HeuristicConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The flat record handed to callers; JSON-serializable as-is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Hex hash over the full attribute tuple; low-confidence identity
    pub visitor_id: String,

    /// OS label from the ordered user-agent marker table
    pub os: String,

    /// Virtual machine indicator
    pub vm: bool,

    /// VPN/proxy indicator (legacy heuristic)
    pub vpn_suspect: bool,

    /// Additive score; 0 is clean, no upper bound
    pub risk_score: u32,
}

/// Compute the fingerprint record for one environment
///
/// Asynchronous for the canvas probe only; both probes suppress their own
/// failures and degrade to empty features.
pub async fn compute_fingerprint(
    attrs: &EnvAttributes,
    probes: &dyn EnvProbes,
    cfg: &HeuristicConfig,
) -> Fingerprint {
    let canvas_hash = match probes.canvas_data().await {
        Ok(data) => data,
        Err(e) => {
            debug!("Canvas probe failed: {}", e);
            String::new()
        }
    };
    let gpu_renderer = match probes.gpu_renderer() {
        Ok(renderer) => renderer,
        Err(e) => {
            debug!("GPU probe failed: {}", e);
            String::new()
        }
    };

    let env = ClientEnv::new(attrs.clone(), gpu_renderer, canvas_hash);

    Fingerprint {
        visitor_id: hash::visitor_id(&env),
        os: risk::classify_os(&env.attrs.user_agent, &cfg.os_markers),
        vm: risk::is_vm(&env, cfg),
        vpn_suspect: risk::is_vpn_suspect(&env.attrs, cfg),
        risk_score: risk::risk_score(&env, cfg),
    }
}
