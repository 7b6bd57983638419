//! Worker lifecycle phases
//!
//! installing -> installed -> activating -> activated, with `redundant` as
//! the terminal phase for a worker superseded before it took control. The
//! host serializes transitions; this module only enforces their order.

use crate::error::{EdgeError, EdgeResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a worker instance is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerPhase {
    /// Seeding the shell manifest into the current partition
    Installing,
    /// Seeded and eligible to take over (no waiting gate; skip-waiting
    /// semantics)
    Installed,
    /// Purging stale partitions and claiming clients
    Activating,
    /// In control of the origin
    Activated,
    /// Superseded before activation completed; never leaves this phase
    Redundant,
}

impl WorkerPhase {
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Activating => "activating",
            Self::Activated => "activated",
            Self::Redundant => "redundant",
        }
    }

    /// Whether `self -> next` is a legal transition
    pub fn can_transition(&self, next: WorkerPhase) -> bool {
        matches!(
            (self, next),
            (Self::Installing, Self::Installed)
                | (Self::Installed, Self::Activating)
                | (Self::Activating, Self::Activated)
                | (Self::Installing, Self::Redundant)
                | (Self::Installed, Self::Redundant)
                | (Self::Activating, Self::Redundant)
        )
    }

    /// Validate a transition, returning the new phase
    pub fn transition(self, next: WorkerPhase) -> EdgeResult<WorkerPhase> {
        if self.can_transition(next) {
            Ok(next)
        } else {
            Err(EdgeError::Lifecycle {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Activated)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Redundant)
    }
}

impl fmt::Display for WorkerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_chain() {
        let phase = WorkerPhase::Installing
            .transition(WorkerPhase::Installed)
            .unwrap()
            .transition(WorkerPhase::Activating)
            .unwrap()
            .transition(WorkerPhase::Activated)
            .unwrap();
        assert!(phase.is_active());
    }

    #[test]
    fn cannot_skip_phases() {
        assert!(WorkerPhase::Installing
            .transition(WorkerPhase::Activating)
            .is_err());
        assert!(WorkerPhase::Installing
            .transition(WorkerPhase::Activated)
            .is_err());
        assert!(WorkerPhase::Installed
            .transition(WorkerPhase::Activated)
            .is_err());
    }

    #[test]
    fn redundant_reachable_before_activation_only() {
        assert!(WorkerPhase::Installing.can_transition(WorkerPhase::Redundant));
        assert!(WorkerPhase::Installed.can_transition(WorkerPhase::Redundant));
        assert!(WorkerPhase::Activating.can_transition(WorkerPhase::Redundant));
        assert!(!WorkerPhase::Activated.can_transition(WorkerPhase::Redundant));
    }

    #[test]
    fn redundant_is_terminal() {
        assert!(WorkerPhase::Redundant.is_terminal());
        assert!(!WorkerPhase::Redundant.can_transition(WorkerPhase::Installing));
        assert!(!WorkerPhase::Redundant.can_transition(WorkerPhase::Activated));
    }

    #[test]
    fn label_matches_display() {
        assert_eq!(WorkerPhase::Activated.to_string(), "activated");
        assert_eq!(WorkerPhase::Redundant.as_label(), "redundant");
    }
}
