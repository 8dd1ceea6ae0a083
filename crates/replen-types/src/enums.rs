//! Enumeration types for the RepLen activation engine.
//!
//! Covers the activation phase machine driven by the scheduler and the
//! action/status vocabulary of registered LP intents.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Activation phase
// ---------------------------------------------------------------------------

/// The phase of a gradual-activation run, derived from the tick counter.
///
/// A run walks these phases strictly forward: `Registered` at tick 0,
/// `Delaying` while the anti-front-running delay holds activation at zero,
/// `Ramping` while activation grows linearly, and `Activated` once the full
/// amount is live. No phase is revisited within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ActivationPhase {
    /// The intent is registered but the clock has not advanced yet.
    Registered,
    /// Inside the delay period; the entire amount is still buffered.
    Delaying,
    /// Inside the smoothing ramp; activation grows linearly per tick.
    Ramping,
    /// The full amount is active; terminal phase of a run.
    Activated,
}

// ---------------------------------------------------------------------------
// LP intent action
// ---------------------------------------------------------------------------

/// The liquidity operation a registered intent declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum IntentAction {
    /// Add liquidity to a pool.
    AddLiquidity,
    /// Remove liquidity from a pool.
    RemoveLiquidity,
    /// Rebalance an existing position.
    Rebalance,
}

// ---------------------------------------------------------------------------
// LP intent status
// ---------------------------------------------------------------------------

/// Lifecycle status of a registered LP intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum IntentStatus {
    /// Registered and waiting for its `execute_at` time to pass.
    Pending,
    /// Settled by the executor.
    Executed,
    /// Settlement was attempted and failed.
    Failed,
    /// Withdrawn by the owner before settlement.
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_ordering_matches_run_progression() {
        // The derive(Ord) declaration order is the run order, so a later
        // phase always compares greater than an earlier one.
        assert!(ActivationPhase::Registered < ActivationPhase::Delaying);
        assert!(ActivationPhase::Delaying < ActivationPhase::Ramping);
        assert!(ActivationPhase::Ramping < ActivationPhase::Activated);
    }

    #[test]
    fn enums_roundtrip_serde() {
        let json = serde_json::to_string(&IntentAction::AddLiquidity).ok();
        assert_eq!(json.as_deref(), Some("\"AddLiquidity\""));

        let status: Result<IntentStatus, _> = serde_json::from_str("\"Pending\"");
        assert_eq!(status.ok(), Some(IntentStatus::Pending));
    }
}
