//! Core entity structs for the RepLen activation engine.
//!
//! Covers the per-tick [`ActivationSnapshot`] emitted by the scheduler,
//! the registered [`LpIntent`] record, and the [`ExecutorStatus`] summary
//! the settlement executor exposes for display.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ActivationPhase, IntentAction, IntentStatus};
use crate::ids::IntentId;

// ---------------------------------------------------------------------------
// ActivationSnapshot
// ---------------------------------------------------------------------------

/// The state of a gradual-activation run at one tick.
///
/// Snapshots are derived from the tick counter and the schedule — they are
/// recomputed each tick and never stored. All amounts are [`Decimal`], so
/// `active_amount + buffered_amount == total` holds exactly and the percent
/// fields always sum to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActivationSnapshot {
    /// The tick this snapshot was computed for (0 = freshly registered).
    pub tick: u64,
    /// Amount of liquidity already active in the pool.
    #[ts(as = "String")]
    pub active_amount: Decimal,
    /// Amount still buffered, waiting for the ramp to release it.
    #[ts(as = "String")]
    pub buffered_amount: Decimal,
    /// Active share of the total, in percent (0 to 100, one exact value).
    #[ts(as = "String")]
    pub active_percent: Decimal,
    /// Buffered share of the total, in percent (`100 - active_percent`).
    #[ts(as = "String")]
    pub buffered_percent: Decimal,
    /// Current phase of the run.
    pub phase: ActivationPhase,
    /// Overall run progress in [0, 1], non-decreasing over a run.
    #[ts(as = "String")]
    pub progress: Decimal,
    /// Configured delay length, carried along for display labels.
    pub delay_blocks: u64,
    /// Configured ramp length, carried along for display labels.
    pub ramp_blocks: u64,
}

impl ActivationSnapshot {
    /// Total amount covered by this snapshot (active + buffered).
    ///
    /// Saturates at [`Decimal::MAX`]; both parts come from one schedule
    /// whose total is a plain configured amount, so saturation never
    /// happens in practice.
    pub fn total_amount(&self) -> Decimal {
        self.active_amount
            .checked_add(self.buffered_amount)
            .unwrap_or(Decimal::MAX)
    }
}

// ---------------------------------------------------------------------------
// LpIntent
// ---------------------------------------------------------------------------

/// A registered liquidity-provision intent.
///
/// Intents are declared, held for a privacy delay, and only then settled
/// by the executor. The record is plain data: the store owns mutation and
/// the executor drives status transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LpIntent {
    /// Unique intent identifier (time-ordered).
    pub id: IntentId,
    /// The liquidity operation declared.
    pub action: IntentAction,
    /// Owner wallet address (opaque string, checksummed upstream).
    pub address: String,
    /// Target pool identifier, e.g. `"ETH/USDC"`.
    pub pool_id: String,
    /// Nominal intent size.
    #[ts(as = "String")]
    pub amount: Decimal,
    /// Address that signed the intent.
    pub signed_by: String,
    /// Current lifecycle status.
    pub status: IntentStatus,
    /// When the intent was registered.
    pub created_at: DateTime<Utc>,
    /// Earliest time the executor may settle this intent.
    pub execute_at: DateTime<Utc>,
    /// When the intent was settled, `None` while pending.
    pub executed_at: Option<DateTime<Utc>>,
}

impl LpIntent {
    /// Build a fresh pending intent.
    ///
    /// Stamps a new [`IntentId`] and `created_at = now`; `execute_at` is
    /// supplied by the caller because the privacy delay is policy, not a
    /// property of the record.
    pub fn new(
        action: IntentAction,
        address: impl Into<String>,
        pool_id: impl Into<String>,
        amount: Decimal,
        signed_by: impl Into<String>,
        execute_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: IntentId::new(),
            action,
            address: address.into(),
            pool_id: pool_id.into(),
            amount,
            signed_by: signed_by.into(),
            status: IntentStatus::Pending,
            created_at: Utc::now(),
            execute_at,
            executed_at: None,
        }
    }

    /// Whether the intent is pending and its settlement time has passed.
    pub fn is_ready_at(&self, now: DateTime<Utc>) -> bool {
        self.status == IntentStatus::Pending && self.execute_at <= now
    }
}

// ---------------------------------------------------------------------------
// ExecutorStatus
// ---------------------------------------------------------------------------

/// Summary of the settlement executor's view of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ExecutorStatus {
    /// Pending intents whose `execute_at` has already passed.
    pub ready_pending: u64,
    /// Intents settled successfully.
    pub executed: u64,
    /// Intents whose settlement failed.
    pub failed: u64,
    /// When the executor last swept the store, `None` before the first sweep.
    pub last_swept_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn snapshot_total_is_sum_of_parts() {
        let snap = ActivationSnapshot {
            tick: 8,
            active_amount: Decimal::from(3000),
            buffered_amount: Decimal::from(7000),
            active_percent: Decimal::from(30),
            buffered_percent: Decimal::from(70),
            phase: ActivationPhase::Ramping,
            progress: Decimal::new(5333, 4),
            delay_blocks: 5,
            ramp_blocks: 10,
        };
        assert_eq!(snap.total_amount(), Decimal::from(10_000));
    }

    #[test]
    fn fresh_intent_is_pending() {
        let intent = LpIntent::new(
            IntentAction::AddLiquidity,
            "0xabc",
            "ETH/USDC",
            Decimal::from(10_000),
            "0xabc",
            Utc::now(),
        );
        assert_eq!(intent.status, IntentStatus::Pending);
        assert!(intent.executed_at.is_none());
    }

    #[test]
    fn readiness_respects_execute_at() {
        let now = Utc::now();
        let future = LpIntent::new(
            IntentAction::Rebalance,
            "0xabc",
            "ETH/USDC",
            Decimal::from(500),
            "0xabc",
            now + Duration::seconds(60),
        );
        assert!(!future.is_ready_at(now));
        assert!(future.is_ready_at(now + Duration::seconds(61)));

        let mut past = future.clone();
        past.execute_at = now - Duration::seconds(1);
        assert!(past.is_ready_at(now));

        past.status = IntentStatus::Executed;
        assert!(!past.is_ready_at(now));
    }

    #[test]
    fn intent_roundtrip_serde() {
        let intent = LpIntent::new(
            IntentAction::RemoveLiquidity,
            "0xdef",
            "WBTC/ETH",
            Decimal::from(250),
            "0xdef",
            Utc::now(),
        );
        let json = serde_json::to_string(&intent).unwrap();
        let restored: LpIntent = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, intent);
    }
}
