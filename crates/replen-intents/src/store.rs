//! In-memory registry of LP intents.
//!
//! The [`IntentStore`] holds every registered intent for the current
//! process, keyed by intent id. Intents are registered as `Pending` and
//! only the settlement sweep moves them forward; readers always see a
//! consistent view because every operation takes the store lock.
//!
//! # Design
//!
//! - **Exclusive ownership of mutation**: handlers register and cancel,
//!   the executor settles. Nothing else writes.
//! - **Delay-based privacy**: an intent is invisible to settlement until
//!   its `execute_at` time has passed.
//! - **No persistence**: the store lives and dies with the process.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};

use replen_types::{ExecutorStatus, IntentId, IntentStatus, LpIntent};

use crate::executor::SettlementExecutor;

/// Thread-safe registry of LP intents.
///
/// Shared between registration handlers and the settlement executor task
/// behind an [`Arc`](std::sync::Arc). Critical sections are short: the
/// settlement call itself happens under the lock so a sweep observes and
/// updates each intent atomically.
#[derive(Debug, Default)]
pub struct IntentStore {
    /// All intents, keyed by id (time-ordered, so iteration is creation
    /// order).
    intents: Mutex<BTreeMap<IntentId, LpIntent>>,
    /// When the executor last swept the store.
    last_swept_at: Mutex<Option<DateTime<Utc>>>,
}

impl IntentStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            intents: Mutex::const_new(BTreeMap::new()),
            last_swept_at: Mutex::const_new(None),
        }
    }

    /// Register an intent. Returns its id.
    pub async fn register(&self, intent: LpIntent) -> IntentId {
        let id = intent.id;
        info!(
            intent_id = %id,
            action = ?intent.action,
            pool_id = intent.pool_id,
            amount = %intent.amount,
            execute_at = %intent.execute_at,
            "Intent registered"
        );
        let mut intents = self.intents.lock().await;
        intents.insert(id, intent);
        id
    }

    /// Number of intents in the store.
    pub async fn len(&self) -> usize {
        self.intents.lock().await.len()
    }

    /// Whether the store holds no intents.
    pub async fn is_empty(&self) -> bool {
        self.intents.lock().await.is_empty()
    }

    /// Fetch a single intent by id.
    pub async fn get(&self, id: IntentId) -> Option<LpIntent> {
        self.intents.lock().await.get(&id).cloned()
    }

    /// All intents, in creation order.
    pub async fn all(&self) -> Vec<LpIntent> {
        self.intents.lock().await.values().cloned().collect()
    }

    /// Pending intents whose `execute_at` has passed at `now`.
    pub async fn ready_at(&self, now: DateTime<Utc>) -> Vec<LpIntent> {
        self.intents
            .lock()
            .await
            .values()
            .filter(|intent| intent.is_ready_at(now))
            .cloned()
            .collect()
    }

    /// Cancel a pending intent. Returns `false` if the intent does not
    /// exist or is no longer pending.
    pub async fn cancel(&self, id: IntentId) -> bool {
        let mut intents = self.intents.lock().await;
        match intents.get_mut(&id) {
            Some(intent) if intent.status == IntentStatus::Pending => {
                intent.status = IntentStatus::Cancelled;
                info!(intent_id = %id, "Intent cancelled");
                true
            }
            _ => false,
        }
    }

    /// Settle every intent that is ready at `now`.
    ///
    /// Each ready intent is handed to the executor: success marks it
    /// `Executed` and stamps `executed_at`; failure marks it `Failed` and
    /// the sweep continues with the remaining intents. Returns the number
    /// of intents settled successfully.
    pub async fn settle_ready(
        &self,
        now: DateTime<Utc>,
        executor: &mut dyn SettlementExecutor,
    ) -> u64 {
        let mut settled: u64 = 0;
        {
            let mut intents = self.intents.lock().await;
            for intent in intents.values_mut() {
                if !intent.is_ready_at(now) {
                    continue;
                }
                match executor.settle(intent) {
                    Ok(()) => {
                        intent.status = IntentStatus::Executed;
                        intent.executed_at = Some(now);
                        settled = settled.saturating_add(1);
                    }
                    Err(err) => {
                        warn!(intent_id = %intent.id, %err, "Settlement failed");
                        intent.status = IntentStatus::Failed;
                    }
                }
            }
        }

        let mut last = self.last_swept_at.lock().await;
        *last = Some(now);
        settled
    }

    /// Executor-facing summary of the store at `now`.
    pub async fn status(&self, now: DateTime<Utc>) -> ExecutorStatus {
        let intents = self.intents.lock().await;
        let mut ready_pending: u64 = 0;
        let mut executed: u64 = 0;
        let mut failed: u64 = 0;
        for intent in intents.values() {
            if intent.is_ready_at(now) {
                ready_pending = ready_pending.saturating_add(1);
            }
            match intent.status {
                IntentStatus::Executed => executed = executed.saturating_add(1),
                IntentStatus::Failed => failed = failed.saturating_add(1),
                IntentStatus::Pending | IntentStatus::Cancelled => {}
            }
        }
        drop(intents);

        ExecutorStatus {
            ready_pending,
            executed,
            failed,
            last_swept_at: *self.last_swept_at.lock().await,
        }
    }
}
