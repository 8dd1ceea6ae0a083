//! Delayed settlement executor.
//!
//! Intents sit in the store until their privacy delay elapses; the
//! executor sweeps the store on a fixed cadence and settles whatever has
//! become ready. The chain boundary is the [`SettlementExecutor`] trait --
//! the demo ships [`LogSettlement`], which "settles" by structured logging
//! only. No network call, signature, or gas estimation happens here.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tracing::info;

use replen_types::LpIntent;

use crate::store::IntentStore;

/// Errors that can occur while settling an intent.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// The settlement backend rejected or failed the intent.
    #[error("settlement failed: {message}")]
    Settlement {
        /// Description of the failure.
        message: String,
    },
}

/// A settlement backend for ready intents.
///
/// Implementations submit the intent to whatever executes it -- a chain
/// client in production, a logger in the demo, a scripted fake in tests.
/// The store calls [`settle`] once per ready intent per sweep; an error
/// marks that intent `Failed` and the sweep moves on.
///
/// [`settle`]: SettlementExecutor::settle
pub trait SettlementExecutor: Send {
    /// Settle a single ready intent.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError`] when the backend cannot execute the
    /// intent; the caller records the failure and continues.
    fn settle(&mut self, intent: &LpIntent) -> Result<(), ExecutorError>;
}

/// A settlement stub that executes intents by logging them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSettlement;

impl SettlementExecutor for LogSettlement {
    fn settle(&mut self, intent: &LpIntent) -> Result<(), ExecutorError> {
        info!(
            intent_id = %intent.id,
            action = ?intent.action,
            pool_id = intent.pool_id,
            amount = %intent.amount,
            "Executing intent"
        );
        Ok(())
    }
}

/// Shared controls for the executor sweep loop.
///
/// The stop flag uses release/acquire ordering so a stop requested from
/// another task is observed before the next sweep fires.
#[derive(Debug)]
pub struct ExecutorControls {
    /// Set to request that the sweep loop exit after the current sweep.
    stop_requested: AtomicBool,
    /// Milliseconds between sweeps (0 = yield between sweeps, for tests).
    sweep_interval_ms: u64,
}

impl ExecutorControls {
    /// Create controls with the given sweep interval.
    pub const fn new(sweep_interval_ms: u64) -> Self {
        Self {
            stop_requested: AtomicBool::new(false),
            sweep_interval_ms,
        }
    }

    /// Request that the sweep loop exit.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// The configured sweep interval in milliseconds.
    pub const fn sweep_interval_ms(&self) -> u64 {
        self.sweep_interval_ms
    }
}

/// Run the settlement sweep loop until a stop is requested.
///
/// Each iteration settles every intent that is ready at the current
/// wall-clock time, then sleeps for the sweep interval. Returns the total
/// number of intents settled over the loop's lifetime.
pub async fn run_executor<E: SettlementExecutor>(
    store: Arc<IntentStore>,
    mut executor: E,
    controls: Arc<ExecutorControls>,
) -> u64 {
    info!(
        sweep_interval_ms = controls.sweep_interval_ms(),
        "Settlement executor starting"
    );

    let mut total_settled: u64 = 0;
    loop {
        if controls.is_stop_requested() {
            break;
        }

        let settled = store.settle_ready(Utc::now(), &mut executor).await;
        total_settled = total_settled.saturating_add(settled);

        let interval_ms = controls.sweep_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        } else {
            tokio::task::yield_now().await;
        }
    }

    info!(total_settled, "Settlement executor stopped");
    total_settled
}
