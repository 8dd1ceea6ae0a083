//! Timer-driven activation run loop with shared run controls.
//!
//! This module provides [`run_activation`], the async function that drives
//! an [`ActivationScheduler`] on a fixed wall-clock cadence, with support
//! for:
//!
//! - **Snapshot delivery**: one [`ActivationSnapshot`] per tick, strictly in
//!   increasing tick order, never overlapping, via a caller-supplied sink
//! - **Control enablement**: a boolean signal the surrounding UI uses to
//!   disable configuration inputs while a run is active
//! - **Cancellation**: a reset request cancels the pending tick, restores
//!   the tick-0 snapshot, and guarantees no stale tick fires afterwards
//! - **Variable tick speed**: tick interval adjustable at runtime
//!
//! There is exactly one logical clock per scheduler: the loop below is the
//! only place the wall clock advances the state machine.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tracing::info;

use replen_types::ActivationSnapshot;

use crate::scheduler::{ActivationScheduler, StartOutcome};

/// Minimum accepted tick interval in milliseconds.
const MIN_TICK_INTERVAL_MS: u64 = 16;

/// Receiver for the scheduler's per-tick output.
///
/// Implementations render snapshots (console, WebSocket, DOM, ...). The
/// run loop owns the clock; sinks only read what they are handed and never
/// reach back into scheduler internals.
pub trait SnapshotSink: Send {
    /// Called with the snapshot for each tick, and with the tick-0
    /// snapshot on start and on reset.
    fn on_snapshot(&mut self, snapshot: &ActivationSnapshot);

    /// Called when configuration controls should be enabled or disabled.
    /// `false` for the whole duration of a run, `true` otherwise.
    fn on_controls_changed(&mut self, enabled: bool);
}

/// A sink that discards everything, for tests.
pub struct NoOpSink;

impl SnapshotSink for NoOpSink {
    fn on_snapshot(&mut self, _snapshot: &ActivationSnapshot) {}
    fn on_controls_changed(&mut self, _enabled: bool) {}
}

/// Shared run controls.
///
/// Wrapped in [`Arc`] and shared between the run loop and whatever drives
/// it (UI handlers, tests). Atomics keep the tick loop hot path lock-free;
/// the cancel flag uses release/acquire ordering so a cancel requested
/// from another task is observed before the next tick fires.
#[derive(Debug)]
pub struct RunControls {
    /// Set to request that the in-flight run reset and stop.
    cancel_requested: AtomicBool,
    /// Current tick interval in milliseconds (runtime-adjustable).
    tick_interval_ms: AtomicU64,
}

impl RunControls {
    /// Create run controls with the given tick interval.
    pub const fn new(tick_interval_ms: u64) -> Self {
        Self {
            cancel_requested: AtomicBool::new(false),
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
        }
    }

    /// Request that the in-flight run reset and stop.
    ///
    /// Harmless when no run is in flight: the next run clears the flag
    /// before its first tick.
    pub fn request_cancel(&self) {
        self.cancel_requested.store(true, Ordering::Release);
    }

    /// Check whether a cancel has been requested.
    pub fn is_cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::Acquire)
    }

    /// Consume a pending cancel request, returning whether one was set.
    fn take_cancel(&self) -> bool {
        self.cancel_requested.swap(false, Ordering::AcqRel)
    }

    /// Get the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Set the tick interval in milliseconds. Must be at least 16ms.
    ///
    /// Returns the previous interval on success, or `None` if the value
    /// was rejected (below 16ms).
    pub fn set_tick_interval_ms(&self, ms: u64) -> Option<u64> {
        if ms < MIN_TICK_INTERVAL_MS {
            return None;
        }
        let prev = self.tick_interval_ms.swap(ms, Ordering::AcqRel);
        Some(prev)
    }
}

/// Why an activation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEndReason {
    /// The run reached `delay_blocks + ramp_blocks` ticks.
    Completed,
    /// A reset was requested mid-run; state returned to tick 0.
    Cancelled,
    /// A run was already in progress; nothing was started or emitted.
    StartRejected,
}

/// Result of an activation run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Why the run ended.
    pub end_reason: RunEndReason,
    /// The last snapshot emitted (the tick-0 snapshot for a cancelled run).
    pub final_snapshot: Option<ActivationSnapshot>,
    /// Number of ticks executed.
    pub total_ticks: u64,
}

/// Drive one activation run to completion or cancellation.
///
/// Begins a run on the scheduler, disables controls, then advances the
/// clock once per tick interval. Each tick's snapshot is forwarded to the
/// sink; the tick-0 snapshot is emitted up front so the display starts
/// from a clean "100% buffered" readout.
///
/// Cancellation is checked before every tick: a cancel requested through
/// [`RunControls`] resets the scheduler, emits the tick-0 snapshot, and
/// returns -- no stale tick can apply to the reset state. A leftover
/// cancel request from before the run is discarded at start.
///
/// Returns [`RunEndReason::StartRejected`] without touching scheduler
/// state or the sink when a run is already in progress.
pub async fn run_activation(
    scheduler: &mut ActivationScheduler,
    controls: &Arc<RunControls>,
    sink: &mut dyn SnapshotSink,
) -> RunResult {
    if scheduler.begin() == StartOutcome::AlreadyRunning {
        info!("Run request ignored, a run is already in progress");
        return RunResult {
            end_reason: RunEndReason::StartRejected,
            final_snapshot: None,
            total_ticks: 0,
        };
    }

    // A cancel requested before this run belongs to a previous run.
    let _ = controls.take_cancel();

    let schedule = scheduler.schedule();
    info!(
        total_amount = %schedule.total_amount(),
        delay_blocks = schedule.delay_blocks(),
        ramp_blocks = schedule.ramp_blocks(),
        tick_interval_ms = controls.tick_interval_ms(),
        "Activation run starting"
    );

    sink.on_controls_changed(false);
    sink.on_snapshot(&scheduler.current_snapshot());

    let mut total_ticks: u64 = 0;

    loop {
        let interval_ms = controls.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        }

        if controls.take_cancel() {
            let snapshot = scheduler.reset();
            info!(ticks_run = total_ticks, "Activation run cancelled, state reset");
            sink.on_snapshot(&snapshot);
            sink.on_controls_changed(true);
            return RunResult {
                end_reason: RunEndReason::Cancelled,
                final_snapshot: Some(snapshot),
                total_ticks,
            };
        }

        let Some(snapshot) = scheduler.step() else {
            // Unreachable while we own the run; kept as a guard so a stale
            // wakeup can never mint a snapshot for a stopped scheduler.
            break;
        };

        total_ticks = total_ticks.saturating_add(1);
        sink.on_snapshot(&snapshot);

        if !scheduler.is_running() {
            info!(ticks_run = total_ticks, "Activation run completed");
            sink.on_controls_changed(true);
            return RunResult {
                end_reason: RunEndReason::Completed,
                final_snapshot: Some(snapshot),
                total_ticks,
            };
        }
    }

    sink.on_controls_changed(true);
    RunResult {
        end_reason: RunEndReason::Cancelled,
        final_snapshot: None,
        total_ticks,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use replen_types::ActivationPhase;

    use super::*;
    use crate::schedule::Schedule;

    /// A sink that records everything it is handed, and can request a
    /// cancel once a chosen tick has been observed.
    struct RecordingSink {
        snapshots: Vec<ActivationSnapshot>,
        control_changes: Vec<bool>,
        cancel_after_tick: Option<u64>,
        controls: Option<Arc<RunControls>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                snapshots: Vec::new(),
                control_changes: Vec::new(),
                cancel_after_tick: None,
                controls: None,
            }
        }

        fn cancelling(controls: Arc<RunControls>, after_tick: u64) -> Self {
            Self {
                snapshots: Vec::new(),
                control_changes: Vec::new(),
                cancel_after_tick: Some(after_tick),
                controls: Some(controls),
            }
        }
    }

    impl SnapshotSink for RecordingSink {
        fn on_snapshot(&mut self, snapshot: &ActivationSnapshot) {
            if let (Some(after), Some(controls)) = (self.cancel_after_tick, &self.controls) {
                if snapshot.tick >= after && snapshot.phase != ActivationPhase::Registered {
                    controls.request_cancel();
                }
            }
            self.snapshots.push(snapshot.clone());
        }

        fn on_controls_changed(&mut self, enabled: bool) {
            self.control_changes.push(enabled);
        }
    }

    fn demo_scheduler() -> ActivationScheduler {
        let schedule = Schedule::new(Decimal::from(10_000), 5, 10).unwrap();
        ActivationScheduler::new(schedule)
    }

    /// Zero interval: the sleep is skipped entirely so runs finish fast.
    fn instant_controls() -> Arc<RunControls> {
        Arc::new(RunControls::new(0))
    }

    #[tokio::test]
    async fn run_completes_after_delay_plus_ramp_ticks() {
        let mut scheduler = demo_scheduler();
        let controls = instant_controls();
        let mut sink = RecordingSink::new();

        let result = run_activation(&mut scheduler, &controls, &mut sink).await;

        assert_eq!(result.end_reason, RunEndReason::Completed);
        assert_eq!(result.total_ticks, 15);

        // The tick-0 display reset plus ticks 1..=15, in order.
        let ticks: Vec<u64> = sink.snapshots.iter().map(|s| s.tick).collect();
        let expected: Vec<u64> = (0..=15).collect();
        assert_eq!(ticks, expected);

        let last = sink.snapshots.last().unwrap();
        assert_eq!(last.phase, ActivationPhase::Activated);
        assert_eq!(last.active_amount, Decimal::from(10_000));

        // Controls disabled at start, re-enabled at completion.
        assert_eq!(sink.control_changes, vec![false, true]);
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn cancel_resets_and_stops_the_clock() {
        let mut scheduler = demo_scheduler();
        let controls = instant_controls();
        let mut sink = RecordingSink::cancelling(Arc::clone(&controls), 3);

        let result = run_activation(&mut scheduler, &controls, &mut sink).await;

        assert_eq!(result.end_reason, RunEndReason::Cancelled);
        assert_eq!(result.total_ticks, 3);

        // The final emission is the tick-0 snapshot, identical to a
        // freshly configured, never-started run.
        let last = sink.snapshots.last().unwrap();
        assert_eq!(last.tick, 0);
        assert_eq!(last.phase, ActivationPhase::Registered);
        assert_eq!(last.buffered_amount, Decimal::from(10_000));

        // No tick beyond the cancel point ever arrived.
        assert!(sink.snapshots.iter().all(|s| s.tick <= 3));
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.current_tick(), 0);

        // Controls were re-enabled on the cancel path.
        assert_eq!(sink.control_changes, vec![false, true]);
    }

    #[tokio::test]
    async fn start_is_rejected_while_running() {
        let mut scheduler = demo_scheduler();
        let _ = scheduler.begin();

        let controls = instant_controls();
        let mut sink = RecordingSink::new();
        let result = run_activation(&mut scheduler, &controls, &mut sink).await;

        assert_eq!(result.end_reason, RunEndReason::StartRejected);
        assert_eq!(result.total_ticks, 0);
        // Nothing was emitted and the original run is untouched.
        assert!(sink.snapshots.is_empty());
        assert!(sink.control_changes.is_empty());
        assert!(scheduler.is_running());
    }

    #[tokio::test]
    async fn stale_cancel_from_previous_run_is_discarded() {
        let mut scheduler = demo_scheduler();
        let controls = instant_controls();
        controls.request_cancel();

        let mut sink = RecordingSink::new();
        let result = run_activation(&mut scheduler, &controls, &mut sink).await;

        // The leftover request did not kill the new run.
        assert_eq!(result.end_reason, RunEndReason::Completed);
        assert_eq!(result.total_ticks, 15);
    }

    #[tokio::test]
    async fn back_to_back_runs_reuse_the_scheduler() {
        let mut scheduler = demo_scheduler();
        let controls = instant_controls();
        let mut sink = NoOpSink;

        let first = run_activation(&mut scheduler, &controls, &mut sink).await;
        let second = run_activation(&mut scheduler, &controls, &mut sink).await;

        assert_eq!(first.end_reason, RunEndReason::Completed);
        assert_eq!(second.end_reason, RunEndReason::Completed);
        assert_eq!(second.total_ticks, 15);
    }

    #[test]
    fn interval_floor_is_enforced() {
        let controls = RunControls::new(300);
        assert_eq!(controls.tick_interval_ms(), 300);
        assert_eq!(controls.set_tick_interval_ms(500), Some(300));
        assert_eq!(controls.tick_interval_ms(), 500);
        assert!(controls.set_tick_interval_ms(5).is_none());
        assert_eq!(controls.tick_interval_ms(), 500);
    }

    #[test]
    fn cancel_flag_is_consumed_once() {
        let controls = RunControls::new(300);
        assert!(!controls.is_cancel_requested());
        controls.request_cancel();
        assert!(controls.is_cancel_requested());
        assert!(controls.take_cancel());
        assert!(!controls.take_cancel());
    }
}
