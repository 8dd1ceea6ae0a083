//! The activation scheduler state machine.
//!
//! [`ActivationScheduler`] owns one [`Schedule`] and the mutable run state
//! (tick counter, running flag). It is a synchronous state machine: the
//! async run loop in [`runner`](crate::runner) drives it once per wall-clock
//! interval, and a host UI drives it directly on reset.
//!
//! One scheduler instance belongs to whatever component embeds it -- there
//! is no process-wide instance, so independent simulations (and tests)
//! never interfere.

use tracing::debug;

use replen_types::ActivationSnapshot;

use crate::schedule::Schedule;

/// Result of asking the scheduler to begin a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A fresh run was started from tick 0.
    Started,
    /// A run is already in progress; the request was ignored. A second
    /// concurrent run is never created, so a double-click on "run" keeps
    /// a single clock.
    AlreadyRunning,
}

/// Deterministic tick-stepped activation state machine.
///
/// The scheduler never performs I/O and holds no display handles; each
/// step returns the snapshot for the new tick and the caller forwards it
/// to a sink. All state is discarded on reset or reconfiguration -- no
/// partial-state carryover between runs.
#[derive(Debug, Clone)]
pub struct ActivationScheduler {
    /// The active schedule (replaced wholesale by [`configure`]).
    ///
    /// [`configure`]: ActivationScheduler::configure
    schedule: Schedule,
    /// Current tick counter, 0 on a fresh or reset scheduler.
    current_tick: u64,
    /// Whether a run is in progress.
    running: bool,
}

impl ActivationScheduler {
    /// Create a scheduler for the given schedule, idle at tick 0.
    pub const fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            current_tick: 0,
            running: false,
        }
    }

    /// The schedule currently configured.
    pub const fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// The current tick counter.
    pub const fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Whether a run is in progress.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Replace the schedule.
    ///
    /// If a run is in progress it is implicitly stopped first: the tick
    /// counter returns to 0 and the running flag clears, so no state from
    /// the old schedule leaks into the next run. This is a configuration
    /// mutation, not a tick -- nothing is emitted.
    pub fn configure(&mut self, schedule: Schedule) {
        if self.running {
            debug!(tick = self.current_tick, "Reconfigured mid-run, stopping run");
        }
        self.schedule = schedule;
        self.current_tick = 0;
        self.running = false;
    }

    /// Begin a run from tick 0.
    ///
    /// Returns [`StartOutcome::AlreadyRunning`] without touching any state
    /// when a run is in flight.
    pub fn begin(&mut self) -> StartOutcome {
        if self.running {
            return StartOutcome::AlreadyRunning;
        }
        self.current_tick = 0;
        self.running = true;
        StartOutcome::Started
    }

    /// Advance the run by one tick and return the new tick's snapshot.
    ///
    /// Returns `None` when no run is in progress -- a timer callback that
    /// fires after a reset observes this and must emit nothing.
    ///
    /// On reaching `delay_blocks + ramp_blocks` the run completes: the
    /// running flag clears and later calls return `None`, so the final
    /// tick is the last snapshot a driver can emit.
    pub fn step(&mut self) -> Option<ActivationSnapshot> {
        if !self.running {
            return None;
        }
        // The running invariant bounds the counter by total_blocks, so the
        // increment cannot overflow.
        self.current_tick = self.current_tick.saturating_add(1);
        let snapshot = self.schedule.snapshot_at(self.current_tick);

        if self.current_tick >= self.schedule.total_blocks() {
            self.running = false;
            debug!(tick = self.current_tick, "Activation run completed");
        }

        Some(snapshot)
    }

    /// Stop any run and return to the freshly-configured state.
    ///
    /// Safe to call whether or not a run is in progress. Returns the
    /// tick-0 snapshot (100% buffered, `Registered`) so a display can be
    /// brought back in line with the internal state.
    pub fn reset(&mut self) -> ActivationSnapshot {
        self.current_tick = 0;
        self.running = false;
        self.schedule.snapshot_at(0)
    }

    /// The snapshot for the current tick counter, without advancing.
    pub fn current_snapshot(&self) -> ActivationSnapshot {
        self.schedule.snapshot_at(self.current_tick)
    }
}
