//! Activation scheduling for the RepLen engine.
//!
//! This crate owns the gradual-activation simulation that drives the demo:
//! a delay-then-ramp schedule, the tick-stepped scheduler state machine,
//! and the timer-driven run loop that feeds snapshots to a display sink.
//!
//! # Modules
//!
//! - [`schedule`] -- Validated schedule plus the pure activation curve and
//!   phase derivations. The tick counter is the source of truth; amounts,
//!   percentages, and phases are always derived, never stored.
//! - [`scheduler`] -- [`ActivationScheduler`], the synchronous state
//!   machine with begin/step/reset/configure operations.
//! - [`runner`] -- The async run loop, [`SnapshotSink`] display boundary,
//!   and shared [`RunControls`] (cancel flag, tick interval).
//! - [`config`] -- Configuration loading from `replen-config.yaml` into
//!   strongly-typed structs.
//! - [`format`] -- The demo's display formatting contract.
//!
//! [`ActivationScheduler`]: scheduler::ActivationScheduler
//! [`SnapshotSink`]: runner::SnapshotSink
//! [`RunControls`]: runner::RunControls

pub mod config;
pub mod format;
pub mod runner;
pub mod schedule;
pub mod scheduler;
