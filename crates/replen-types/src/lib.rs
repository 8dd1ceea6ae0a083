//! Shared type definitions for the RepLen activation engine.
//!
//! This crate is the single source of truth for all types used across the
//! RepLen workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the demo front end.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for entity identifiers
//! - [`enums`] -- Enumeration types (activation phase, intent action/status)
//! - [`structs`] -- Core entity structs (snapshots, intents, executor status)

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ActivationPhase, IntentAction, IntentStatus};
pub use ids::IntentId;
pub use structs::{ActivationSnapshot, ExecutorStatus, LpIntent};
