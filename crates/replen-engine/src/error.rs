//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and the demo run.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: replen_core::config::ConfigError,
    },

    /// The configured schedule is invalid.
    #[error("schedule error: {source}")]
    Schedule {
        /// The underlying schedule error.
        #[from]
        source: replen_core::schedule::ScheduleError,
    },

    /// The settlement executor task failed.
    #[error("executor error: {message}")]
    Executor {
        /// Description of the executor failure.
        message: String,
    },
}
