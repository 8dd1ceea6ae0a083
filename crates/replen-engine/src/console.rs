//! Snapshot sink that renders activation ticks to the structured log.
//!
//! The console sink is the demo's display layer: each snapshot becomes one
//! log line with the same readouts the web front end shows (status label,
//! active/buffered dollars and percentages, progress bar position).

use tracing::{debug, info};

use replen_core::format::{format_percent, format_usd, phase_label};
use replen_core::runner::SnapshotSink;
use replen_types::ActivationSnapshot;

/// Display sink that logs each tick's readouts.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// Create a console sink.
    pub const fn new() -> Self {
        Self
    }
}

impl SnapshotSink for ConsoleSink {
    fn on_snapshot(&mut self, snapshot: &ActivationSnapshot) {
        info!(
            tick = snapshot.tick,
            status = %phase_label(snapshot),
            active = %format_usd(snapshot.active_amount),
            active_pct = %format_percent(snapshot.active_percent),
            buffered = %format_usd(snapshot.buffered_amount),
            buffered_pct = %format_percent(snapshot.buffered_percent),
            progress = %snapshot.progress,
            "Activation tick"
        );
    }

    fn on_controls_changed(&mut self, enabled: bool) {
        debug!(enabled, "Demo controls toggled");
    }
}
