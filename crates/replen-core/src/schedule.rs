//! Activation schedule: validated configuration plus the pure activation
//! curve and phase derivations.
//!
//! The schedule is the single source of truth for a run's shape. Active and
//! buffered amounts, percentages, progress, and the current phase are all
//! computed from the tick counter and the schedule -- never stored
//! independently.
//!
//! # Design Principles
//!
//! - All derivations use checked arithmetic (no silent overflow).
//! - Amounts are [`Decimal`], so `active + buffered == total` holds exactly
//!   at every tick.
//! - Invalid configuration is rejected at construction, never clamped. In
//!   particular `ramp_blocks == 0` is an error, so the ramp division is
//!   always defined.

use rust_decimal::Decimal;

use replen_types::{ActivationPhase, ActivationSnapshot};

/// Errors that can occur when building a schedule.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// Invalid schedule parameters (non-positive amount, zero ramp, overflow).
    #[error("invalid schedule: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// An immutable delay-then-ramp activation schedule.
///
/// `delay_blocks` ticks hold activation at zero, then activation grows
/// linearly over `ramp_blocks` ticks until the full `total_amount` is
/// active. A schedule is replaced wholesale on reconfiguration; it is
/// never mutated mid-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// The nominal liquidity intent size (strictly positive).
    total_amount: Decimal,
    /// Ticks during which zero activation occurs.
    delay_blocks: u64,
    /// Ticks over which activation grows linearly from 0 to 100%.
    ramp_blocks: u64,
    /// `delay_blocks + ramp_blocks`, validated against overflow.
    total_blocks: u64,
}

impl Schedule {
    /// Create a validated schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidConfig`] if `total_amount` is not
    /// strictly positive, if `ramp_blocks` is zero, or if
    /// `delay_blocks + ramp_blocks` overflows.
    pub fn new(
        total_amount: Decimal,
        delay_blocks: u64,
        ramp_blocks: u64,
    ) -> Result<Self, ScheduleError> {
        if total_amount <= Decimal::ZERO {
            return Err(ScheduleError::InvalidConfig {
                reason: format!("total_amount must be positive, got {total_amount}"),
            });
        }
        if ramp_blocks == 0 {
            return Err(ScheduleError::InvalidConfig {
                reason: "ramp_blocks must be at least 1".to_owned(),
            });
        }
        let total_blocks = delay_blocks.checked_add(ramp_blocks).ok_or_else(|| {
            ScheduleError::InvalidConfig {
                reason: "delay_blocks + ramp_blocks overflows".to_owned(),
            }
        })?;

        Ok(Self {
            total_amount,
            delay_blocks,
            ramp_blocks,
            total_blocks,
        })
    }

    /// The nominal intent size.
    pub const fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    /// The configured delay length in ticks.
    pub const fn delay_blocks(&self) -> u64 {
        self.delay_blocks
    }

    /// The configured ramp length in ticks.
    pub const fn ramp_blocks(&self) -> u64 {
        self.ramp_blocks
    }

    /// The tick count at which a run completes (`delay + ramp`).
    pub const fn total_blocks(&self) -> u64 {
        self.total_blocks
    }

    /// Derive the phase for a tick counter value.
    ///
    /// Tick 0 is `Registered`; ticks inside the delay are `Delaying`;
    /// ticks inside the ramp are `Ramping`; from `total_blocks()` onward
    /// the run is `Activated`. Monotonic in the tick counter, so phases
    /// only ever move forward within a run.
    pub const fn phase_at(&self, tick: u64) -> ActivationPhase {
        if tick == 0 {
            ActivationPhase::Registered
        } else if tick <= self.delay_blocks {
            ActivationPhase::Delaying
        } else if tick < self.total_blocks {
            ActivationPhase::Ramping
        } else {
            ActivationPhase::Activated
        }
    }

    /// The fraction of the total amount active at a tick, in [0, 1].
    ///
    /// Zero through the delay, then a linear ramp clamped at 1 -- no
    /// easing curve.
    pub fn active_fraction_at(&self, tick: u64) -> Decimal {
        if tick <= self.delay_blocks {
            return Decimal::ZERO;
        }
        let ramp_offset = tick.saturating_sub(self.delay_blocks);
        // ramp_blocks >= 1 is guaranteed by the constructor.
        Decimal::from(ramp_offset)
            .checked_div(Decimal::from(self.ramp_blocks))
            .unwrap_or(Decimal::ONE)
            .min(Decimal::ONE)
    }

    /// Overall run progress at a tick, in [0, 1].
    pub fn progress_at(&self, tick: u64) -> Decimal {
        // total_blocks >= 1 because ramp_blocks >= 1.
        Decimal::from(tick)
            .checked_div(Decimal::from(self.total_blocks))
            .unwrap_or(Decimal::ONE)
            .min(Decimal::ONE)
    }

    /// Compute the full activation snapshot for a tick.
    ///
    /// The buffered side is derived by subtraction, so the two amounts
    /// (and the two percentages) sum exactly.
    pub fn snapshot_at(&self, tick: u64) -> ActivationSnapshot {
        let fraction = self.active_fraction_at(tick);
        // fraction <= 1, so neither product can exceed its operand's range.
        let active_amount = self
            .total_amount
            .checked_mul(fraction)
            .unwrap_or(self.total_amount);
        let buffered_amount = self
            .total_amount
            .checked_sub(active_amount)
            .unwrap_or(Decimal::ZERO);
        let active_percent = fraction
            .checked_mul(Decimal::ONE_HUNDRED)
            .unwrap_or(Decimal::ONE_HUNDRED);
        let buffered_percent = Decimal::ONE_HUNDRED
            .checked_sub(active_percent)
            .unwrap_or(Decimal::ZERO);

        ActivationSnapshot {
            tick,
            active_amount,
            buffered_amount,
            active_percent,
            buffered_percent,
            phase: self.phase_at(tick),
            progress: self.progress_at(tick),
            delay_blocks: self.delay_blocks,
            ramp_blocks: self.ramp_blocks,
        }
    }
}
