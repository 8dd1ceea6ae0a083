//! Display formatting for activation snapshots.
//!
//! The display contract of the product demo: dollar amounts floor to whole
//! units with thousands separators (`$3,000`), percentages render with one
//! decimal (`30.0%`), and phases render as the original status labels.
//! Pure string functions -- no terminal or DOM handles here.

use rust_decimal::Decimal;

use replen_types::{ActivationPhase, ActivationSnapshot};

/// Format an amount as whole dollars with thousands separators.
///
/// Fractional cents are floored, matching the demo's readouts: `$3,000`
/// never `$3,000.00`.
pub fn format_usd(amount: Decimal) -> String {
    let whole = amount.trunc().normalize().to_string();
    let (sign, digits) = whole
        .strip_prefix('-')
        .map_or(("", whole.as_str()), |rest| ("-", rest));
    format!("{sign}${}", group_thousands(digits))
}

/// Format a percentage with one decimal place, e.g. `30.0%`.
pub fn format_percent(percent: Decimal) -> String {
    format!("{percent:.1}%")
}

/// The status label for a snapshot, as shown under the progress bar.
///
/// Delay and smoothing labels carry a `(position/length)` counter so the
/// display needs no extra state: `Delay Period (3/5)`, `Smoothing (3/10)`.
pub fn phase_label(snapshot: &ActivationSnapshot) -> String {
    match snapshot.phase {
        ActivationPhase::Registered => "Intent Registered".to_owned(),
        ActivationPhase::Delaying => format!(
            "Delay Period ({}/{})",
            snapshot.tick, snapshot.delay_blocks
        ),
        ActivationPhase::Ramping => format!(
            "Smoothing ({}/{})",
            snapshot.tick.saturating_sub(snapshot.delay_blocks),
            snapshot.ramp_blocks
        ),
        ActivationPhase::Activated => "Fully Activated".to_owned(),
    }
}

/// Insert `,` separators every three digits, starting from the right.
fn group_thousands(digits: &str) -> String {
    let mut grouped: Vec<char> = Vec::with_capacity(digits.len().saturating_add(digits.len() / 3));
    for (index, ch) in digits.chars().rev().enumerate() {
        if index > 0 && index % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.iter().rev().collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::schedule::Schedule;

    fn demo_snapshot(tick: u64) -> ActivationSnapshot {
        Schedule::new(Decimal::from(10_000), 5, 10)
            .unwrap()
            .snapshot_at(tick)
    }

    #[test]
    fn usd_grouping() {
        assert_eq!(format_usd(Decimal::ZERO), "$0");
        assert_eq!(format_usd(Decimal::from(42)), "$42");
        assert_eq!(format_usd(Decimal::from(3000)), "$3,000");
        assert_eq!(format_usd(Decimal::from(10_000)), "$10,000");
        assert_eq!(format_usd(Decimal::from(1_250_000)), "$1,250,000");
    }

    #[test]
    fn usd_floors_fractions() {
        assert_eq!(format_usd(Decimal::new(29999, 1)), "$2,999"); // 2999.9
        assert_eq!(format_usd(Decimal::new(10005, 4)), "$1"); // 1.0005
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(Decimal::from(30)), "30.0%");
        assert_eq!(format_percent(Decimal::new(666, 1)), "66.6%");
        assert_eq!(format_percent(Decimal::ONE_HUNDRED), "100.0%");
        assert_eq!(format_percent(Decimal::ZERO), "0.0%");
    }

    #[test]
    fn labels_follow_the_demo_status_line() {
        assert_eq!(phase_label(&demo_snapshot(0)), "Intent Registered");
        assert_eq!(phase_label(&demo_snapshot(3)), "Delay Period (3/5)");
        assert_eq!(phase_label(&demo_snapshot(8)), "Smoothing (3/10)");
        assert_eq!(phase_label(&demo_snapshot(15)), "Fully Activated");
    }
}
