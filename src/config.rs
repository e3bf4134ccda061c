// ==========================================
// AIT CMMS - scheduler configuration
// ==========================================
// Policy thresholds with inherited defaults. Cycle cadence
// (30/365-day intervals and their windows) is intrinsic to the PM
// type and lives on PmType instead.
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Trailing completion-history window loaded per run, in days.
    /// Wide enough to cover an Annual cycle plus slack.
    pub completion_window_days: i64,

    /// A next-annual-date override further in the future than this
    /// keeps the Annual PM NOT_DUE.
    pub annual_lookahead_days: i64,

    /// Past this many days overdue, the next-annual-date override is
    /// abandoned and the generic cadence rules take over. Note the
    /// discontinuity: 31 days overdue is scored by entirely different
    /// logic than 29 days overdue.
    pub annual_override_overdue_cutoff_days: i64,

    /// An Annual PM is blocked for this many days after a Monthly
    /// completion (avoids a disruptive Annual right after a Monthly).
    pub monthly_blocks_annual_days: i64,

    /// A Monthly PM is blocked for this many days after an Annual
    /// completion (the Annual covers the Monthly-equivalent work).
    pub annual_blocks_monthly_days: i64,

    /// Weekly capacity target; the schedule is capacity-bounded, not
    /// an exhaustive dump of everything due.
    pub default_max_assignments: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            completion_window_days: 400,
            annual_lookahead_days: 7,
            annual_override_overdue_cutoff_days: 30,
            monthly_blocks_annual_days: 7,
            annual_blocks_monthly_days: 30,
            default_max_assignments: 130,
        }
    }
}
