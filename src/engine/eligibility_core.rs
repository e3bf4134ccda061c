// ==========================================
// AIT CMMS - eligibility rule core
// ==========================================
// Pure rule functions: no state, no side effects, no I/O.
// Every outcome carries a human-readable reason; the week's
// work list is explainable row by row.
//
// Priority score bands (higher = more urgent):
//   1000 / 900  never completed (Monthly / Annual)
//   500..=999   numerically overdue, 500 + 10 per day, capped
//   ~300        freshly due, centered on the ideal cadence
//   200         fallback due
// The bands guarantee "never done" outranks "merely overdue",
// which outranks "just became due".
// ==========================================

use crate::domain::equipment::{CompletionRecord, Equipment, PmEligibilityResult, UncompletedSchedule};
use crate::domain::types::{CompletionSource, PmType};
use chrono::NaiveDate;

pub struct EligibilityCore;

impl EligibilityCore {
    /// Rule 1: the requested cycle must apply to the asset.
    pub fn check_applicability(
        equipment: &Equipment,
        pm_type: PmType,
    ) -> Option<PmEligibilityResult> {
        if equipment.supports(pm_type) {
            return None;
        }
        Some(PmEligibilityResult::not_due(format!(
            "Equipment doesn't require {} PM",
            pm_type
        )))
    }

    /// Rule 2: an assignment from an earlier week that was never
    /// signed off blocks re-assignment until resolved externally.
    /// The reason names the oldest outstanding week and its
    /// technician (entries arrive newest first).
    pub fn check_prior_week_conflict(
        uncompleted: &[UncompletedSchedule],
    ) -> Option<PmEligibilityResult> {
        let oldest = uncompleted.last()?;
        Some(PmEligibilityResult::conflicted(format!(
            "Already scheduled for week {} (uncompleted) - assigned to {}",
            oldest.week_start.format("%Y-%m-%d"),
            oldest.technician.as_deref().unwrap_or("unassigned")
        )))
    }

    /// Rule 3 (Annual only): an explicit next-annual-PM date takes
    /// precedence over computed cadence while it is between
    /// `overdue_cutoff_days` overdue and `lookahead_days` ahead.
    /// Further overdue than the cutoff, the override is abandoned
    /// and `None` falls through to the generic cadence rules.
    pub fn check_annual_override(
        next_annual: NaiveDate,
        today: NaiveDate,
        lookahead_days: i64,
        overdue_cutoff_days: i64,
    ) -> Option<PmEligibilityResult> {
        let days_until = (next_annual - today).num_days();

        if days_until > lookahead_days {
            return Some(PmEligibilityResult::not_due(format!(
                "Annual PM scheduled for {} ({} days from now)",
                next_annual.format("%Y-%m-%d"),
                days_until
            )));
        }

        if days_until >= -overdue_cutoff_days {
            let days_overdue = (-days_until).max(0);
            let priority = (500 + days_overdue * 10) as i32;
            return Some(PmEligibilityResult::due(
                format!(
                    "Annual PM due by Next Annual PM Date: {}",
                    next_annual.format("%Y-%m-%d")
                ),
                priority,
                days_overdue,
            ));
        }

        None
    }

    /// Rule 4: a same-cycle completion inside the minimum interval
    /// means the work was just done.
    pub fn check_minimum_interval(
        pm_type: PmType,
        latest_same_type: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Option<PmEligibilityResult> {
        let latest = latest_same_type?;
        let days_since = (today - latest).num_days();
        let min_interval = pm_type.min_interval_days();

        if days_since < min_interval {
            return Some(PmEligibilityResult::recently_completed(format!(
                "{} PM completed {} days ago (min interval: {})",
                pm_type, days_since, min_interval
            )));
        }
        None
    }

    /// Rule 5: cross-cycle timing conflicts. An Annual is blocked
    /// right after a Monthly (disruption), a Monthly right after an
    /// Annual (already covered).
    pub fn check_cross_type_conflict(
        pm_type: PmType,
        latest_monthly: Option<NaiveDate>,
        latest_annual: Option<NaiveDate>,
        today: NaiveDate,
        monthly_blocks_annual_days: i64,
        annual_blocks_monthly_days: i64,
    ) -> Option<PmEligibilityResult> {
        match pm_type {
            PmType::Annual => {
                let latest = latest_monthly?;
                let days_since = (today - latest).num_days();
                if days_since < monthly_blocks_annual_days {
                    return Some(PmEligibilityResult::conflicted(format!(
                        "Annual blocked - Monthly PM completed {} days ago",
                        days_since
                    )));
                }
            }
            PmType::Monthly => {
                let latest = latest_annual?;
                let days_since = (today - latest).num_days();
                if days_since < annual_blocks_monthly_days {
                    return Some(PmEligibilityResult::conflicted(format!(
                        "Monthly blocked - Annual PM completed {} days ago",
                        days_since
                    )));
                }
            }
        }
        None
    }

    /// Rule 7: generic cadence check against the last completion.
    /// `last_completion` carries where the date came from so the
    /// reason can say so; `None` means never completed.
    pub fn check_due_date(
        pm_type: PmType,
        last_completion: Option<(NaiveDate, CompletionSource)>,
        today: NaiveDate,
    ) -> PmEligibilityResult {
        let Some((last_date, source)) = last_completion else {
            return PmEligibilityResult::due(
                format!("{} PM never completed - HIGH PRIORITY", pm_type),
                pm_type.never_completed_priority(),
                0,
            );
        };

        let days_since = (today - last_date).num_days();
        let min_days = pm_type.min_interval_days();
        let max_days = pm_type.max_window_days();
        let ideal = pm_type.ideal_frequency_days();
        let last_str = last_date.format("%Y-%m-%d");

        if days_since < min_days {
            return PmEligibilityResult::not_due(format!(
                "{} PM not due for {} days (last: {}, source: {})",
                pm_type,
                min_days - days_since,
                last_str,
                source
            ));
        }

        let days_overdue = days_since - ideal;
        if days_overdue > 0 {
            let priority = (500 + days_overdue * 10).min(999) as i32;
            PmEligibilityResult::due(
                format!(
                    "{} PM OVERDUE by {} days (last: {}, source: {})",
                    pm_type, days_overdue, last_str, source
                ),
                priority,
                days_overdue,
            )
        } else if days_since <= max_days {
            let priority = (300 - (days_since - ideal).abs()) as i32;
            PmEligibilityResult::due(
                format!(
                    "{} PM due now ({} days since last, last: {}, source: {})",
                    pm_type, days_since, last_str, source
                ),
                priority,
                0,
            )
        } else {
            PmEligibilityResult::due(
                format!(
                    "{} PM due ({} days since last, last: {}, source: {})",
                    pm_type, days_since, last_str, source
                ),
                200,
                0,
            )
        }
    }

    /// Most recent completion date of one cycle within a record set.
    pub fn latest_of_type(
        completions: &[CompletionRecord],
        pm_type: PmType,
    ) -> Option<NaiveDate> {
        completions
            .iter()
            .filter(|c| c.pm_type == pm_type)
            .map(|c| c.completion_date)
            .max()
    }
}
