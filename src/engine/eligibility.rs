// ==========================================
// AIT CMMS - eligibility checker
// ==========================================
// Orchestrates the rule core against a completion store. Rules run
// in a fixed order and the first decisive outcome wins:
//
//   1. cycle applicability
//   2. stale uncompleted entry from an earlier week
//   3. next-annual-date override (Annual only)
//   4. same-cycle minimum interval
//   5. cross-cycle timing conflict
//   6. already on this week's schedule
//   7. generic cadence against the last completion
//
// The completion log is authoritative for steps 4, 5 and 7; the
// equipment master's free-form last-PM column is the fallback when
// the log has nothing for that cycle.
// ==========================================

use crate::config::SchedulerConfig;
use crate::domain::equipment::{Equipment, PmEligibilityResult};
use crate::domain::types::{CompletionSource, PmType};
use crate::engine::date_parser::DateParser;
use crate::engine::eligibility_core::EligibilityCore;
use crate::repository::{CompletionStore, RepositoryResult};
use chrono::{Duration, NaiveDate};
use tracing::trace;

pub struct PmEligibilityChecker<'a, S: CompletionStore> {
    store: &'a S,
    config: &'a SchedulerConfig,
}

impl<'a, S: CompletionStore> PmEligibilityChecker<'a, S> {
    pub fn new(store: &'a S, config: &'a SchedulerConfig) -> Self {
        Self { store, config }
    }

    /// Decide whether one (asset, cycle) pair belongs on the week
    /// starting `week_start`, evaluated as of `today`.
    pub fn check_eligibility(
        &self,
        equipment: &Equipment,
        pm_type: PmType,
        week_start: NaiveDate,
        today: NaiveDate,
    ) -> RepositoryResult<PmEligibilityResult> {
        if let Some(result) = EligibilityCore::check_applicability(equipment, pm_type) {
            return Ok(result);
        }

        let uncompleted = self
            .store
            .uncompleted_schedules(&equipment.bfm_no, pm_type, week_start)?;
        if let Some(result) = EligibilityCore::check_prior_week_conflict(&uncompleted) {
            trace!(bfm_no = %equipment.bfm_no, %pm_type, reason = %result.reason,
                "blocked by stale schedule entry");
            return Ok(result);
        }

        // An explicit next-annual date overrides computed cadence
        // while it is within its window; further overdue it falls
        // through to the generic rules below.
        if pm_type == PmType::Annual {
            if let Some(raw) = self.store.next_annual_date(&equipment.bfm_no)? {
                if let Some(next_annual) = DateParser::parse_flexible(&raw) {
                    if let Some(result) = EligibilityCore::check_annual_override(
                        next_annual,
                        today,
                        self.config.annual_lookahead_days,
                        self.config.annual_override_overdue_cutoff_days,
                    ) {
                        return Ok(result);
                    }
                }
            }
        }

        let since = today - Duration::days(self.config.completion_window_days);
        let completions = self.store.recent_completions(&equipment.bfm_no, since)?;
        let latest_monthly = EligibilityCore::latest_of_type(&completions, PmType::Monthly);
        let latest_annual = EligibilityCore::latest_of_type(&completions, PmType::Annual);
        let latest_same_type = match pm_type {
            PmType::Monthly => latest_monthly,
            PmType::Annual => latest_annual,
        };

        if let Some(result) =
            EligibilityCore::check_minimum_interval(pm_type, latest_same_type, today)
        {
            return Ok(result);
        }

        if let Some(result) = EligibilityCore::check_cross_type_conflict(
            pm_type,
            latest_monthly,
            latest_annual,
            today,
            self.config.monthly_blocks_annual_days,
            self.config.annual_blocks_monthly_days,
        ) {
            return Ok(result);
        }

        // An existing entry for this week is an unresolved schedule
        // conflict, same as a stale prior-week entry
        let scheduled = self.store.scheduled_pms(week_start, &equipment.bfm_no)?;
        if scheduled.iter().any(|entry| entry.pm_type == pm_type) {
            return Ok(PmEligibilityResult::conflicted("Already scheduled for this week"));
        }

        let last_completion = match latest_same_type {
            Some(date) => Some((date, CompletionSource::CompletionLog)),
            None => DateParser::parse_flexible_opt(equipment.last_date_str(pm_type))
                .map(|date| (date, CompletionSource::EquipmentMaster)),
        };

        Ok(EligibilityCore::check_due_date(pm_type, last_completion, today))
    }
}
