// ==========================================
// AIT CMMS - weekly assignment generation
// ==========================================
// Walks the active roster, runs the eligibility checker per cycle,
// and turns DUE outcomes into a capacity-bounded, priority-ordered
// work list. A Monthly assignment suppresses the Annual check for
// the same asset within the run; the stale-entry rule keeps the
// reverse from happening across runs.
// ==========================================

use crate::config::SchedulerConfig;
use crate::domain::equipment::{Equipment, PmAssignment};
use crate::domain::types::PmType;
use crate::engine::eligibility::PmEligibilityChecker;
use crate::repository::{CompletionStore, RepositoryResult};
use chrono::NaiveDate;
use tracing::debug;

pub struct PmAssignmentGenerator<'a, S: CompletionStore> {
    checker: PmEligibilityChecker<'a, S>,
}

impl<'a, S: CompletionStore> PmAssignmentGenerator<'a, S> {
    pub fn new(store: &'a S, config: &'a SchedulerConfig) -> Self {
        Self {
            checker: PmEligibilityChecker::new(store, config),
        }
    }

    /// Produce the work list for the week starting `week_start`,
    /// evaluated as of `today`, capped at `max_assignments`.
    ///
    /// Ordering: curated priority tier ascending (1 before 99), then
    /// urgency score descending within a tier. The sort is stable, so
    /// ties keep roster order.
    pub fn generate_assignments(
        &self,
        roster: &[Equipment],
        week_start: NaiveDate,
        today: NaiveDate,
        max_assignments: usize,
    ) -> RepositoryResult<Vec<PmAssignment>> {
        let mut candidates: Vec<(i32, PmAssignment)> = Vec::new();

        for equipment in roster {
            if !equipment.is_active() {
                debug!(bfm_no = %equipment.bfm_no, status = %equipment.status,
                    "skipping inactive equipment");
                continue;
            }

            let mut monthly_added = false;

            if equipment.supports(PmType::Monthly) {
                let result = self.checker.check_eligibility(
                    equipment,
                    PmType::Monthly,
                    week_start,
                    today,
                )?;
                if result.is_due() {
                    candidates.push((
                        equipment.priority,
                        PmAssignment {
                            bfm_no: equipment.bfm_no.clone(),
                            pm_type: PmType::Monthly,
                            description: equipment.description.clone(),
                            priority_score: result.priority_score,
                            reason: result.reason,
                        },
                    ));
                    monthly_added = true;
                }
            }

            // One visit per asset per week: a Monthly pick covers it
            if !monthly_added && equipment.supports(PmType::Annual) {
                let result = self.checker.check_eligibility(
                    equipment,
                    PmType::Annual,
                    week_start,
                    today,
                )?;
                if result.is_due() {
                    candidates.push((
                        equipment.priority,
                        PmAssignment {
                            bfm_no: equipment.bfm_no.clone(),
                            pm_type: PmType::Annual,
                            description: equipment.description.clone(),
                            priority_score: result.priority_score,
                            reason: result.reason,
                        },
                    ));
                }
            }
        }

        let due_count = candidates.len();
        candidates.sort_by(|(tier_a, a), (tier_b, b)| {
            tier_a
                .cmp(tier_b)
                .then(b.priority_score.cmp(&a.priority_score))
        });
        candidates.truncate(max_assignments);

        debug!(
            roster = roster.len(),
            due = due_count,
            assigned = candidates.len(),
            %week_start,
            "assignment generation complete"
        );

        Ok(candidates.into_iter().map(|(_, a)| a).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::equipment::{DEFAULT_PRIORITY_TIER, EQUIPMENT_STATUS_ACTIVE};
    use crate::repository::InMemoryCompletionStore;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn week_start() -> NaiveDate {
        date(2025, 1, 20)
    }

    fn today() -> NaiveDate {
        date(2025, 1, 22)
    }

    fn equipment(bfm_no: &str, priority: i32) -> Equipment {
        Equipment {
            bfm_no: bfm_no.to_string(),
            description: format!("Asset {}", bfm_no),
            has_monthly: true,
            has_annual: true,
            last_monthly_date: None,
            last_annual_date: None,
            status: EQUIPMENT_STATUS_ACTIVE.to_string(),
            priority,
        }
    }

    fn generate(
        store: &InMemoryCompletionStore,
        roster: &[Equipment],
        max: usize,
    ) -> Vec<PmAssignment> {
        let config = SchedulerConfig::default();
        PmAssignmentGenerator::new(store, &config)
            .generate_assignments(roster, week_start(), today(), max)
            .unwrap()
    }

    #[test]
    fn test_monthly_suppresses_annual_same_run() {
        // Never completed either cycle; only the Monthly lands
        let store = InMemoryCompletionStore::new();
        let roster = vec![equipment("BFM-1", DEFAULT_PRIORITY_TIER)];
        let assignments = generate(&store, &roster, 100);
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].pm_type, PmType::Monthly);
        assert_eq!(assignments[0].priority_score, 1000);
    }

    #[test]
    fn test_annual_lands_when_monthly_not_due() {
        let mut store = InMemoryCompletionStore::new();
        // Monthly done recently, Annual ages past the conflict window
        store.add_completion("BFM-1", PmType::Monthly, today() - Duration::days(10), "JH");
        let roster = vec![equipment("BFM-1", DEFAULT_PRIORITY_TIER)];
        let assignments = generate(&store, &roster, 100);
        // Monthly is RECENTLY_COMPLETED; the Monthly completion is 10
        // days old, past the 7-day block, so the Annual lands
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].pm_type, PmType::Annual);
        assert_eq!(assignments[0].priority_score, 900);
    }

    #[test]
    fn test_inactive_equipment_skipped() {
        let store = InMemoryCompletionStore::new();
        let mut eq = equipment("BFM-1", DEFAULT_PRIORITY_TIER);
        eq.status = "Retired".to_string();
        let assignments = generate(&store, &[eq], 100);
        assert!(assignments.is_empty());
    }

    #[test]
    fn test_tier_beats_score() {
        let mut store = InMemoryCompletionStore::new();
        // Tier-99 asset never completed (score 1000); tier-1 asset
        // merely overdue (score 600). Tier wins.
        store.add_completion("BFM-CRIT", PmType::Monthly, today() - Duration::days(40), "JH");
        let mut critical = equipment("BFM-CRIT", 1);
        critical.has_annual = false;
        let mut ordinary = equipment("BFM-ORD", DEFAULT_PRIORITY_TIER);
        ordinary.has_annual = false;

        let assignments = generate(&store, &[ordinary, critical], 100);
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[0].bfm_no, "BFM-CRIT");
        assert_eq!(assignments[0].priority_score, 600);
        assert_eq!(assignments[1].bfm_no, "BFM-ORD");
        assert_eq!(assignments[1].priority_score, 1000);
    }

    #[test]
    fn test_score_orders_within_tier() {
        let mut store = InMemoryCompletionStore::new();
        store.add_completion("BFM-A", PmType::Monthly, today() - Duration::days(40), "JH");
        store.add_completion("BFM-B", PmType::Monthly, today() - Duration::days(60), "JH");
        let mut a = equipment("BFM-A", DEFAULT_PRIORITY_TIER);
        a.has_annual = false;
        let mut b = equipment("BFM-B", DEFAULT_PRIORITY_TIER);
        b.has_annual = false;

        let assignments = generate(&store, &[a, b], 100);
        assert_eq!(assignments[0].bfm_no, "BFM-B");
        assert_eq!(assignments[0].priority_score, 800);
        assert_eq!(assignments[1].bfm_no, "BFM-A");
        assert_eq!(assignments[1].priority_score, 600);
    }

    #[test]
    fn test_capacity_cap_keeps_highest_priority() {
        let store = InMemoryCompletionStore::new();
        let roster: Vec<Equipment> = (0..10)
            .map(|i| {
                let mut eq = equipment(&format!("BFM-{:03}", i), if i < 3 { 1 } else { 99 });
                eq.has_annual = false;
                eq
            })
            .collect();

        let assignments = generate(&store, &roster, 5);
        assert_eq!(assignments.len(), 5);
        // The three tier-1 assets survive the cut, in roster order
        assert_eq!(assignments[0].bfm_no, "BFM-000");
        assert_eq!(assignments[1].bfm_no, "BFM-001");
        assert_eq!(assignments[2].bfm_no, "BFM-002");
    }

    #[test]
    fn test_not_due_and_conflicted_excluded() {
        let mut store = InMemoryCompletionStore::new();
        store.add_completion("BFM-1", PmType::Monthly, today() - Duration::days(5), "JH");
        store.add_uncompleted("BFM-2", PmType::Monthly, date(2025, 1, 6), Some("JH"));
        let mut one = equipment("BFM-1", DEFAULT_PRIORITY_TIER);
        one.has_annual = false;
        let mut two = equipment("BFM-2", DEFAULT_PRIORITY_TIER);
        two.has_annual = false;

        let assignments = generate(&store, &[one, two], 100);
        assert!(assignments.is_empty());
    }
}
