// ==========================================
// AIT CMMS - scheduling service
// ==========================================
// Entry point for one scheduling run: normalizes the target week,
// primes a read snapshot, loads the active roster, and hands both
// to the assignment generator. Each run builds its own snapshot;
// nothing is shared between runs.
// ==========================================

use crate::config::SchedulerConfig;
use crate::domain::equipment::{week_start_monday, PmAssignment};
use crate::engine::assignment::PmAssignmentGenerator;
use crate::repository::{
    CachedCompletionStore, EquipmentRepository, LiveCompletionRepository, RepositoryResult,
};
use chrono::{Duration, Local, NaiveDate};
use rusqlite::Connection;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub struct PmSchedulingService {
    live: LiveCompletionRepository,
    equipment_repo: EquipmentRepository,
    priority_map: HashMap<String, i32>,
    config: SchedulerConfig,
}

impl PmSchedulingService {
    pub fn new(
        conn: Arc<Mutex<Connection>>,
        priority_map: HashMap<String, i32>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            live: LiveCompletionRepository::from_connection(conn.clone()),
            equipment_repo: EquipmentRepository::from_connection(conn),
            priority_map,
            config,
        }
    }

    /// Generate the work list for the week containing `week_start`,
    /// evaluated against the wall clock.
    pub fn generate_weekly_schedule(
        &self,
        week_start: NaiveDate,
        max_pms: Option<usize>,
    ) -> RepositoryResult<Vec<PmAssignment>> {
        self.generate_weekly_schedule_as_of(week_start, Local::now().date_naive(), max_pms)
    }

    /// Same as `generate_weekly_schedule` with an explicit "as of"
    /// date. Results are a pure function of the database contents
    /// and `today`, so replaying a past run reproduces it.
    pub fn generate_weekly_schedule_as_of(
        &self,
        week_start: NaiveDate,
        today: NaiveDate,
        max_pms: Option<usize>,
    ) -> RepositoryResult<Vec<PmAssignment>> {
        let normalized = week_start_monday(week_start);
        if normalized != week_start {
            warn!(requested = %week_start, %normalized,
                "week start was not a Monday, normalized");
        }

        let max_assignments = max_pms.unwrap_or(self.config.default_max_assignments);
        let since = today - Duration::days(self.config.completion_window_days);

        let store = CachedCompletionStore::prime(&self.live, normalized, since)?;
        let roster = self.equipment_repo.load_active(&self.priority_map)?;

        let generator = PmAssignmentGenerator::new(&store, &self.config);
        let assignments =
            generator.generate_assignments(&roster, normalized, today, max_assignments)?;

        info!(
            week_start = %normalized,
            %today,
            roster = roster.len(),
            assignments = assignments.len(),
            max_assignments,
            "weekly PM schedule generated"
        );

        Ok(assignments)
    }
}
