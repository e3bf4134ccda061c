// ==========================================
// AIT CMMS - completion and schedule history store
// ==========================================
// Read-only access to everything the eligibility checker
// consults: PM completion history, the target week's schedule
// entries, stale uncompleted entries from earlier weeks, and
// next-annual-date overrides from the equipment master.
//
// Two implementations sit behind one trait:
// - LiveCompletionRepository issues one parameterized query per
//   call (fine for single lookups).
// - CachedCompletionStore is primed once per scheduling run and
//   answers from memory, bounding database round trips to a small
//   constant regardless of roster size.
// ==========================================

use crate::domain::equipment::{
    CompletionRecord, ScheduledPm, UncompletedSchedule, SCHEDULE_STATUS_SCHEDULED,
};
use crate::domain::types::PmType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Entries kept per (equipment, PM type) when collecting stale
/// uncompleted schedules, newest first.
const UNCOMPLETED_KEEP_PER_KEY: usize = 5;

// ==========================================
// CompletionStore - read-side contract
// ==========================================

/// Read-side store consulted by the eligibility checker.
///
/// `since` bounds the completion window for live lookups; a primed
/// store answers from the window it was loaded with and ignores
/// narrower per-call bounds.
pub trait CompletionStore {
    /// Completions of any PM type for one asset, newest first.
    fn recent_completions(
        &self,
        bfm_no: &str,
        since: NaiveDate,
    ) -> RepositoryResult<Vec<CompletionRecord>>;

    /// Schedule entries for one asset in the target week.
    fn scheduled_pms(
        &self,
        week_start: NaiveDate,
        bfm_no: &str,
    ) -> RepositoryResult<Vec<ScheduledPm>>;

    /// Still-"Scheduled" entries from weeks strictly before
    /// `before_week`, newest first, at most five.
    fn uncompleted_schedules(
        &self,
        bfm_no: &str,
        pm_type: PmType,
        before_week: NaiveDate,
    ) -> RepositoryResult<Vec<UncompletedSchedule>>;

    /// Raw next-annual-PM date string from the equipment master,
    /// if one is set.
    fn next_annual_date(&self, bfm_no: &str) -> RepositoryResult<Option<String>>;
}

// ==========================================
// LiveCompletionRepository - per-call queries
// ==========================================

pub struct LiveCompletionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LiveCompletionRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = Connection::open(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// All completions on or after `since`, grouped per asset,
    /// newest first within each group. One query for the whole
    /// roster; used to prime the cached store.
    pub fn all_completions_since(
        &self,
        since: NaiveDate,
    ) -> RepositoryResult<HashMap<String, Vec<CompletionRecord>>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT bfm_equipment_no, pm_type, completion_date, technician_name
            FROM pm_completions
            WHERE completion_date >= ?1
            ORDER BY bfm_equipment_no, completion_date DESC
            "#,
        )?;

        let rows = stmt.query_map(params![since.format("%Y-%m-%d").to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;

        let mut grouped: HashMap<String, Vec<CompletionRecord>> = HashMap::new();
        for row in rows {
            let (bfm_no, pm_type_str, date_str, technician) = row?;
            match parse_completion_row(&bfm_no, &pm_type_str, &date_str, technician) {
                Some(record) => grouped.entry(bfm_no).or_default().push(record),
                None => warn!(bfm_no, pm_type = %pm_type_str, date = %date_str,
                    "skipping unparseable completion record"),
            }
        }
        Ok(grouped)
    }

    /// All schedule entries for one week, grouped per asset.
    pub fn all_scheduled_for_week(
        &self,
        week_start: NaiveDate,
    ) -> RepositoryResult<HashMap<String, Vec<ScheduledPm>>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT bfm_equipment_no, pm_type, assigned_technician, status
            FROM weekly_pm_schedules
            WHERE week_start_date = ?1
            "#,
        )?;

        let rows = stmt.query_map(params![week_start.format("%Y-%m-%d").to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut grouped: HashMap<String, Vec<ScheduledPm>> = HashMap::new();
        for row in rows {
            let (bfm_no, pm_type_str, technician, status) = row?;
            let Some(pm_type) = PmType::from_db_str(&pm_type_str) else {
                warn!(bfm_no, pm_type = %pm_type_str, "skipping schedule entry with unknown PM type");
                continue;
            };
            grouped.entry(bfm_no.clone()).or_default().push(ScheduledPm {
                bfm_no,
                pm_type,
                technician,
                status,
            });
        }
        Ok(grouped)
    }

    /// All still-"Scheduled" entries from weeks before `before_week`,
    /// grouped by (asset, PM type), newest first, capped at five per
    /// group.
    pub fn all_uncompleted_before(
        &self,
        before_week: NaiveDate,
    ) -> RepositoryResult<HashMap<(String, PmType), Vec<UncompletedSchedule>>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT bfm_equipment_no, pm_type, week_start_date, assigned_technician, status, scheduled_date
            FROM weekly_pm_schedules
            WHERE week_start_date < ?1
              AND status = ?2
            ORDER BY bfm_equipment_no, pm_type, week_start_date DESC
            "#,
        )?;

        let rows = stmt.query_map(
            params![
                before_week.format("%Y-%m-%d").to_string(),
                SCHEDULE_STATUS_SCHEDULED
            ],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, Option<String>>(5)?,
                ))
            },
        )?;

        let mut grouped: HashMap<(String, PmType), Vec<UncompletedSchedule>> = HashMap::new();
        for row in rows {
            let (bfm_no, pm_type_str, week_str, technician, status, scheduled_date) = row?;
            let Some(pm_type) = PmType::from_db_str(&pm_type_str) else {
                warn!(bfm_no, pm_type = %pm_type_str, "skipping uncompleted entry with unknown PM type");
                continue;
            };
            let Ok(week_start) = NaiveDate::parse_from_str(&week_str, "%Y-%m-%d") else {
                warn!(bfm_no, week = %week_str, "skipping uncompleted entry with unparseable week");
                continue;
            };
            let entries = grouped.entry((bfm_no, pm_type)).or_default();
            if entries.len() < UNCOMPLETED_KEEP_PER_KEY {
                entries.push(UncompletedSchedule {
                    week_start,
                    technician,
                    status,
                    scheduled_date,
                });
            }
        }
        Ok(grouped)
    }

    /// All non-empty next-annual-PM dates from the equipment master.
    pub fn all_next_annual_dates(&self) -> RepositoryResult<HashMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT bfm_equipment_no, next_annual_pm
            FROM equipment
            WHERE next_annual_pm IS NOT NULL AND next_annual_pm != ''
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut dates = HashMap::new();
        for row in rows {
            let (bfm_no, next_annual) = row?;
            dates.insert(bfm_no, next_annual);
        }
        Ok(dates)
    }
}

impl CompletionStore for LiveCompletionRepository {
    fn recent_completions(
        &self,
        bfm_no: &str,
        since: NaiveDate,
    ) -> RepositoryResult<Vec<CompletionRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT bfm_equipment_no, pm_type, completion_date, technician_name
            FROM pm_completions
            WHERE bfm_equipment_no = ?1
              AND completion_date >= ?2
            ORDER BY completion_date DESC
            "#,
        )?;

        let rows = stmt.query_map(
            params![bfm_no, since.format("%Y-%m-%d").to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            },
        )?;

        let mut completions = Vec::new();
        for row in rows {
            let (bfm, pm_type_str, date_str, technician) = row?;
            match parse_completion_row(&bfm, &pm_type_str, &date_str, technician) {
                Some(record) => completions.push(record),
                None => warn!(bfm_no = %bfm, pm_type = %pm_type_str, date = %date_str,
                    "skipping unparseable completion record"),
            }
        }
        Ok(completions)
    }

    fn scheduled_pms(
        &self,
        week_start: NaiveDate,
        bfm_no: &str,
    ) -> RepositoryResult<Vec<ScheduledPm>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT bfm_equipment_no, pm_type, assigned_technician, status
            FROM weekly_pm_schedules
            WHERE week_start_date = ?1 AND bfm_equipment_no = ?2
            "#,
        )?;

        let rows = stmt.query_map(
            params![week_start.format("%Y-%m-%d").to_string(), bfm_no],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )?;

        let mut entries = Vec::new();
        for row in rows {
            let (bfm, pm_type_str, technician, status) = row?;
            let Some(pm_type) = PmType::from_db_str(&pm_type_str) else {
                warn!(bfm_no = %bfm, pm_type = %pm_type_str, "skipping schedule entry with unknown PM type");
                continue;
            };
            entries.push(ScheduledPm {
                bfm_no: bfm,
                pm_type,
                technician,
                status,
            });
        }
        Ok(entries)
    }

    fn uncompleted_schedules(
        &self,
        bfm_no: &str,
        pm_type: PmType,
        before_week: NaiveDate,
    ) -> RepositoryResult<Vec<UncompletedSchedule>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT week_start_date, assigned_technician, status, scheduled_date
            FROM weekly_pm_schedules
            WHERE bfm_equipment_no = ?1
              AND pm_type = ?2
              AND week_start_date < ?3
              AND status = ?4
            ORDER BY week_start_date DESC
            LIMIT 5
            "#,
        )?;

        let rows = stmt.query_map(
            params![
                bfm_no,
                pm_type.as_db_str(),
                before_week.format("%Y-%m-%d").to_string(),
                SCHEDULE_STATUS_SCHEDULED
            ],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            },
        )?;

        let mut entries = Vec::new();
        for row in rows {
            let (week_str, technician, status, scheduled_date) = row?;
            let Ok(week_start) = NaiveDate::parse_from_str(&week_str, "%Y-%m-%d") else {
                warn!(bfm_no, week = %week_str, "skipping uncompleted entry with unparseable week");
                continue;
            };
            entries.push(UncompletedSchedule {
                week_start,
                technician,
                status,
                scheduled_date,
            });
        }
        Ok(entries)
    }

    fn next_annual_date(&self, bfm_no: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value: Option<Option<String>> = conn
            .query_row(
                "SELECT next_annual_pm FROM equipment WHERE bfm_equipment_no = ?1",
                params![bfm_no],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value.flatten().filter(|s| !s.is_empty()))
    }
}

fn parse_completion_row(
    bfm_no: &str,
    pm_type_str: &str,
    date_str: &str,
    technician: Option<String>,
) -> Option<CompletionRecord> {
    let pm_type = PmType::from_db_str(pm_type_str)?;
    let completion_date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
    Some(CompletionRecord {
        bfm_no: bfm_no.to_string(),
        pm_type,
        completion_date,
        technician: technician.unwrap_or_default(),
    })
}

// ==========================================
// CachedCompletionStore - primed once per run
// ==========================================

/// Fully-loaded snapshot of the read side for one scheduling run.
///
/// Priming issues four queries total; every subsequent lookup is a
/// map access. Each run builds its own snapshot, so runs for
/// different weeks share no mutable state.
pub struct CachedCompletionStore {
    completions: HashMap<String, Vec<CompletionRecord>>,
    scheduled: HashMap<String, Vec<ScheduledPm>>,
    uncompleted: HashMap<(String, PmType), Vec<UncompletedSchedule>>,
    next_annual: HashMap<String, String>,
}

impl CachedCompletionStore {
    /// Bulk-load everything for a run targeting `week_start`, with
    /// completion history back to `since`.
    pub fn prime(
        live: &LiveCompletionRepository,
        week_start: NaiveDate,
        since: NaiveDate,
    ) -> RepositoryResult<Self> {
        let completions = live.all_completions_since(since)?;
        let scheduled = live.all_scheduled_for_week(week_start)?;
        let uncompleted = live.all_uncompleted_before(week_start)?;
        let next_annual = live.all_next_annual_dates()?;

        debug!(
            completion_groups = completions.len(),
            scheduled_groups = scheduled.len(),
            uncompleted_groups = uncompleted.len(),
            next_annual_dates = next_annual.len(),
            %week_start,
            %since,
            "primed completion store"
        );

        Ok(Self {
            completions,
            scheduled,
            uncompleted,
            next_annual,
        })
    }
}

impl CompletionStore for CachedCompletionStore {
    fn recent_completions(
        &self,
        bfm_no: &str,
        _since: NaiveDate,
    ) -> RepositoryResult<Vec<CompletionRecord>> {
        Ok(self.completions.get(bfm_no).cloned().unwrap_or_default())
    }

    fn scheduled_pms(
        &self,
        _week_start: NaiveDate,
        bfm_no: &str,
    ) -> RepositoryResult<Vec<ScheduledPm>> {
        Ok(self.scheduled.get(bfm_no).cloned().unwrap_or_default())
    }

    fn uncompleted_schedules(
        &self,
        bfm_no: &str,
        pm_type: PmType,
        _before_week: NaiveDate,
    ) -> RepositoryResult<Vec<UncompletedSchedule>> {
        Ok(self
            .uncompleted
            .get(&(bfm_no.to_string(), pm_type))
            .cloned()
            .unwrap_or_default())
    }

    fn next_annual_date(&self, bfm_no: &str) -> RepositoryResult<Option<String>> {
        Ok(self.next_annual.get(bfm_no).cloned())
    }
}

// ==========================================
// InMemoryCompletionStore - plain-data store
// ==========================================

/// Store backed by plain vectors. Useful for callers that already
/// hold the history in memory, and for tests.
#[derive(Debug, Default)]
pub struct InMemoryCompletionStore {
    pub completions: Vec<CompletionRecord>,
    /// (week_start, entry)
    pub scheduled: Vec<(NaiveDate, ScheduledPm)>,
    /// (bfm_no, pm_type, entry)
    pub uncompleted: Vec<(String, PmType, UncompletedSchedule)>,
    pub next_annual: HashMap<String, String>,
}

impl InMemoryCompletionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_completion(
        &mut self,
        bfm_no: &str,
        pm_type: PmType,
        completion_date: NaiveDate,
        technician: &str,
    ) {
        self.completions.push(CompletionRecord {
            bfm_no: bfm_no.to_string(),
            pm_type,
            completion_date,
            technician: technician.to_string(),
        });
    }

    pub fn add_scheduled(
        &mut self,
        week_start: NaiveDate,
        bfm_no: &str,
        pm_type: PmType,
        technician: Option<&str>,
        status: &str,
    ) {
        self.scheduled.push((
            week_start,
            ScheduledPm {
                bfm_no: bfm_no.to_string(),
                pm_type,
                technician: technician.map(|s| s.to_string()),
                status: status.to_string(),
            },
        ));
    }

    pub fn add_uncompleted(
        &mut self,
        bfm_no: &str,
        pm_type: PmType,
        week_start: NaiveDate,
        technician: Option<&str>,
    ) {
        self.uncompleted.push((
            bfm_no.to_string(),
            pm_type,
            UncompletedSchedule {
                week_start,
                technician: technician.map(|s| s.to_string()),
                status: SCHEDULE_STATUS_SCHEDULED.to_string(),
                scheduled_date: None,
            },
        ));
    }

    pub fn set_next_annual(&mut self, bfm_no: &str, date_str: &str) {
        self.next_annual
            .insert(bfm_no.to_string(), date_str.to_string());
    }
}

impl CompletionStore for InMemoryCompletionStore {
    fn recent_completions(
        &self,
        bfm_no: &str,
        since: NaiveDate,
    ) -> RepositoryResult<Vec<CompletionRecord>> {
        let mut hits: Vec<CompletionRecord> = self
            .completions
            .iter()
            .filter(|c| c.bfm_no == bfm_no && c.completion_date >= since)
            .cloned()
            .collect();
        hits.sort_by(|a, b| b.completion_date.cmp(&a.completion_date));
        Ok(hits)
    }

    fn scheduled_pms(
        &self,
        week_start: NaiveDate,
        bfm_no: &str,
    ) -> RepositoryResult<Vec<ScheduledPm>> {
        Ok(self
            .scheduled
            .iter()
            .filter(|(week, entry)| *week == week_start && entry.bfm_no == bfm_no)
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    fn uncompleted_schedules(
        &self,
        bfm_no: &str,
        pm_type: PmType,
        before_week: NaiveDate,
    ) -> RepositoryResult<Vec<UncompletedSchedule>> {
        let mut hits: Vec<UncompletedSchedule> = self
            .uncompleted
            .iter()
            .filter(|(bfm, pt, entry)| {
                bfm == bfm_no && *pt == pm_type && entry.week_start < before_week
            })
            .map(|(_, _, entry)| entry.clone())
            .collect();
        hits.sort_by(|a, b| b.week_start.cmp(&a.week_start));
        hits.truncate(UNCOMPLETED_KEEP_PER_KEY);
        Ok(hits)
    }

    fn next_annual_date(&self, bfm_no: &str) -> RepositoryResult<Option<String>> {
        Ok(self.next_annual.get(bfm_no).cloned())
    }
}
