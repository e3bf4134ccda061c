// ==========================================
// AIT CMMS - end-to-end scheduling tests
// ==========================================
// Exercises the full stack against a real SQLite file: schema,
// repositories, cached snapshot, eligibility, and assignment
// ordering.
// ==========================================

use ait_cmms::engine::PmSchedulingService;
use ait_cmms::{db, logging, SchedulerConfig};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// Target week: Monday 2025-01-20, evaluated Wednesday
const WEEK: (i32, u32, u32) = (2025, 1, 20);
const TODAY: (i32, u32, u32) = (2025, 1, 22);

fn seed_equipment(
    conn: &Connection,
    bfm_no: &str,
    monthly: bool,
    annual: bool,
    status: &str,
) {
    conn.execute(
        r#"
        INSERT INTO equipment (bfm_equipment_no, description, monthly_pm, annual_pm, status)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![
            bfm_no,
            format!("Asset {}", bfm_no),
            if monthly { Some("X") } else { None },
            if annual { Some("X") } else { None },
            status
        ],
    )
    .unwrap();
}

fn seed_completion(conn: &Connection, bfm_no: &str, pm_type: &str, completed: NaiveDate) {
    conn.execute(
        r#"
        INSERT INTO pm_completions (bfm_equipment_no, pm_type, completion_date, technician_name)
        VALUES (?1, ?2, ?3, 'J. Harmon')
        "#,
        params![bfm_no, pm_type, completed.format("%Y-%m-%d").to_string()],
    )
    .unwrap();
}

fn seed_schedule_entry(
    conn: &Connection,
    bfm_no: &str,
    pm_type: &str,
    week_start: NaiveDate,
    status: &str,
) {
    conn.execute(
        r#"
        INSERT INTO weekly_pm_schedules
            (bfm_equipment_no, pm_type, week_start_date, assigned_technician, status)
        VALUES (?1, ?2, ?3, 'M. Kowalski', ?4)
        "#,
        params![
            bfm_no,
            pm_type,
            week_start.format("%Y-%m-%d").to_string(),
            status
        ],
    )
    .unwrap();
}

struct Fixture {
    conn: Arc<Mutex<Connection>>,
    _dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        logging::init_test();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmms.db");
        let conn = db::open_connection(path.to_str().unwrap()).unwrap();
        db::ensure_schema(&conn).unwrap();
        Self {
            conn: Arc::new(Mutex::new(conn)),
            _dir: dir,
        }
    }

    fn with_conn(&self, f: impl FnOnce(&Connection)) {
        let conn = self.conn.lock().unwrap();
        f(&conn);
    }

    fn service(&self, priority_map: HashMap<String, i32>) -> PmSchedulingService {
        PmSchedulingService::new(self.conn.clone(), priority_map, SchedulerConfig::default())
    }

    fn run(&self, priority_map: HashMap<String, i32>, max: Option<usize>) -> Vec<ait_cmms::PmAssignment> {
        let (wy, wm, wd) = WEEK;
        let (ty, tm, td) = TODAY;
        self.service(priority_map)
            .generate_weekly_schedule_as_of(date(wy, wm, wd), date(ty, tm, td), max)
            .unwrap()
    }
}

#[test]
fn test_full_run_statuses_and_ordering() {
    let fx = Fixture::new();
    let today = date(TODAY.0, TODAY.1, TODAY.2);

    fx.with_conn(|conn| {
        // Never completed: lands at score 1000
        seed_equipment(conn, "BFM-100", true, false, "Active");
        // Completed 10 days ago: recently completed, stays off
        seed_equipment(conn, "BFM-200", true, false, "Active");
        seed_completion(conn, "BFM-200", "Monthly", today - chrono::Duration::days(10));
        // Overdue, but an unresolved entry from two weeks back blocks it
        seed_equipment(conn, "BFM-300", true, false, "Active");
        seed_completion(conn, "BFM-300", "Monthly", today - chrono::Duration::days(40));
        seed_schedule_entry(conn, "BFM-300", "Monthly", date(2025, 1, 6), "Scheduled");
        // Overdue by 10 days, curated tier 1: sorts ahead of everything
        seed_equipment(conn, "BFM-400", true, false, "Active");
        seed_completion(conn, "BFM-400", "Monthly", today - chrono::Duration::days(40));
        // Annual-only, never completed: score 900
        seed_equipment(conn, "BFM-500", false, true, "Active");
        // Retired equipment never appears
        seed_equipment(conn, "BFM-600", true, true, "Retired");
    });

    let mut priority_map = HashMap::new();
    priority_map.insert("BFM-400".to_string(), 1);

    let assignments = fx.run(priority_map, None);

    let numbers: Vec<&str> = assignments.iter().map(|a| a.bfm_no.as_str()).collect();
    assert_eq!(numbers, vec!["BFM-400", "BFM-100", "BFM-500"]);

    // Tier 1 leads despite the lower urgency score
    assert_eq!(assignments[0].priority_score, 600);
    assert!(assignments[0].reason.contains("OVERDUE by 10 days"));
    // Within tier 99, never-completed Monthly outranks never-completed Annual
    assert_eq!(assignments[1].priority_score, 1000);
    assert_eq!(assignments[2].priority_score, 900);
}

#[test]
fn test_capacity_cap() {
    let fx = Fixture::new();
    fx.with_conn(|conn| {
        for i in 0..6 {
            seed_equipment(conn, &format!("BFM-{:03}", i), true, false, "Active");
        }
    });

    let assignments = fx.run(HashMap::new(), Some(4));
    assert_eq!(assignments.len(), 4);
}

#[test]
fn test_stale_entry_resolution_feedback_loop() {
    let fx = Fixture::new();
    let today = date(TODAY.0, TODAY.1, TODAY.2);

    fx.with_conn(|conn| {
        seed_equipment(conn, "BFM-300", true, false, "Active");
        seed_completion(conn, "BFM-300", "Monthly", today - chrono::Duration::days(40));
        seed_schedule_entry(conn, "BFM-300", "Monthly", date(2025, 1, 6), "Scheduled");
    });

    // Blocked while the old entry is still open
    assert!(fx.run(HashMap::new(), None).is_empty());

    // Marking the entry completed releases the asset next run
    fx.with_conn(|conn| {
        conn.execute(
            "UPDATE weekly_pm_schedules SET status = 'Completed' WHERE bfm_equipment_no = 'BFM-300'",
            [],
        )
        .unwrap();
    });

    let assignments = fx.run(HashMap::new(), None);
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].bfm_no, "BFM-300");
    assert_eq!(assignments[0].priority_score, 600);
}

#[test]
fn test_already_scheduled_this_week_excluded() {
    let fx = Fixture::new();
    fx.with_conn(|conn| {
        seed_equipment(conn, "BFM-100", true, false, "Active");
        seed_schedule_entry(conn, "BFM-100", "Monthly", date(WEEK.0, WEEK.1, WEEK.2), "Scheduled");
    });

    assert!(fx.run(HashMap::new(), None).is_empty());
}

#[test]
fn test_non_monday_week_normalized() {
    let fx = Fixture::new();
    fx.with_conn(|conn| {
        seed_equipment(conn, "BFM-100", true, false, "Active");
        // Entry keyed to the canonical Monday
        seed_schedule_entry(conn, "BFM-100", "Monthly", date(2025, 1, 20), "Scheduled");
    });

    // Requesting the Wednesday still matches the Monday-keyed entry
    let assignments = fx
        .service(HashMap::new())
        .generate_weekly_schedule_as_of(date(2025, 1, 22), date(TODAY.0, TODAY.1, TODAY.2), None)
        .unwrap();
    assert!(assignments.is_empty());
}

#[test]
fn test_next_annual_override_end_to_end() {
    let fx = Fixture::new();
    fx.with_conn(|conn| {
        seed_equipment(conn, "BFM-700", false, true, "Active");
        conn.execute(
            "UPDATE equipment SET next_annual_pm = '2025-01-12' WHERE bfm_equipment_no = 'BFM-700'",
            [],
        )
        .unwrap();
    });

    // 10 days overdue against the explicit date
    let assignments = fx.run(HashMap::new(), None);
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].priority_score, 600);
    assert!(assignments[0].reason.contains("Next Annual PM Date: 2025-01-12"));
}
