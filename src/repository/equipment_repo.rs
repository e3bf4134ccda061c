// ==========================================
// AIT CMMS - equipment master repository
// ==========================================
// Read-only roster access. The scheduler never mutates master
// data; the equipment-management surface owns writes.
// ==========================================

use crate::domain::equipment::{Equipment, DEFAULT_PRIORITY_TIER, EQUIPMENT_STATUS_ACTIVE};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

pub struct EquipmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EquipmentRepository {
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

    /// Active roster, annotated with the curated priority tier.
    ///
    /// The `monthly_pm` / `annual_pm` columns carry an 'X' marker
    /// when the cycle applies; anything else (including NULL) means
    /// the cycle does not apply. Assets absent from `priority_map`
    /// default to tier 99.
    pub fn load_active(
        &self,
        priority_map: &HashMap<String, i32>,
    ) -> RepositoryResult<Vec<Equipment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT bfm_equipment_no, description, monthly_pm, annual_pm,
                   last_monthly_pm, last_annual_pm, status
            FROM equipment
            WHERE status = ?1
            ORDER BY bfm_equipment_no
            "#,
        )?;

        let rows = stmt.query_map(params![EQUIPMENT_STATUS_ACTIVE], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut roster = Vec::new();
        for row in rows {
            let (bfm_no, description, monthly_pm, annual_pm, last_monthly, last_annual, status) =
                row?;
            let priority = priority_map
                .get(&bfm_no)
                .copied()
                .unwrap_or(DEFAULT_PRIORITY_TIER);

            roster.push(Equipment {
                has_monthly: monthly_pm.as_deref() == Some("X"),
                has_annual: annual_pm.as_deref() == Some("X"),
                bfm_no,
                description: description.unwrap_or_default(),
                last_monthly_date: last_monthly.filter(|s| !s.is_empty()),
                last_annual_date: last_annual.filter(|s| !s.is_empty()),
                status,
                priority,
            });
        }

        debug!(count = roster.len(), "loaded active equipment roster");
        Ok(roster)
    }
}
