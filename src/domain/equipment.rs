// ==========================================
// AIT CMMS - domain entities
// ==========================================
// Master data, completion history, and the scheduler's
// input/output records. Entities carry no data access or
// rule logic.
// ==========================================

use crate::domain::types::{PmStatus, PmType};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Status value a piece of equipment must carry to be scheduled.
pub const EQUIPMENT_STATUS_ACTIVE: &str = "Active";

/// Schedule-entry status meaning the work was assigned but never
/// signed off.
pub const SCHEDULE_STATUS_SCHEDULED: &str = "Scheduled";

/// Default priority tier for assets absent from every priority list.
pub const DEFAULT_PRIORITY_TIER: i32 = 99;

// ==========================================
// Equipment - one maintainable asset
// ==========================================
// Long-lived master data; read-only from the scheduler's
// perspective. `priority` is the curated tier (1/2/3, 99 default),
// lower value = scheduled first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub bfm_no: String,
    pub description: String,
    pub has_monthly: bool,
    pub has_annual: bool,
    /// Free-form date string from the equipment master; parsed
    /// best-effort, unparseable means "never completed".
    pub last_monthly_date: Option<String>,
    pub last_annual_date: Option<String>,
    pub status: String,
    pub priority: i32,
}

impl Equipment {
    pub fn is_active(&self) -> bool {
        self.status == EQUIPMENT_STATUS_ACTIVE
    }

    /// Whether the given PM cycle applies to this asset.
    pub fn supports(&self, pm_type: PmType) -> bool {
        match pm_type {
            PmType::Monthly => self.has_monthly,
            PmType::Annual => self.has_annual,
        }
    }

    /// Last-completion fallback date from the equipment master for
    /// the given cycle.
    pub fn last_date_str(&self, pm_type: PmType) -> Option<&str> {
        match pm_type {
            PmType::Monthly => self.last_monthly_date.as_deref(),
            PmType::Annual => self.last_annual_date.as_deref(),
        }
    }
}

// ==========================================
// CompletionRecord - historical completion fact
// ==========================================
// Immutable once written; the scheduler reads a trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub bfm_no: String,
    pub pm_type: PmType,
    pub completion_date: NaiveDate,
    pub technician: String,
}

// ==========================================
// ScheduledPm - schedule entry for the target week
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledPm {
    pub bfm_no: String,
    pub pm_type: PmType,
    pub technician: Option<String>,
    pub status: String,
}

// ==========================================
// UncompletedSchedule - stale entry from an earlier week
// ==========================================
// An assignment from a week strictly before the target week that
// was never marked completed. Its presence blocks re-assignment
// until resolved externally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UncompletedSchedule {
    pub week_start: NaiveDate,
    pub technician: Option<String>,
    pub status: String,
    pub scheduled_date: Option<String>,
}

// ==========================================
// PMAssignment - scheduler output unit
// ==========================================
// Ephemeral; produced fresh each run. Persisting it into the
// weekly schedule table is the caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PmAssignment {
    pub bfm_no: String,
    pub pm_type: PmType,
    pub description: String,
    pub priority_score: i32,
    pub reason: String,
}

// ==========================================
// PMEligibilityResult - transient rule outcome
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct PmEligibilityResult {
    pub status: PmStatus,
    pub reason: String,
    pub priority_score: i32,
    pub days_overdue: i64,
}

impl PmEligibilityResult {
    pub fn not_due(reason: impl Into<String>) -> Self {
        Self {
            status: PmStatus::NotDue,
            reason: reason.into(),
            priority_score: 0,
            days_overdue: 0,
        }
    }

    pub fn conflicted(reason: impl Into<String>) -> Self {
        Self {
            status: PmStatus::Conflicted,
            reason: reason.into(),
            priority_score: 0,
            days_overdue: 0,
        }
    }

    pub fn recently_completed(reason: impl Into<String>) -> Self {
        Self {
            status: PmStatus::RecentlyCompleted,
            reason: reason.into(),
            priority_score: 0,
            days_overdue: 0,
        }
    }

    pub fn due(reason: impl Into<String>, priority_score: i32, days_overdue: i64) -> Self {
        Self {
            status: PmStatus::Due,
            reason: reason.into(),
            priority_score,
            days_overdue,
        }
    }

    pub fn is_due(&self) -> bool {
        self.status == PmStatus::Due
    }
}

// ==========================================
// Week boundary convention
// ==========================================

/// Monday of the week containing `date`. Weekly schedule entries
/// are keyed by this canonical start date.
pub fn week_start_monday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}
