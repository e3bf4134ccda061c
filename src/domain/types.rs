// ==========================================
// AIT CMMS - domain types
// ==========================================
// PM cycle types and eligibility statuses.
// Serialized as the database stores them.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// PM type (maintenance cycle)
// ==========================================
// Stored in pm_completions / weekly_pm_schedules as
// "Monthly" / "Annual".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PmType {
    Monthly,
    Annual,
}

impl PmType {
    /// Minimum days between two completions of the same cycle.
    pub fn min_interval_days(&self) -> i64 {
        match self {
            PmType::Monthly => 30,
            PmType::Annual => 365,
        }
    }

    /// Target cadence of the cycle.
    pub fn ideal_frequency_days(&self) -> i64 {
        match self {
            PmType::Monthly => 30,
            PmType::Annual => 365,
        }
    }

    /// Upper bound of the "due now" window.
    pub fn max_window_days(&self) -> i64 {
        match self {
            PmType::Monthly => 35,
            PmType::Annual => 370,
        }
    }

    /// Priority score for equipment with no completion on record.
    /// Outranks every score the overdue formula can produce (capped at 999).
    pub fn never_completed_priority(&self) -> i32 {
        match self {
            PmType::Monthly => 1000,
            PmType::Annual => 900,
        }
    }

    /// Database representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            PmType::Monthly => "Monthly",
            PmType::Annual => "Annual",
        }
    }

    /// Parse the database representation.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim() {
            "Monthly" => Some(PmType::Monthly),
            "Annual" => Some(PmType::Annual),
            _ => None,
        }
    }
}

impl fmt::Display for PmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

// ==========================================
// Eligibility status
// ==========================================
// CONFLICTED means an unresolved schedule entry or a cross-cycle
// timing clash blocks this week; NOT_DUE means the cadence simply
// has not elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PmStatus {
    Due,
    NotDue,
    RecentlyCompleted,
    Conflicted,
}

impl fmt::Display for PmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PmStatus::Due => write!(f, "DUE"),
            PmStatus::NotDue => write!(f, "NOT_DUE"),
            PmStatus::RecentlyCompleted => write!(f, "RECENTLY_COMPLETED"),
            PmStatus::Conflicted => write!(f, "CONFLICTED"),
        }
    }
}

// ==========================================
// Source of a last-completion date
// ==========================================
// The completion log wins over the equipment master when both exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionSource {
    CompletionLog,
    EquipmentMaster,
}

impl fmt::Display for CompletionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionSource::CompletionLog => write!(f, "pm_completions_table"),
            CompletionSource::EquipmentMaster => write!(f, "equipment_table"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pm_type_db_round_trip() {
        assert_eq!(PmType::from_db_str("Monthly"), Some(PmType::Monthly));
        assert_eq!(PmType::from_db_str(" Annual "), Some(PmType::Annual));
        assert_eq!(PmType::from_db_str("Quarterly"), None);
        assert_eq!(PmType::Monthly.as_db_str(), "Monthly");
    }

    #[test]
    fn test_pm_type_cadence() {
        assert_eq!(PmType::Monthly.min_interval_days(), 30);
        assert_eq!(PmType::Monthly.max_window_days(), 35);
        assert_eq!(PmType::Annual.min_interval_days(), 365);
        assert_eq!(PmType::Annual.max_window_days(), 370);
    }

    #[test]
    fn test_never_completed_outranks_overdue_cap() {
        assert!(PmType::Monthly.never_completed_priority() > 999);
        assert!(PmType::Annual.never_completed_priority() > 899);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(PmStatus::RecentlyCompleted.to_string(), "RECENTLY_COMPLETED");
        assert_eq!(PmStatus::NotDue.to_string(), "NOT_DUE");
    }
}
