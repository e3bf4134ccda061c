// ==========================================
// AIT CMMS - domain layer
// ==========================================
// Entities and types only; no data access, no rule logic.
// ==========================================

pub mod equipment;
pub mod types;

pub use equipment::{
    week_start_monday, CompletionRecord, Equipment, PmAssignment, PmEligibilityResult,
    ScheduledPm, UncompletedSchedule, DEFAULT_PRIORITY_TIER, EQUIPMENT_STATUS_ACTIVE,
    SCHEDULE_STATUS_SCHEDULED,
};
pub use types::{CompletionSource, PmStatus, PmType};
