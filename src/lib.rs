// ==========================================
// AIT CMMS - preventive maintenance scheduling
// ==========================================
// Weekly PM work-list generation for the A220 equipment fleet:
// eligibility rules over completion history, priority-ordered
// assignment, and SQLite-backed repositories.
// ==========================================

pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod importer;
pub mod logging;
pub mod repository;

pub use config::SchedulerConfig;
pub use domain::equipment::{Equipment, PmAssignment, PmEligibilityResult};
pub use domain::types::{PmStatus, PmType};
pub use engine::{DateParser, PmAssignmentGenerator, PmEligibilityChecker, PmSchedulingService};
pub use repository::{
    CachedCompletionStore, CompletionStore, EquipmentRepository, InMemoryCompletionStore,
    LiveCompletionRepository, RepositoryError, RepositoryResult,
};

/// Application name
pub const APP_NAME: &str = "AIT CMMS PM Scheduler";

/// Version number (from Cargo.toml)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
