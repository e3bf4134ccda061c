// ==========================================
// AIT CMMS - scheduling engine
// ==========================================

pub mod assignment;
pub mod date_parser;
pub mod eligibility;
pub mod eligibility_core;
pub mod service;

pub use assignment::PmAssignmentGenerator;
pub use date_parser::DateParser;
pub use eligibility::PmEligibilityChecker;
pub use eligibility_core::EligibilityCore;
pub use service::PmSchedulingService;
