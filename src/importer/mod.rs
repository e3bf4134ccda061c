// ==========================================
// AIT CMMS - file imports
// ==========================================

pub mod priority_list;

pub use priority_list::{PriorityListLoader, PriorityListOutcome};
