// ==========================================
// AIT CMMS - repository layer
// ==========================================
// Data access only; no rule logic. All queries parameterized.
// ==========================================

pub mod completion_repo;
pub mod equipment_repo;
pub mod error;

pub use completion_repo::{
    CachedCompletionStore, CompletionStore, InMemoryCompletionStore, LiveCompletionRepository,
};
pub use equipment_repo::EquipmentRepository;
pub use error::{RepositoryError, RepositoryResult};
