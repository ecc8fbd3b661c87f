// Adapters layer: concrete implementations of the domain ports.

pub mod audit;
pub mod storage;

pub use audit::{FileAuditLog, MemoryAuditLog};
pub use storage::LocalStorage;
