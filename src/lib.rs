pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::{FileAuditLog, LocalStorage, MemoryAuditLog};
pub use crate::core::depot::{DepotService, DepotSettings, LoadSummary, ProcessOutcome};
pub use crate::utils::error::{DepotError, Result};
