#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

pub const DEFAULT_DATA_DIR: &str = ".";
pub const DEFAULT_CUSTOMER_SOURCE: &str = "Custs.csv";
pub const DEFAULT_PARCEL_SOURCE: &str = "Parcels.csv";
pub const DEFAULT_AUDIT_LOG: &str = "warehouse_log.txt";
pub const DEFAULT_REPORT: &str = "report.txt";
