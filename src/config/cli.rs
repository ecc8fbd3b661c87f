use crate::config::{
    DEFAULT_AUDIT_LOG, DEFAULT_CUSTOMER_SOURCE, DEFAULT_DATA_DIR, DEFAULT_PARCEL_SOURCE,
    DEFAULT_REPORT,
};
use crate::core::depot::DEFAULT_LONG_STORED_DAYS;
use crate::domain::model::FeeSchedule;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_range, Validate};
use clap::Args;
use serde::{Deserialize, Serialize};

/// Flag-based configuration shared by every `depot` subcommand.
#[derive(Debug, Clone, Serialize, Deserialize, Args)]
pub struct CliConfig {
    /// TOML configuration file; when given it replaces the source and output flags
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory the record sources, audit log and report are resolved against
    #[arg(long, default_value = DEFAULT_DATA_DIR, global = true)]
    pub data_dir: String,

    #[arg(long, default_value = DEFAULT_CUSTOMER_SOURCE, global = true)]
    pub customers: String,

    #[arg(long, default_value = DEFAULT_PARCEL_SOURCE, global = true)]
    pub parcels: String,

    #[arg(long, default_value = DEFAULT_AUDIT_LOG, global = true)]
    pub log_file: String,

    #[arg(long, default_value = DEFAULT_REPORT, global = true)]
    pub report: String,

    #[arg(long, default_value_t = DEFAULT_LONG_STORED_DAYS, global = true)]
    pub long_stored_days: u32,

    #[arg(short, long, help = "Enable verbose output", global = true)]
    pub verbose: bool,

    #[arg(long, help = "Emit diagnostics as JSON lines", global = true)]
    pub json_logs: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            config: None,
            data_dir: DEFAULT_DATA_DIR.to_string(),
            customers: DEFAULT_CUSTOMER_SOURCE.to_string(),
            parcels: DEFAULT_PARCEL_SOURCE.to_string(),
            log_file: DEFAULT_AUDIT_LOG.to_string(),
            report: DEFAULT_REPORT.to_string(),
            long_stored_days: DEFAULT_LONG_STORED_DAYS,
            verbose: false,
            json_logs: false,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn customer_source(&self) -> &str {
        &self.customers
    }

    fn parcel_source(&self) -> &str {
        &self.parcels
    }

    fn audit_log_path(&self) -> &str {
        &self.log_file
    }

    fn report_path(&self) -> &str {
        &self.report
    }

    fn long_stored_days(&self) -> u32 {
        self.long_stored_days
    }

    fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule::default()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("data_dir", &self.data_dir)?;
        validate_path("customers", &self.customers)?;
        validate_path("parcels", &self.parcels)?;
        validate_path("log_file", &self.log_file)?;
        validate_path("report", &self.report)?;
        validate_range("long_stored_days", self.long_stored_days, 0, 3650)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = CliConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.customer_source(), "Custs.csv");
        assert_eq!(config.long_stored_days(), 30);
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let config = CliConfig {
            parcels: String::new(),
            ..CliConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
