use crate::config::{
    DEFAULT_AUDIT_LOG, DEFAULT_CUSTOMER_SOURCE, DEFAULT_DATA_DIR, DEFAULT_PARCEL_SOURCE,
    DEFAULT_REPORT,
};
use crate::core::depot::DEFAULT_LONG_STORED_DAYS;
use crate::domain::model::FeeSchedule;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{DepotError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub depot: DepotInfo,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub report: ReportConfig,
    pub fees: Option<FeeSchedule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepotInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub data_dir: String,
    pub customers: String,
    pub parcels: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            customers: DEFAULT_CUSTOMER_SOURCE.to_string(),
            parcels: DEFAULT_PARCEL_SOURCE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub log_file: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            log_file: DEFAULT_AUDIT_LOG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output: String,
    pub long_stored_days: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: DEFAULT_REPORT.to_string(),
            long_stored_days: DEFAULT_LONG_STORED_DAYS,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DepotError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DepotError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DEPOT_DATA})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DepotError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("depot.name", &self.depot.name)?;
        validate_path("sources.data_dir", &self.sources.data_dir)?;
        validate_path("sources.customers", &self.sources.customers)?;
        validate_path("sources.parcels", &self.sources.parcels)?;
        validate_path("audit.log_file", &self.audit.log_file)?;
        validate_path("report.output", &self.report.output)?;
        validate_range("report.long_stored_days", self.report.long_stored_days, 0, 3650)?;

        if let Some(fees) = &self.fees {
            for (field, value) in [
                ("fees.weight_rate", fees.weight_rate),
                ("fees.volume_rate", fees.volume_rate),
                ("fees.day_rate", fees.day_rate),
                ("fees.large_volume", fees.large_volume),
                ("fees.medium_volume", fees.medium_volume),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(DepotError::InvalidConfigValueError {
                        field: field.to_string(),
                        value: value.to_string(),
                        reason: "Value must be a non-negative number".to_string(),
                    });
                }
            }
            if fees.medium_volume > fees.large_volume {
                return Err(DepotError::InvalidConfigValueError {
                    field: "fees.medium_volume".to_string(),
                    value: fees.medium_volume.to_string(),
                    reason: format!(
                        "Must not exceed fees.large_volume ({})",
                        fees.large_volume
                    ),
                });
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn data_dir(&self) -> &str {
        &self.sources.data_dir
    }

    fn customer_source(&self) -> &str {
        &self.sources.customers
    }

    fn parcel_source(&self) -> &str {
        &self.sources.parcels
    }

    fn audit_log_path(&self) -> &str {
        &self.audit.log_file
    }

    fn report_path(&self) -> &str {
        &self.report.output
    }

    fn long_stored_days(&self) -> u32 {
        self.report.long_stored_days
    }

    fn fee_schedule(&self) -> FeeSchedule {
        self.fees.unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let toml_content = r#"
[depot]
name = "north-depot"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.depot.name, "north-depot");
        assert_eq!(config.customer_source(), "Custs.csv");
        assert_eq!(config.parcel_source(), "Parcels.csv");
        assert_eq!(config.audit_log_path(), "warehouse_log.txt");
        assert_eq!(config.long_stored_days(), 30);
        assert_eq!(config.fee_schedule(), FeeSchedule::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[depot]
name = "north-depot"
description = "Main collection point"

[sources]
data_dir = "./data"
customers = "customers.csv"
parcels = "parcels.csv"

[audit]
log_file = "logs/audit.txt"

[report]
output = "out/report.txt"
long_stored_days = 14

[fees]
day_rate = 2.5
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.data_dir(), "./data");
        assert_eq!(config.report_path(), "out/report.txt");
        assert_eq!(config.long_stored_days(), 14);
        let fees = config.fee_schedule();
        assert_eq!(fees.day_rate, 2.5);
        assert_eq!(fees.weight_rate, 0.5);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_DEPOT_DATA_DIR", "/srv/depot");

        let toml_content = r#"
[depot]
name = "env"

[sources]
data_dir = "${TEST_DEPOT_DATA_DIR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.sources.data_dir, "/srv/depot");

        std::env::remove_var("TEST_DEPOT_DATA_DIR");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[depot]
name = "bad"

[fees]
medium_volume = 20000.0
large_volume = 10000.0
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_depot_section_fails() {
        assert!(TomlConfig::from_toml_str("[sources]\ncustomers = \"c.csv\"\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[depot]
name = "file-test"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.depot.name, "file-test");
    }
}
