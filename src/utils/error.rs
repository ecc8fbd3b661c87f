use crate::domain::model::SequenceNumber;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DepotError {
    #[error("No customers in queue")]
    EmptyQueue,

    #[error("Depot has not been initialized; load the customer and parcel sources first")]
    NotInitialized,

    #[error("Customer with specified sequence number not found: {sequence}")]
    CustomerNotFound { sequence: SequenceNumber },

    #[error("Malformed record in {source_name} at line {line}: {reason}")]
    MalformedRecord {
        source_name: String,
        line: u64,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Queue,
    Initialization,
    InvalidArgument,
    Data,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DepotError {
    pub fn validation(message: impl Into<String>) -> Self {
        DepotError::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DepotError::EmptyQueue => ErrorCategory::Queue,
            DepotError::NotInitialized => ErrorCategory::Initialization,
            DepotError::CustomerNotFound { .. } | DepotError::ValidationError { .. } => {
                ErrorCategory::InvalidArgument
            }
            DepotError::MalformedRecord { .. }
            | DepotError::CsvError(_)
            | DepotError::SerializationError(_) => ErrorCategory::Data,
            DepotError::IoError(_) => ErrorCategory::Io,
            DepotError::ConfigError { .. }
            | DepotError::ConfigValidationError { .. }
            | DepotError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// 錯誤嚴重程度，決定 CLI 的退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Queue => ErrorSeverity::Low,
            ErrorCategory::Initialization | ErrorCategory::InvalidArgument => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DepotError::EmptyQueue => "Wait for new customers or add one with add-customer",
            DepotError::NotInitialized => "Load the customer and parcel files before adding records",
            DepotError::CustomerNotFound { .. } => {
                "Check the sequence number against the current queue (list)"
            }
            DepotError::MalformedRecord { .. } | DepotError::CsvError(_) => {
                "Fix the offending line in the source file; other lines are unaffected"
            }
            DepotError::IoError(_) => "Check that the file exists and is readable/writable",
            DepotError::SerializationError(_) => "Report this as a bug",
            DepotError::ValidationError { .. } => "Correct the input values and try again",
            DepotError::ConfigError { .. }
            | DepotError::ConfigValidationError { .. }
            | DepotError::InvalidConfigValueError { .. } => {
                "Review the configuration file or command line flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DepotError::EmptyQueue => "There are no customers waiting in the queue.".to_string(),
            DepotError::NotInitialized => "Please initialize the system first.".to_string(),
            DepotError::CustomerNotFound { sequence } => {
                format!("No customer with sequence number {} is in the queue.", sequence)
            }
            DepotError::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DepotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_invalid_argument() {
        let err = DepotError::CustomerNotFound { sequence: 7 };
        assert_eq!(err.category(), ErrorCategory::InvalidArgument);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains('7'));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = DepotError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_empty_queue_is_low_severity() {
        assert_eq!(DepotError::EmptyQueue.severity(), ErrorSeverity::Low);
        assert_eq!(DepotError::EmptyQueue.to_string(), "No customers in queue");
    }
}
