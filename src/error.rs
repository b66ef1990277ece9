use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Source unavailable: {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error("Invalid record format at line {line}: {message}")]
    InvalidRecordFormat { line: usize, message: String },

    #[error("Invalid coordinate format: {0}")]
    InvalidCoordinateFormat(String),

    #[error("No data: {0}")]
    EmptyDataset(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl ProcessingError {
    pub fn source_unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ProcessingError::SourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_record(line: usize, message: impl Into<String>) -> Self {
        ProcessingError::InvalidRecordFormat {
            line,
            message: message.into(),
        }
    }

    /// Errors confined to a single row; the row is skipped and processing continues.
    pub fn is_row_local(&self) -> bool {
        matches!(
            self,
            ProcessingError::InvalidRecordFormat { .. }
                | ProcessingError::InvalidCoordinateFormat(_)
                | ProcessingError::MissingColumn(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_local_classification() {
        assert!(ProcessingError::invalid_record(3, "short row").is_row_local());
        assert!(ProcessingError::InvalidCoordinateFormat("12".into()).is_row_local());
        assert!(!ProcessingError::EmptyDataset("none".into()).is_row_local());
        assert!(!ProcessingError::source_unavailable("/nope", "not found").is_row_local());
    }

    #[test]
    fn test_messages() {
        let err = ProcessingError::invalid_record(41, "expected 8 fields, got 5");
        assert_eq!(
            err.to_string(),
            "Invalid record format at line 41: expected 8 fields, got 5"
        );
    }
}
