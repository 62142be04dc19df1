use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Download failed: {0}")]
    DownloadError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Column '{column}' not found in input header")]
    ColumnNotFoundError { column: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Io,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::DownloadError(_) => ErrorCategory::Network,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ColumnNotFoundError { .. } => ErrorCategory::Data,
            EtlError::IoError(_) | EtlError::ZipError(_) => ErrorCategory::Io,
            EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Network failures are usually transient.
            EtlError::DownloadError(_) => ErrorSeverity::Medium,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ColumnNotFoundError { .. }
            | EtlError::ProcessingError { .. } => ErrorSeverity::High,
            EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorSeverity::High,
            EtlError::IoError(_) | EtlError::ZipError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::DownloadError(_) => "Could not download the source file".to_string(),
            EtlError::CsvError(_) => "The source file could not be parsed as a table".to_string(),
            EtlError::IoError(_) => "A file could not be read or written".to_string(),
            EtlError::ZipError(_) => "The output archive could not be created".to_string(),
            EtlError::SerializationError(_) => "The summary could not be serialized".to_string(),
            EtlError::ColumnNotFoundError { column } => {
                format!("The column '{}' does not exist in the input", column)
            }
            EtlError::ConfigError { message } => format!("Configuration problem: {}", message),
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            EtlError::MissingConfigError { field } => {
                format!("Configuration field '{}' is required", field)
            }
            EtlError::ProcessingError { message } => format!("Processing failed: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::DownloadError(_) => {
                "Check the source URL and your network connection, then retry".to_string()
            }
            EtlError::CsvError(_) => {
                "Verify the delimiter setting and that the file is a CSV/TSV export".to_string()
            }
            EtlError::ColumnNotFoundError { .. } => {
                "List the header row of the file and pass an existing column name or a 0-based index"
                    .to_string()
            }
            EtlError::IoError(_) => {
                "Check that the paths exist and the process has permission to use them".to_string()
            }
            EtlError::ZipError(_) | EtlError::SerializationError(_) => {
                "Re-run without --bundle to narrow the failure down".to_string()
            }
            EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Fix the reported configuration field and run again".to_string()
            }
            EtlError::ProcessingError { .. } => {
                "Re-run with --verbose and inspect the debug log".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
