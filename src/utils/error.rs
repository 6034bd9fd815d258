use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Spreadsheet source unavailable at {url}: {reason}")]
    SourceUnavailableError { url: String, reason: String },

    #[error("Workbook decoding failed: {0}")]
    WorkbookError(#[from] calamine::XlsxError),

    #[error("Worksheet '{name}' not found (available: {available})")]
    WorksheetNotFoundError { name: String, available: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Row {row}: column '{column}' holds '{value}', which is not a numeric enabled flag")]
    MalformedEnabledFlagError {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Failed to write output to {path}: {source}")]
    OutputWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Source,
    Data,
    Output,
    Configuration,
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
            EtlError::ApiError(_) | EtlError::SourceUnavailableError { .. } => {
                ErrorCategory::Network
            }
            EtlError::WorkbookError(_)
            | EtlError::WorksheetNotFoundError { .. }
            | EtlError::CsvError(_) => ErrorCategory::Source,
            EtlError::MalformedEnabledFlagError { .. }
            | EtlError::ValidationError { .. }
            | EtlError::SerializationError(_) => ErrorCategory::Data,
            EtlError::OutputWriteError { .. } => ErrorCategory::Output,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    /// 嚴重程度決定 CLI 的退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Source | ErrorCategory::Data | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ApiError(_) | EtlError::SourceUnavailableError { .. } => {
                format!("Could not download the channel map spreadsheet: {}", self)
            }
            EtlError::WorkbookError(_) | EtlError::CsvError(_) => {
                format!("The downloaded spreadsheet could not be read: {}", self)
            }
            EtlError::WorksheetNotFoundError { name, .. } => {
                format!("The spreadsheet has no worksheet named '{}'", name)
            }
            EtlError::MalformedEnabledFlagError { row, column, value } => format!(
                "Data row {} has an unreadable '{}' value: '{}'",
                row, column, value
            ),
            EtlError::OutputWriteError { path, .. } => {
                format!("Could not write the channel map to {}", path)
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => format!("Configuration problem: {}", self),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ApiError(_) | EtlError::SourceUnavailableError { .. } => {
                "Check network access and that the sheet is published; the key is passed with --sheet"
            }
            EtlError::WorkbookError(_) | EtlError::CsvError(_) => {
                "Make sure --format matches the export the service returns"
            }
            EtlError::WorksheetNotFoundError { .. } => {
                "Pass the correct worksheet name with --worksheet"
            }
            EtlError::MalformedEnabledFlagError { .. } => {
                "Fix the Enabled cell in the spreadsheet so it holds 0 or 1"
            }
            EtlError::ValidationError { .. } => {
                "Fill in the crate, slot, channel and detector columns of enabled rows"
            }
            EtlError::OutputWriteError { .. } => {
                "Check that the output directory exists and is writable"
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Review the command line flags and the TOML configuration file"
            }
            EtlError::SerializationError(_) => {
                "Re-run with --verbose to inspect the rows being processed"
            }
        }
    }

    /// CLI 退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}
