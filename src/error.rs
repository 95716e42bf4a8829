use crate::analytics::AnalyticsError;
use crate::dates::MalformedDateError;
use crate::lifecycle::LifecycleError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Rejected status transition
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Analytics errors that escaped local recovery
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    /// Unparseable date where one was required
    #[error(transparent)]
    MalformedDate(#[from] MalformedDateError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::Lifecycle(LifecycleError::InvalidTransition { .. }) => "INVALID_TRANSITION",
            AppError::Lifecycle(_) => "LIFECYCLE_ERROR",
            AppError::Analytics(_) => "ANALYTICS_ERROR",
            AppError::MalformedDate(_) => "MALFORMED_DATE",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Io(_) => "IO_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Whether the operation that produced this error was blocked outright
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AppError::MalformedDate(_) | AppError::Analytics(_))
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Conversion from validator::ValidationErrors
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
