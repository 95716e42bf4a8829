//! Error types for analytics operations
//!
//! Both variants are recovered inside the engine: a malformed date drops the
//! record from the one computation that needed it, and an empty denominator
//! yields 0. They are exposed for callers that want the strict variants.

use crate::dates::MalformedDateError;

/// Result type for analytics operations
pub type AnalyticsResult<T> = std::result::Result<T, AnalyticsError>;

/// Errors that can occur in analytics operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalyticsError {
    /// Unparseable date during bucketing or duration math
    #[error(transparent)]
    MalformedDate(#[from] MalformedDateError),

    /// Ratio requested over a zero denominator
    #[error("Empty denominator for ratio with numerator {numerator}")]
    EmptyDenominator { numerator: f64 },
}
