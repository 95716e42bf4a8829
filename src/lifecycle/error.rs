//! Error types for lifecycle operations

use crate::models::{RecordKind, Status};

/// Result type for lifecycle operations
pub type LifecycleResult<T> = std::result::Result<T, LifecycleError>;

/// Errors that can occur when validating or applying a transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// Requested status is outside the allowed set
    #[error("Invalid transition for {kind}: {from} -> {to}")]
    InvalidTransition {
        kind: RecordKind,
        from: Status,
        to: Status,
    },

    /// Status is not part of the kind's lifecycle
    #[error("Status {status} is not defined for {kind}")]
    UnknownStatus { kind: RecordKind, status: Status },

    /// Chain definition rejected
    #[error("Invalid chain for {kind}: {reason}")]
    InvalidChain { kind: RecordKind, reason: String },
}
