//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures. A missing
/// collaborator that the caller was required to provide is a defect and
/// panics instead of surfacing here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The operation is forbidden in the entity's current state
    /// (e.g. mutating a closed order).
    #[error("not allowed: {0}")]
    NotAllowed(String),

    /// The caller supplied an argument the domain rejects
    /// (e.g. checking out an empty cart, negative money).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A conflict occurred (e.g. re-identifying a persisted entity).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn not_allowed(msg: impl Into<String>) -> Self {
        Self::NotAllowed(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Business-rule rejections the caller can recover from.
    pub fn is_business_rejection(&self) -> bool {
        matches!(self, Self::NotAllowed(_) | Self::Conflict(_))
    }
}
