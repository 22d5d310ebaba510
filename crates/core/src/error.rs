//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// malformed identifiers). Persistence concerns belong to the infra crate, and
/// lookups of unknown ids return `None` rather than an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field was empty or absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField(field)
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Name of the missing field, if this is a `MissingField` error.
    pub fn missing(&self) -> Option<&'static str> {
        match self {
            Self::MissingField(field) => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_names_the_field() {
        let err = DomainError::missing_field("customerName");
        assert_eq!(err.missing(), Some("customerName"));
        assert_eq!(err.to_string(), "missing required field: customerName");
    }

    #[test]
    fn other_variants_have_no_missing_field() {
        assert_eq!(DomainError::invalid_id("T0x1").missing(), None);
        assert_eq!(DomainError::validation("x").missing(), None);
    }
}
