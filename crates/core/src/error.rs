//! Domain error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// A single required field that failed submit-time validation.
///
/// `field` is a dotted path into the document (e.g. `items.2.product`) so a
/// form layer can attach the message next to the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl core::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Transport concerns belong to the client crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Required fields were missing at submit time. Every missing field is
    /// listed; nothing is defaulted on the caller's behalf.
    #[error("missing required fields: {}", join_violations(.0))]
    MissingFields(Vec<FieldViolation>),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The operation is not allowed in the current lifecycle state.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn missing_fields(violations: Vec<FieldViolation>) -> Self {
        Self::MissingFields(violations)
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Field violations carried by a `MissingFields` error, empty otherwise.
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::MissingFields(v) => v,
            _ => &[],
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_display_lists_every_field() {
        let err = DomainError::missing_fields(vec![
            FieldViolation::new("invoiceNumber", "Invoice number is required"),
            FieldViolation::new("items.0.product", "Product is required"),
        ]);

        assert_eq!(
            err.to_string(),
            "missing required fields: invoiceNumber, items.0.product"
        );
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn violations_are_empty_for_other_errors() {
        assert!(DomainError::conflict("persisted").violations().is_empty());
    }
}
