//! Error types for report submission and aggregation.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Message returned to API callers for a malformed month query.
pub const INVALID_MONTH_MESSAGE: &str = "Invalid month format. Use YYYY-MM";

/// A single rejected field of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Wire name of the field (e.g. `peopleHelped`).
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All violations found in one submission, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Returns true if `field` has at least one violation.
    #[cfg(test)]
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("; "))
    }
}

/// Failures raised by a report store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    // The in-memory store cannot fail this way; external backends can.
    #[allow(dead_code)]
    #[error("report store unavailable: {0}")]
    Unavailable(String),

    #[error("duplicate report for {0}")]
    DuplicateKey(String),
}

/// Monthly totals no longer fit their numeric types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("totals overflow after adding report {report_id}")]
pub struct TotalsOverflow {
    /// The report whose metrics could not be added.
    pub report_id: String,
}

/// Errors surfaced by the portal operations.
#[derive(Debug, Error)]
pub enum PortalError {
    /// One or more submission fields were rejected.
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// A month query parameter was not `YYYY-MM`.
    #[error("Invalid month format. Use YYYY-MM: '{0}'")]
    InvalidMonth(String),

    /// The storage backend failed; not caused by the caller.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Stored metrics for the month sum past the representable range.
    #[error("Monthly totals out of range: {0}")]
    Overflow(#[from] TotalsOverflow),
}
