//! Submission and query validation.
//!
//! Every field of a submission is checked independently so callers see all
//! violations in one response, including fields of the wrong JSON type.

use crate::error::{FieldError, PortalError, ValidationErrors};
use crate::models::{Month, ReportKey, ReportMetrics, ReportSubmission};
use serde_json::Value;

/// Largest integer a JSON number carries without loss (2^53 - 1).
pub const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

const REQUIRED: &str = "Required";
const NOT_POSITIVE: &str = "Must be a positive number";
const NOT_WHOLE: &str = "Must be a whole number";
const TOO_LARGE: &str = "Must not exceed 9007199254740991";

/// Validate a raw submission into its store key and metrics.
pub fn validate_submission(
    submission: &ReportSubmission,
) -> Result<(ReportKey, ReportMetrics), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let ngo_id = match required_string("ngoId", submission.ngo_id.as_ref(), &mut errors) {
        Some(id) if id.is_empty() => {
            errors.push(FieldError::new("ngoId", "NGO ID is required"));
            None
        }
        other => other.map(str::to_string),
    };

    let month = required_string("month", submission.month.as_ref(), &mut errors).and_then(|raw| {
        let parsed = Month::parse(raw);
        if parsed.is_none() {
            errors.push(FieldError::new("month", "Month must be in YYYY-MM format"));
        }
        parsed
    });

    let people_helped = positive_integer("peopleHelped", submission.people_helped.as_ref(), &mut errors);
    let events_conducted =
        positive_integer("eventsConducted", submission.events_conducted.as_ref(), &mut errors);
    let funds_utilized = positive_real("fundsUtilized", submission.funds_utilized.as_ref(), &mut errors);

    match (ngo_id, month, people_helped, events_conducted, funds_utilized) {
        (Some(ngo_id), Some(month), Some(people), Some(events), Some(funds))
            if errors.is_empty() =>
        {
            Ok((
                ReportKey::new(ngo_id, month),
                ReportMetrics {
                    people_helped: people,
                    events_conducted: events,
                    funds_utilized: funds,
                },
            ))
        }
        _ => Err(errors),
    }
}

/// Parse the month of an aggregate query.
pub fn parse_month_query(raw: &str) -> Result<Month, PortalError> {
    Month::parse(raw).ok_or_else(|| PortalError::InvalidMonth(raw.to_string()))
}

/// JSON type name used in type-mismatch messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn required_string<'a>(
    field: &'static str,
    value: Option<&'a Value>,
    errors: &mut ValidationErrors,
) -> Option<&'a str> {
    match value {
        None => {
            errors.push(FieldError::new(field, REQUIRED));
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            errors.push(FieldError::new(
                field,
                format!("Expected string, received {}", type_name(other)),
            ));
            None
        }
    }
}

fn required_number(
    field: &'static str,
    value: Option<&Value>,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    match value {
        None => {
            errors.push(FieldError::new(field, REQUIRED));
            None
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(other) => {
            errors.push(FieldError::new(
                field,
                format!("Expected number, received {}", type_name(other)),
            ));
            None
        }
    }
}

fn positive_integer(
    field: &'static str,
    value: Option<&Value>,
    errors: &mut ValidationErrors,
) -> Option<u64> {
    let value = required_number(field, value, errors)?;

    if value.fract() != 0.0 {
        errors.push(FieldError::new(field, NOT_WHOLE));
        None
    } else if value <= 0.0 {
        errors.push(FieldError::new(field, NOT_POSITIVE));
        None
    } else if value > MAX_EXACT_INTEGER {
        errors.push(FieldError::new(field, TOO_LARGE));
        None
    } else {
        Some(value as u64)
    }
}

fn positive_real(
    field: &'static str,
    value: Option<&Value>,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    let value = required_number(field, value, errors)?;

    if value <= 0.0 {
        errors.push(FieldError::new(field, NOT_POSITIVE));
        None
    } else {
        Some(value)
    }
}
