//! Data models for the reporting portal.
//!
//! This module contains the core data structures shared by the store,
//! the aggregator and the outer surfaces: report records, their composite
//! key, raw submissions and the monthly summary.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

/// `YYYY-MM` with ASCII digits only.
static MONTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}$").expect("month pattern is valid"));

/// A reporting month in `YYYY-MM` form.
///
/// Only the shape is checked (four ASCII digits, a dash, two ASCII digits).
/// The month number is not range-checked.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month(String);

impl Month {
    /// Parse a month string, returning `None` when it is not `YYYY-MM`.
    pub fn parse(value: &str) -> Option<Self> {
        if Self::is_well_formed(value) {
            Some(Self(value.to_string()))
        } else {
            None
        }
    }

    /// Returns true if `value` is four digits, a dash and two digits.
    pub fn is_well_formed(value: &str) -> bool {
        MONTH_RE.is_match(value)
    }

    /// The month containing `now`.
    pub fn containing(now: DateTime<Utc>) -> Self {
        Self(now.format("%Y-%m").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Month {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_well_formed(&value) {
            Ok(Self(value))
        } else {
            Err(format!("invalid month '{}', expected YYYY-MM", value))
        }
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.0
    }
}

/// Composite key identifying the single report an organization files per month.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportKey {
    pub ngo_id: String,
    pub month: Month,
}

impl ReportKey {
    pub fn new(ngo_id: impl Into<String>, month: Month) -> Self {
        Self {
            ngo_id: ngo_id.into(),
            month,
        }
    }
}

impl fmt::Display for ReportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ngo_id, self.month)
    }
}

/// Validated impact metrics for one report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportMetrics {
    pub people_helped: u64,
    pub events_conducted: u64,
    pub funds_utilized: f64,
}

/// A stored monthly report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// System-generated identifier, stable across updates.
    pub id: String,
    /// Organization that filed the report.
    pub ngo_id: String,
    /// Reporting month.
    pub month: Month,
    /// Number of people helped during the month.
    pub people_helped: u64,
    /// Number of events conducted during the month.
    pub events_conducted: u64,
    /// Funds utilized during the month.
    pub funds_utilized: f64,
    /// When the report was first submitted.
    pub created_at: DateTime<Utc>,
    /// When the metrics were last written.
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Creates a fresh report with a new identifier.
    pub fn new(key: ReportKey, metrics: ReportMetrics, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ngo_id: key.ngo_id,
            month: key.month,
            people_helped: metrics.people_helped,
            events_conducted: metrics.events_conducted,
            funds_utilized: metrics.funds_utilized,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn key(&self) -> ReportKey {
        ReportKey::new(self.ngo_id.clone(), self.month.clone())
    }

    pub fn metrics(&self) -> ReportMetrics {
        ReportMetrics {
            people_helped: self.people_helped,
            events_conducted: self.events_conducted,
            funds_utilized: self.funds_utilized,
        }
    }

    /// Overwrite the metrics in place, keeping identity and creation time.
    pub fn apply(&mut self, metrics: ReportMetrics, now: DateTime<Utc>) {
        self.people_helped = metrics.people_helped;
        self.events_conducted = metrics.events_conducted;
        self.funds_utilized = metrics.funds_utilized;
        self.updated_at = now;
    }
}

/// A candidate report as received from a caller, before validation.
///
/// Fields are kept as raw JSON so that validation can report a wrongly
/// typed field alongside every other violation instead of failing the
/// whole body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSubmission {
    #[serde(default)]
    pub ngo_id: Option<Value>,
    #[serde(default)]
    pub month: Option<Value>,
    #[serde(default)]
    pub people_helped: Option<Value>,
    #[serde(default)]
    pub events_conducted: Option<Value>,
    #[serde(default)]
    pub funds_utilized: Option<Value>,
}

/// Result of a successful upsert.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    /// No report existed for the key; a new one was appended.
    Created(Report),
    /// The existing report for the key was overwritten.
    Updated(Report),
}

impl UpsertOutcome {
    pub fn report(&self) -> &Report {
        match self {
            UpsertOutcome::Created(report) | UpsertOutcome::Updated(report) => report,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, UpsertOutcome::Created(_))
    }

    /// Lowercase label used in logs and API responses.
    pub fn label(&self) -> &'static str {
        match self {
            UpsertOutcome::Created(_) => "created",
            UpsertOutcome::Updated(_) => "updated",
        }
    }
}

/// Totals across all organizations for one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// Number of distinct organizations that reported.
    pub organization_count: usize,
    pub total_people_helped: u64,
    pub total_events_conducted: u64,
    pub total_funds_utilized: f64,
}

impl MonthlySummary {
    /// True when no report contributed to the summary.
    pub fn is_empty(&self) -> bool {
        self.organization_count == 0
    }
}

/// One organization's totals within a month, used for dashboard breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationTotals {
    pub ngo_id: String,
    pub people_helped: u64,
    pub events_conducted: u64,
    pub funds_utilized: f64,
}

/// Metadata about a rendered dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetadata {
    /// Month the dashboard aggregates.
    pub month: Month,
    /// When the dashboard was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of reports that matched the month.
    pub reports_considered: usize,
    /// Months that have data, for pointing callers at a populated month.
    pub months_with_data: Vec<Month>,
}

/// The complete monthly dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub metadata: DashboardMetadata,
    pub summary: MonthlySummary,
    /// Per-organization rows, sorted by organization identifier.
    pub organizations: Vec<OrganizationTotals>,
}
