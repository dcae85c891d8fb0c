//! Initial store contents.
//!
//! The store starts either empty, from the bundled sample reports, or from a
//! JSON array of reports in the same camelCase shape the API returns.

use crate::config::StoreConfig;
use crate::models::{Report, ReportSubmission};
use crate::store::InMemoryReportStore;
use crate::validation::validate_submission;
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

const SAMPLE_REPORTS: &str = include_str!("../fixtures/sample_reports.json");

/// The bundled sample reports.
pub fn sample_reports() -> Result<Vec<Report>> {
    parse_reports(SAMPLE_REPORTS).context("Failed to parse bundled sample reports")
}

/// Load reports from a JSON file.
pub fn load_reports(path: &Path) -> Result<Vec<Report>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;

    parse_reports(&content).with_context(|| format!("Failed to parse seed file: {}", path.display()))
}

/// Parse and validate a JSON array of reports.
fn parse_reports(content: &str) -> Result<Vec<Report>> {
    let reports: Vec<Report> = serde_json::from_str(content)?;

    for report in &reports {
        if let Err(errors) = validate_submission(&ReportSubmission::from(report)) {
            bail!("Invalid seed report {} ({}): {}", report.id, report.key(), errors);
        }
    }

    Ok(reports)
}

/// Build the in-memory store described by `config`.
///
/// An explicit seed file wins over the bundled sample data.
pub fn build_store(config: &StoreConfig) -> Result<InMemoryReportStore> {
    let reports = if let Some(ref seed_file) = config.seed_file {
        info!("Seeding report store from: {}", seed_file.display());
        load_reports(seed_file)?
    } else if config.sample_data {
        debug!("Seeding report store with bundled sample reports");
        sample_reports()?
    } else {
        debug!("Starting with an empty report store");
        Vec::new()
    };

    let count = reports.len();
    let store = InMemoryReportStore::with_reports(reports).context("Failed to seed report store")?;
    info!("Report store ready with {} reports", count);
    Ok(store)
}

impl From<&Report> for ReportSubmission {
    fn from(report: &Report) -> Self {
        let metrics = report.metrics();
        Self {
            ngo_id: Some(Value::from(report.ngo_id.as_str())),
            month: Some(Value::from(report.month.as_str())),
            people_helped: Some(Value::from(metrics.people_helped)),
            events_conducted: Some(Value::from(metrics.events_conducted)),
            funds_utilized: Some(Value::from(metrics.funds_utilized)),
        }
    }
}
