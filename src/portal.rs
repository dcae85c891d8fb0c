//! The reporting portal service.
//!
//! `ReportPortal` owns a [`ReportStore`] and exposes the two operations the
//! outer surfaces use: submitting a monthly report and summarizing a month.

use crate::analysis::{months_present, organization_breakdown, summarize};
use crate::error::PortalError;
use crate::models::{
    Dashboard, DashboardMetadata, Month, MonthlySummary, Report, ReportKey, ReportSubmission,
    UpsertOutcome,
};
use crate::store::ReportStore;
use crate::validation::{parse_month_query, validate_submission};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

pub struct ReportPortal<S> {
    store: S,
}

impl<S: ReportStore> ReportPortal<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and upsert a submission, stamped with the current time.
    pub fn submit(&mut self, submission: &ReportSubmission) -> Result<UpsertOutcome, PortalError> {
        self.submit_at(submission, Utc::now())
    }

    /// Validate and upsert a submission, stamped with `now`.
    ///
    /// On validation failure the store is left untouched and every
    /// violation is returned.
    pub fn submit_at(
        &mut self,
        submission: &ReportSubmission,
        now: DateTime<Utc>,
    ) -> Result<UpsertOutcome, PortalError> {
        let (key, metrics) = validate_submission(submission).map_err(|errors| {
            warn!("Rejected report submission: {}", errors);
            PortalError::Validation(errors)
        })?;

        let outcome = self.store.upsert(key, metrics, now)?;
        let report = outcome.report();
        info!(
            ngo_id = %report.ngo_id,
            month = %report.month,
            "Report {} ({})",
            outcome.label(),
            report.id
        );

        Ok(outcome)
    }

    /// The stored report for `key`, if any.
    pub fn report(&self, key: &ReportKey) -> Result<Option<Report>, PortalError> {
        Ok(self.store.get(key)?)
    }

    /// Aggregate totals for a `YYYY-MM` month string.
    pub fn monthly_summary(&self, month: &str) -> Result<MonthlySummary, PortalError> {
        let month = parse_month_query(month).map_err(|e| {
            warn!("Rejected dashboard query: {}", e);
            e
        })?;
        self.summary_for(&month)
    }

    /// Aggregate totals for an already validated month.
    pub fn summary_for(&self, month: &Month) -> Result<MonthlySummary, PortalError> {
        let reports = self.store.reports_for_month(month)?;
        let summary = summarize(&reports)?;
        debug!(
            "Summarized {} reports for {}: {} organizations",
            reports.len(),
            month,
            summary.organization_count
        );
        Ok(summary)
    }

    /// Months that have at least one report, ascending.
    pub fn months_with_data(&self) -> Result<Vec<Month>, PortalError> {
        Ok(months_present(&self.store.all()?))
    }

    /// Assemble the full dashboard for a month.
    pub fn dashboard(&self, month: &Month, now: DateTime<Utc>) -> Result<Dashboard, PortalError> {
        let reports = self.store.reports_for_month(month)?;

        Ok(Dashboard {
            metadata: DashboardMetadata {
                month: month.clone(),
                generated_at: now,
                reports_considered: reports.len(),
                months_with_data: self.months_with_data()?,
            },
            summary: summarize(&reports)?,
            organizations: organization_breakdown(&reports)?,
        })
    }
}
