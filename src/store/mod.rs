//! Report storage.
//!
//! The portal talks to storage only through [`ReportStore`], so the upsert
//! and aggregation logic stay independent of the backend.

pub mod memory;

pub use memory::InMemoryReportStore;

use crate::error::StoreError;
use crate::models::{Month, Report, ReportKey, ReportMetrics, UpsertOutcome};
use chrono::{DateTime, Utc};

/// Storage backend for monthly reports.
///
/// Implementations must enforce at most one report per [`ReportKey`] and
/// perform `upsert` as a single atomic lookup-and-write.
pub trait ReportStore {
    /// Insert a report for `key` or overwrite the metrics of the existing one.
    fn upsert(
        &mut self,
        key: ReportKey,
        metrics: ReportMetrics,
        now: DateTime<Utc>,
    ) -> Result<UpsertOutcome, StoreError>;

    /// Look up the report for `key`.
    fn get(&self, key: &ReportKey) -> Result<Option<Report>, StoreError>;

    /// All reports filed for exactly `month`, in insertion order.
    fn reports_for_month(&self, month: &Month) -> Result<Vec<Report>, StoreError>;

    /// Every stored report, in insertion order.
    fn all(&self) -> Result<Vec<Report>, StoreError>;

    /// Number of stored reports.
    fn len(&self) -> Result<usize, StoreError>;
}

impl<S: ReportStore + ?Sized> ReportStore for Box<S> {
    fn upsert(
        &mut self,
        key: ReportKey,
        metrics: ReportMetrics,
        now: DateTime<Utc>,
    ) -> Result<UpsertOutcome, StoreError> {
        (**self).upsert(key, metrics, now)
    }

    fn get(&self, key: &ReportKey) -> Result<Option<Report>, StoreError> {
        (**self).get(key)
    }

    fn reports_for_month(&self, month: &Month) -> Result<Vec<Report>, StoreError> {
        (**self).reports_for_month(month)
    }

    fn all(&self) -> Result<Vec<Report>, StoreError> {
        (**self).all()
    }

    fn len(&self) -> Result<usize, StoreError> {
        (**self).len()
    }
}

/// Type-erased store shared by the HTTP server.
pub type DynReportStore = Box<dyn ReportStore + Send>;
