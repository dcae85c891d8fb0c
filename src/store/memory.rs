//! Process-local report store.
//!
//! Reports live in an insertion-ordered `Vec`; a `HashMap` from the
//! composite key to the vector position makes the key lookup O(1) and is
//! the only place the one-report-per-key invariant is enforced.

use super::ReportStore;
use crate::analysis::filter_by_month;
use crate::error::StoreError;
use crate::models::{Month, Report, ReportKey, ReportMetrics, UpsertOutcome};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// In-memory store with no durability.
#[derive(Debug, Default)]
pub struct InMemoryReportStore {
    reports: Vec<Report>,
    index: HashMap<ReportKey, usize>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing records, keeping their ids and timestamps.
    ///
    /// Fails if two records share an organization and month.
    pub fn with_reports(reports: Vec<Report>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for report in reports {
            store.insert_existing(report)?;
        }
        Ok(store)
    }

    /// Append a fully formed record without touching its identity.
    pub fn insert_existing(&mut self, report: Report) -> Result<(), StoreError> {
        let key = report.key();
        if self.index.contains_key(&key) {
            return Err(StoreError::DuplicateKey(key.to_string()));
        }
        self.index.insert(key, self.reports.len());
        self.reports.push(report);
        Ok(())
    }
}

impl ReportStore for InMemoryReportStore {
    fn upsert(
        &mut self,
        key: ReportKey,
        metrics: ReportMetrics,
        now: DateTime<Utc>,
    ) -> Result<UpsertOutcome, StoreError> {
        if let Some(&position) = self.index.get(&key) {
            let report = &mut self.reports[position];
            report.apply(metrics, now);
            debug!("Overwrote report {} for {}", report.id, key);
            return Ok(UpsertOutcome::Updated(report.clone()));
        }

        let report = Report::new(key.clone(), metrics, now);
        debug!("Appended report {} for {}", report.id, key);
        self.index.insert(key, self.reports.len());
        self.reports.push(report.clone());
        Ok(UpsertOutcome::Created(report))
    }

    fn get(&self, key: &ReportKey) -> Result<Option<Report>, StoreError> {
        Ok(self.index.get(key).map(|&i| self.reports[i].clone()))
    }

    fn reports_for_month(&self, month: &Month) -> Result<Vec<Report>, StoreError> {
        Ok(filter_by_month(&self.reports, month).cloned().collect())
    }

    fn all(&self) -> Result<Vec<Report>, StoreError> {
        Ok(self.reports.clone())
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.reports.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn month(s: &str) -> Month {
        Month::parse(s).unwrap()
    }

    fn metrics(people: u64, events: u64, funds: f64) -> ReportMetrics {
        ReportMetrics {
            people_helped: people,
            events_conducted: events,
            funds_utilized: funds,
        }
    }

    #[test]
    fn test_upsert_creates_new_record() {
        let mut store = InMemoryReportStore::new();
        let now = Utc::now();
        let key = ReportKey::new("NGO001", month("2023-10"));

        let outcome = store.upsert(key.clone(), metrics(250, 5, 50000.0), now).unwrap();

        assert!(outcome.is_created());
        assert_eq!(store.len().unwrap(), 1);
        let stored = store.get(&key).unwrap().unwrap();
        assert_eq!(stored.metrics(), metrics(250, 5, 50000.0));
        assert_eq!(stored.created_at, now);
        assert_eq!(stored.updated_at, now);
        assert_eq!(&stored, outcome.report());
    }

    #[test]
    fn test_upsert_overwrites_existing_record() {
        let mut store = InMemoryReportStore::new();
        let first = Utc.with_ymd_and_hms(2023, 10, 30, 10, 0, 0).unwrap();
        let second = first + Duration::hours(5);
        let key = ReportKey::new("NGO001", month("2023-10"));

        let created = store.upsert(key.clone(), metrics(250, 5, 50000.0), first).unwrap();
        let updated = store.upsert(key.clone(), metrics(300, 6, 60000.0), second).unwrap();

        assert!(!updated.is_created());
        assert_eq!(store.len().unwrap(), 1);
        let stored = store.get(&key).unwrap().unwrap();
        assert_eq!(stored.id, created.report().id);
        assert_eq!(stored.created_at, first);
        assert_eq!(stored.updated_at, second);
        assert_eq!(stored.metrics(), metrics(300, 6, 60000.0));
    }

    #[test]
    fn test_same_org_different_months_are_distinct() {
        let mut store = InMemoryReportStore::new();
        let now = Utc::now();

        store
            .upsert(ReportKey::new("NGO001", month("2023-10")), metrics(1, 1, 1.0), now)
            .unwrap();
        let outcome = store
            .upsert(ReportKey::new("NGO001", month("2023-11")), metrics(2, 2, 2.0), now)
            .unwrap();

        assert!(outcome.is_created());
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut store = InMemoryReportStore::new();
        let now = Utc::now();
        let a = store
            .upsert(ReportKey::new("A", month("2024-01")), metrics(1, 1, 1.0), now)
            .unwrap();
        let b = store
            .upsert(ReportKey::new("B", month("2024-01")), metrics(1, 1, 1.0), now)
            .unwrap();
        assert_ne!(a.report().id, b.report().id);
    }

    #[test]
    fn test_reports_for_month_preserves_insertion_order() {
        let mut store = InMemoryReportStore::new();
        let now = Utc::now();
        for (ngo, m) in [("C", "2023-10"), ("A", "2023-11"), ("B", "2023-10")] {
            store
                .upsert(ReportKey::new(ngo, month(m)), metrics(1, 1, 1.0), now)
                .unwrap();
        }

        let october: Vec<String> = store
            .reports_for_month(&month("2023-10"))
            .unwrap()
            .into_iter()
            .map(|r| r.ngo_id)
            .collect();
        assert_eq!(october, vec!["C", "B"]);
        assert!(store.reports_for_month(&month("2023-12")).unwrap().is_empty());
    }

    #[test]
    fn test_with_reports_rejects_duplicate_keys() {
        let now = Utc::now();
        let key = ReportKey::new("NGO001", month("2023-10"));
        let a = Report::new(key.clone(), metrics(1, 1, 1.0), now);
        let b = Report::new(key, metrics(2, 2, 2.0), now);

        let result = InMemoryReportStore::with_reports(vec![a, b]);
        assert!(matches!(result, Err(StoreError::DuplicateKey(k)) if k == "NGO001/2023-10"));
    }

    #[test]
    fn test_with_reports_keeps_identity() {
        let now = Utc.with_ymd_and_hms(2023, 10, 30, 10, 0, 0).unwrap();
        let mut report = Report::new(
            ReportKey::new("NGO001", month("2023-10")),
            metrics(250, 5, 50000.0),
            now,
        );
        report.id = "1".to_string();

        let mut store = InMemoryReportStore::with_reports(vec![report]).unwrap();
        let later = now + Duration::days(1);
        let outcome = store
            .upsert(
                ReportKey::new("NGO001", month("2023-10")),
                metrics(300, 6, 60000.0),
                later,
            )
            .unwrap();

        assert_eq!(outcome.report().id, "1");
        assert_eq!(outcome.report().created_at, now);
    }
}
