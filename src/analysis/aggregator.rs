//! Report aggregation and statistics.
//!
//! This module computes the monthly totals shown on the dashboard. None of
//! these functions mutate the reports they read.

use crate::error::TotalsOverflow;
use crate::models::{Month, MonthlySummary, OrganizationTotals, Report};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Reports whose month equals `month` exactly.
pub fn filter_by_month<'a>(
    reports: &'a [Report],
    month: &'a Month,
) -> impl Iterator<Item = &'a Report> + 'a {
    reports.iter().filter(move |r| &r.month == month)
}

/// Running metric sums that refuse to wrap.
#[derive(Debug, Default)]
struct Totals {
    people_helped: u64,
    events_conducted: u64,
    funds_utilized: f64,
}

impl Totals {
    /// Add one report, failing instead of wrapping or reaching infinity.
    fn add(&mut self, report: &Report) -> Result<(), TotalsOverflow> {
        let overflow = || TotalsOverflow {
            report_id: report.id.clone(),
        };
        let people = self
            .people_helped
            .checked_add(report.people_helped)
            .ok_or_else(overflow)?;
        let events = self
            .events_conducted
            .checked_add(report.events_conducted)
            .ok_or_else(overflow)?;
        let funds = self.funds_utilized + report.funds_utilized;
        if !funds.is_finite() {
            return Err(overflow());
        }

        self.people_helped = people;
        self.events_conducted = events;
        self.funds_utilized = funds;
        Ok(())
    }
}

/// Distinct organization count and metric sums over `reports`.
///
/// An empty input yields an all-zero summary.
pub fn summarize<'a, I>(reports: I) -> Result<MonthlySummary, TotalsOverflow>
where
    I: IntoIterator<Item = &'a Report>,
{
    let mut organizations: HashSet<&str> = HashSet::new();
    let mut totals = Totals::default();

    for report in reports {
        organizations.insert(report.ngo_id.as_str());
        totals.add(report)?;
    }

    Ok(MonthlySummary {
        organization_count: organizations.len(),
        total_people_helped: totals.people_helped,
        total_events_conducted: totals.events_conducted,
        total_funds_utilized: totals.funds_utilized,
    })
}

/// Per-organization totals, sorted by organization identifier.
pub fn organization_breakdown<'a, I>(reports: I) -> Result<Vec<OrganizationTotals>, TotalsOverflow>
where
    I: IntoIterator<Item = &'a Report>,
{
    let mut grouped: BTreeMap<&str, Totals> = BTreeMap::new();

    for report in reports {
        grouped
            .entry(report.ngo_id.as_str())
            .or_default()
            .add(report)?;
    }

    Ok(grouped
        .into_iter()
        .map(|(ngo_id, totals)| OrganizationTotals {
            ngo_id: ngo_id.to_string(),
            people_helped: totals.people_helped,
            events_conducted: totals.events_conducted,
            funds_utilized: totals.funds_utilized,
        })
        .collect())
}

/// Distinct months that have at least one report, ascending.
pub fn months_present(reports: &[Report]) -> Vec<Month> {
    reports
        .iter()
        .map(|r| r.month.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
