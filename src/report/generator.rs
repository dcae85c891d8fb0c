//! Dashboard report generation.
//!
//! This module renders a [`Dashboard`] as Markdown or JSON.

use crate::config::DashboardConfig;
use crate::models::{Dashboard, DashboardMetadata, MonthlySummary, OrganizationTotals};
use anyhow::Result;

/// Generate a complete Markdown dashboard.
pub fn generate_markdown_report(dashboard: &Dashboard, config: &DashboardConfig) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!(
        "# Impact Dashboard: {}\n\n",
        dashboard.metadata.month
    ));

    output.push_str(&generate_metadata_section(&dashboard.metadata));
    output.push_str(&generate_summary_section(
        &dashboard.summary,
        &config.currency_symbol,
    ));

    if dashboard.summary.is_empty() {
        output.push_str(&generate_no_data_section(&dashboard.metadata));
    } else if config.include_breakdown {
        output.push_str(&generate_breakdown_section(
            &dashboard.organizations,
            &config.currency_symbol,
        ));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &DashboardMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Month:** {}\n", metadata.month));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Reports Considered:** {}\n",
        metadata.reports_considered
    ));
    section.push('\n');

    section
}

/// Generate the totals table.
fn generate_summary_section(summary: &MonthlySummary, currency_symbol: &str) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Organizations | People Helped | Events Conducted | Funds Utilized |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        summary.organization_count,
        group_indian(summary.total_people_helped),
        group_indian(summary.total_events_conducted),
        format_currency(summary.total_funds_utilized, currency_symbol),
    ));

    section
}

/// Generate the per-organization table.
fn generate_breakdown_section(organizations: &[OrganizationTotals], currency_symbol: &str) -> String {
    let mut section = String::new();

    section.push_str("## By Organization\n\n");
    section.push_str("| Organization | People Helped | Events Conducted | Funds Utilized |\n");
    section.push_str("|:---|:---:|:---:|:---:|\n");

    for org in organizations {
        section.push_str(&format!(
            "| `{}` | {} | {} | {} |\n",
            org.ngo_id,
            group_indian(org.people_helped),
            group_indian(org.events_conducted),
            format_currency(org.funds_utilized, currency_symbol),
        ));
    }
    section.push('\n');

    section
}

/// Explain an empty month and point at months that do have data.
fn generate_no_data_section(metadata: &DashboardMetadata) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "No reports were submitted for {}.\n\n",
        metadata.month
    ));

    if !metadata.months_with_data.is_empty() {
        let months: Vec<String> = metadata
            .months_with_data
            .iter()
            .map(ToString::to_string)
            .collect();
        section.push_str(&format!("Months with data: {}\n\n", months.join(", ")));
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Generated by impactboard v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate a JSON dashboard.
pub fn generate_json_report(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).map_err(Into::into)
}

/// Format an amount as whole currency units with Indian digit grouping.
///
/// `150000.0` with `₹` becomes `₹1,50,000`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{}{}", sign, symbol, group_indian(rounded.abs() as u64))
}

/// Group digits the Indian way: last three, then pairs.
fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Month;
    use chrono::Utc;

    fn create_test_dashboard() -> Dashboard {
        Dashboard {
            metadata: DashboardMetadata {
                month: Month::parse("2023-10").unwrap(),
                generated_at: Utc::now(),
                reports_considered: 3,
                months_with_data: vec![
                    Month::parse("2023-10").unwrap(),
                    Month::parse("2023-11").unwrap(),
                ],
            },
            summary: MonthlySummary {
                organization_count: 3,
                total_people_helped: 745,
                total_events_conducted: 15,
                total_funds_utilized: 150000.0,
            },
            organizations: vec![
                OrganizationTotals {
                    ngo_id: "NGO001".to_string(),
                    people_helped: 250,
                    events_conducted: 5,
                    funds_utilized: 50000.0,
                },
                OrganizationTotals {
                    ngo_id: "NGO002".to_string(),
                    people_helped: 495,
                    events_conducted: 10,
                    funds_utilized: 100000.0,
                },
            ],
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let dashboard = create_test_dashboard();
        let markdown = generate_markdown_report(&dashboard, &DashboardConfig::default());

        assert!(markdown.contains("# Impact Dashboard: 2023-10"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Summary"));
        assert!(markdown.contains("| 3 | 745 | 15 | ₹1,50,000 |"));
        assert!(markdown.contains("## By Organization"));
        assert!(markdown.contains("`NGO002`"));
    }

    #[test]
    fn test_breakdown_can_be_disabled() {
        let dashboard = create_test_dashboard();
        let config = DashboardConfig {
            include_breakdown: false,
            ..DashboardConfig::default()
        };
        let markdown = generate_markdown_report(&dashboard, &config);
        assert!(!markdown.contains("## By Organization"));
    }

    #[test]
    fn test_empty_month_lists_months_with_data() {
        let mut dashboard = create_test_dashboard();
        dashboard.metadata.month = Month::parse("2024-01").unwrap();
        dashboard.metadata.reports_considered = 0;
        dashboard.summary = MonthlySummary::default();
        dashboard.organizations.clear();

        let markdown = generate_markdown_report(&dashboard, &DashboardConfig::default());
        assert!(markdown.contains("| 0 | 0 | 0 | ₹0 |"));
        assert!(markdown.contains("No reports were submitted for 2024-01."));
        assert!(markdown.contains("Months with data: 2023-10, 2023-11"));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0, "₹"), "₹0");
        assert_eq!(format_currency(999.4, "₹"), "₹999");
        assert_eq!(format_currency(1000.0, "₹"), "₹1,000");
        assert_eq!(format_currency(150000.0, "₹"), "₹1,50,000");
        assert_eq!(format_currency(12345678.9, "Rs."), "Rs.1,23,45,679");
        assert_eq!(format_currency(-2500.0, "₹"), "-₹2,500");
    }

    #[test]
    fn test_generate_json_report() {
        let dashboard = create_test_dashboard();
        let json = generate_json_report(&dashboard).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"organizationCount\": 3"));
        assert!(json.contains("\"organizations\""));
    }
}
