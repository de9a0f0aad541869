//! Markdown and JSON report generation.
//!
//! The Markdown report renders every chart series as a table so the
//! analytics can be read without the dashboard's chart layer.

use crate::config::ReportConfig;
use crate::models::{
    AnalyticsReport, CategoryCount, DashboardOverview, PollParticipation, ReportMetadata,
    ScatterPoint, TrendPoint, VerificationSummary,
};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &AnalyticsReport, options: &ReportConfig) -> String {
    let analytics = &report.analytics;
    let mut output = String::new();

    output.push_str("# Barangay Analytics Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_overview_section(&analytics.overview));

    output.push_str("## Incidents\n\n");
    output.push_str(&generate_category_table("By Type", "Type", &analytics.incidents_by_type));
    output.push_str(&generate_category_table(
        "By Priority",
        "Priority",
        &analytics.incidents_by_priority,
    ));
    output.push_str(&generate_category_table(
        "By Status",
        "Status",
        &analytics.incidents_by_status,
    ));

    output.push_str("## Document Requests\n\n");
    output.push_str(&generate_category_table("By Type", "Document", &analytics.documents_by_type));
    output.push_str(&generate_category_table(
        "By Status",
        "Status",
        &analytics.documents_by_status,
    ));

    output.push_str(&generate_trend_section(&analytics.activity_trend));

    if options.include_scatter {
        output.push_str(&generate_scatter_section(
            &analytics.priority_status_scatter,
            options.max_scatter_rows,
        ));
    }

    if options.include_polls {
        output.push_str(&generate_polls_section(&analytics.poll_participation));
    }

    if options.include_verification {
        if let Some(ref verification) = analytics.verification {
            output.push_str(&generate_verification_section(verification));
        }
    }

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Data Source:** `{}`\n", metadata.data_source));
    section.push_str(&format!(
        "- **Reference Instant:** {}\n",
        metadata.reference_instant.format("%Y-%m-%d %H:%M:%S %:z")
    ));
    section.push_str(&format!("- **Time Zone:** {}\n", metadata.timezone));
    section.push_str(&format!(
        "- **Records:** {} incidents, {} document requests, {} polls\n",
        metadata.incident_count, metadata.document_count, metadata.poll_count
    ));
    section.push('\n');

    section
}

/// Generate the headline figures.
fn generate_overview_section(overview: &DashboardOverview) -> String {
    let mut section = String::new();

    section.push_str("## Overview\n\n");
    section.push_str("| Incidents | Pending | Resolved | Resolution Rate | Documents | Pending Docs | Polls | Poll Responses |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {:.1}% | {} | {} | {} | {} |\n\n",
        overview.total_incidents,
        overview.pending_incidents,
        overview.resolved_incidents,
        overview.resolution_rate,
        overview.total_documents,
        overview.pending_documents,
        overview.total_polls,
        overview.total_poll_responses
    ));

    section
}

/// Generate one category breakdown table.
fn generate_category_table(title: &str, column: &str, counts: &[CategoryCount]) -> String {
    let mut section = format!("### {}\n\n", title);

    if counts.is_empty() {
        section.push_str("No records.\n\n");
        return section;
    }

    section.push_str(&format!("| {} | Count |\n", column));
    section.push_str("|:---|:---:|\n");
    for count in counts {
        section.push_str(&format!("| {} | {} |\n", escape_cell(&count.label), count.value));
    }
    section.push('\n');

    section
}

/// Generate the seven-day activity table.
fn generate_trend_section(trend: &[TrendPoint]) -> String {
    let mut section = String::new();

    section.push_str("## Activity (Last 7 Days)\n\n");
    section.push_str("| Day | Date | Incidents | Documents |\n");
    section.push_str("|:---|:---|:---:|:---:|\n");
    for point in trend {
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            point.label, point.date, point.incident_count, point.document_count
        ));
    }
    section.push('\n');

    section
}

/// Generate the priority x status table, capped at `max_rows`.
fn generate_scatter_section(points: &[ScatterPoint], max_rows: usize) -> String {
    let mut section = String::new();

    section.push_str("## Priority vs Status\n\n");

    if points.is_empty() {
        section.push_str("No incidents.\n\n");
        return section;
    }

    section.push_str("| Incident | Priority Rank | Status Rank |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for point in points.iter().take(max_rows) {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            escape_cell(&point.label),
            point.priority_rank,
            point.status_rank
        ));
    }

    if points.len() > max_rows {
        section.push_str(&format!(
            "\n*{} more incidents not shown.*\n",
            points.len() - max_rows
        ));
    }
    section.push('\n');

    section
}

/// Generate the poll participation table.
fn generate_polls_section(polls: &[PollParticipation]) -> String {
    let mut section = String::new();

    section.push_str("## Poll Participation\n\n");

    if polls.is_empty() {
        section.push_str("No polls.\n\n");
        return section;
    }

    section.push_str("| Poll | Responses | Questions |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for poll in polls {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            escape_cell(&poll.label),
            poll.response_count,
            poll.question_count
        ));
    }
    section.push('\n');

    section
}

/// Generate the resident verification section.
fn generate_verification_section(verification: &VerificationSummary) -> String {
    let mut section = String::new();

    section.push_str("## Resident Verification\n\n");
    section.push_str(&format!("- **Total Users:** {}\n", verification.total_users));
    section.push_str(&format!(
        "- **Verified:** {} ({:.1}%)\n",
        verification.verified_users, verification.verification_rate
    ));
    section.push_str(&format!("- **Unverified:** {}\n", verification.unverified_users));
    section.push_str(&format!("- **Active:** {}\n\n", verification.active_users));

    section
}

/// Keep user-supplied labels from breaking the table layout.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Generate a JSON report.
pub fn generate_json_report(report: &AnalyticsReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::build_dashboard_analytics;
    use crate::models::{DashboardSnapshot, Incident, Poll, VerificationStats};
    use chrono::{DateTime, TimeZone, Utc};

    fn reference_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
    }

    fn create_test_report(incident_count: usize) -> AnalyticsReport {
        let snapshot = DashboardSnapshot {
            incidents: (0..incident_count)
                .map(|_| Incident {
                    kind: Some("road-damage".to_string()),
                    priority: Some("critical".to_string()),
                    status: Some("resolved".to_string()),
                    created_at: Some("2024-01-09T08:00:00Z".to_string()),
                })
                .collect(),
            documents: Vec::new(),
            polls: vec![Poll {
                title: Some("Fiesta | parade".to_string()),
                ..Poll::default()
            }],
            verification_stats: Some(VerificationStats {
                total_users: 8,
                verified_users: 6,
                active_users: 3,
            }),
        };
        let now = reference_instant();

        AnalyticsReport {
            metadata: ReportMetadata {
                data_source: "snapshot.json".to_string(),
                reference_instant: now.fixed_offset(),
                timezone: "utc".to_string(),
                incident_count,
                document_count: 0,
                poll_count: 1,
            },
            analytics: build_dashboard_analytics(&snapshot, &now),
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report(2);
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("# Barangay Analytics Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("| Road Damage | 2 |"));
        assert!(markdown.contains("| Critical | 2 |"));
        assert!(markdown.contains("| Jan 9 | 2024-01-09 | 2 | 0 |"));
        assert!(markdown.contains("## Priority vs Status"));
        assert!(markdown.contains("Fiesta \\| parade |"));
        assert!(markdown.contains("- **Verified:** 6 (75.0%)"));
    }

    #[test]
    fn test_empty_document_breakdown() {
        let report = create_test_report(0);
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("## Document Requests\n\n### By Type\n\nNo records."));
        assert!(markdown.contains("No incidents."));
    }

    #[test]
    fn test_report_options() {
        let report = create_test_report(30);
        let options = ReportConfig {
            max_scatter_rows: 10,
            include_polls: false,
            include_verification: false,
            ..ReportConfig::default()
        };

        let markdown = generate_markdown_report(&report, &options);
        assert!(markdown.contains("*20 more incidents not shown.*"));
        assert!(!markdown.contains("## Poll Participation"));
        assert!(!markdown.contains("## Resident Verification"));

        let without_scatter = ReportConfig {
            include_scatter: false,
            ..ReportConfig::default()
        };
        let markdown = generate_markdown_report(&report, &without_scatter);
        assert!(!markdown.contains("## Priority vs Status"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report(1);
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"data_source\""));
        assert!(json.contains("\"incidents_by_type\""));
        assert!(json.contains("\"activity_trend\""));
        assert!(json.contains("\"2024-01-09\""));
    }
}
