//! Assembly of the full analytics view.

use super::aggregator::{
    aggregate_labelled, build_priority_status_scatter, summarize_poll_participation,
    summarize_verification,
};
use super::labels::LabelPolicy;
use super::trend::build_seven_day_trend;
use crate::models::{
    DashboardAnalytics, DashboardOverview, DashboardSnapshot, DEFAULT_PRIORITY, DEFAULT_STATUS,
    DEFAULT_TYPE,
};
use chrono::{DateTime, TimeZone};
use tracing::debug;

/// Run every aggregation over a snapshot, using the admin dashboard's
/// default and label policy for each field.
pub fn build_dashboard_analytics<Tz: TimeZone>(
    snapshot: &DashboardSnapshot,
    now: &DateTime<Tz>,
) -> DashboardAnalytics {
    let incidents = snapshot.incidents.as_slice();
    let documents = snapshot.documents.as_slice();

    debug!(
        "Aggregating {} incidents, {} documents, {} polls",
        incidents.len(),
        documents.len(),
        snapshot.polls.len()
    );

    let activity_trend = build_seven_day_trend(incidents, documents, now);
    debug!(
        "Trend window {} .. {}",
        activity_trend.first().map(|p| p.date.to_string()).unwrap_or_default(),
        activity_trend.last().map(|p| p.date.to_string()).unwrap_or_default()
    );

    DashboardAnalytics {
        overview: DashboardOverview::from_records(incidents, documents, &snapshot.polls),
        incidents_by_type: aggregate_labelled(
            incidents,
            |i| i.kind.as_deref(),
            DEFAULT_TYPE,
            LabelPolicy::HyphenTitleCase,
        ),
        incidents_by_priority: aggregate_labelled(
            incidents,
            |i| i.priority.as_deref(),
            DEFAULT_PRIORITY,
            LabelPolicy::PriorityVocabulary,
        ),
        incidents_by_status: aggregate_labelled(
            incidents,
            |i| i.status.as_deref(),
            DEFAULT_STATUS,
            LabelPolicy::UnderscoreStatus,
        ),
        documents_by_type: aggregate_labelled(
            documents,
            |d| d.document_type.as_deref(),
            DEFAULT_TYPE,
            LabelPolicy::Passthrough,
        ),
        documents_by_status: aggregate_labelled(
            documents,
            |d| d.status.as_deref(),
            DEFAULT_STATUS,
            LabelPolicy::CapitalizeFirst,
        ),
        activity_trend,
        priority_status_scatter: build_priority_status_scatter(incidents),
        poll_participation: summarize_poll_participation(&snapshot.polls),
        verification: snapshot.verification_stats.as_ref().map(summarize_verification),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryCount, DocumentRequest, Incident, Poll, VerificationStats};
    use chrono::Utc;

    fn create_test_snapshot() -> DashboardSnapshot {
        DashboardSnapshot {
            incidents: vec![
                Incident {
                    kind: Some("public-safety".to_string()),
                    priority: Some("high".to_string()),
                    status: Some("in_progress".to_string()),
                    created_at: Some("2024-01-08T14:00:00Z".to_string()),
                },
                Incident::default(),
            ],
            documents: vec![DocumentRequest {
                document_type: Some("barangay_clearance".to_string()),
                status: Some("approved".to_string()),
                created_at: Some("2024-01-10T01:00:00Z".to_string()),
            }],
            polls: vec![Poll {
                title: Some("Basketball court renovation".to_string()),
                ..Poll::default()
            }],
            verification_stats: Some(VerificationStats {
                total_users: 4,
                verified_users: 1,
                active_users: 2,
            }),
        }
    }

    fn count(label: &str, value: usize) -> CategoryCount {
        CategoryCount {
            label: label.to_string(),
            value,
        }
    }

    #[test]
    fn test_field_policies_and_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let analytics = build_dashboard_analytics(&create_test_snapshot(), &now);

        assert_eq!(
            analytics.incidents_by_type,
            vec![count("Public Safety", 1), count("Other", 1)]
        );
        assert_eq!(
            analytics.incidents_by_priority,
            vec![count("High", 1), count("Medium", 1)]
        );
        assert_eq!(
            analytics.incidents_by_status,
            vec![count("In progress", 1), count("Pending", 1)]
        );
        assert_eq!(analytics.documents_by_type, vec![count("barangay_clearance", 1)]);
        assert_eq!(analytics.documents_by_status, vec![count("Approved", 1)]);
    }

    #[test]
    fn test_bundles_every_series() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let analytics = build_dashboard_analytics(&create_test_snapshot(), &now);

        assert_eq!(analytics.activity_trend.len(), 7);
        assert_eq!(analytics.activity_trend[4].incident_count, 1);
        assert_eq!(analytics.activity_trend[6].document_count, 1);
        assert_eq!(analytics.priority_status_scatter.len(), 2);
        assert_eq!(analytics.poll_participation[0].label, "Basketball court ren...");
        assert_eq!(analytics.overview.pending_incidents, 1);
        assert_eq!(analytics.verification.map(|v| v.unverified_users), Some(3));
    }

    #[test]
    fn test_empty_snapshot() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let analytics = build_dashboard_analytics(&DashboardSnapshot::default(), &now);

        assert!(analytics.incidents_by_type.is_empty());
        assert!(analytics.documents_by_status.is_empty());
        assert_eq!(analytics.activity_trend.len(), 7);
        assert!(analytics.verification.is_none());
        assert_eq!(analytics.overview.resolution_rate, 0.0);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let snapshot = create_test_snapshot();
        assert_eq!(
            build_dashboard_analytics(&snapshot, &now),
            build_dashboard_analytics(&snapshot, &now)
        );
    }
}
