//! Category aggregation and per-record projections.
//!
//! This module provides the grouping primitive behind every breakdown chart,
//! along with the scatter, poll and verification summaries.

use super::labels::{format_category_label, LabelPolicy};
use crate::models::{
    percentage, CategoryCount, Incident, IncidentStatus, Poll, PollParticipation, Priority,
    ScatterPoint, VerificationStats, VerificationSummary,
};
use std::collections::HashMap;

/// Poll titles longer than this are cut and given an ellipsis.
pub const POLL_LABEL_MAX_CHARS: usize = 20;

/// Scatter label for an incident without a type.
pub const DEFAULT_SCATTER_LABEL: &str = "incident";

/// Group records by a category field and count each distinct value.
///
/// Records where `field` yields `None` are counted under `default`. Entries
/// come back in order of first occurrence, labelled with the raw value.
pub fn aggregate_by_field<T, F>(records: &[T], field: F, default: &str) -> Vec<CategoryCount>
where
    F: Fn(&T) -> Option<&str>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for record in records {
        let value = field(record).unwrap_or(default);

        match index.get(value) {
            Some(&i) => counts[i].value += 1,
            None => {
                index.insert(value, counts.len());
                counts.push(CategoryCount {
                    label: value.to_string(),
                    value: 1,
                });
            }
        }
    }

    counts
}

/// Aggregate by a field and format each label with `policy`.
///
/// Grouping happens on the raw value, so two raw tags that format to the same
/// label stay separate entries.
pub fn aggregate_labelled<T, F>(
    records: &[T],
    field: F,
    default: &str,
    policy: LabelPolicy,
) -> Vec<CategoryCount>
where
    F: Fn(&T) -> Option<&str>,
{
    aggregate_by_field(records, field, default)
        .into_iter()
        .map(|count| CategoryCount {
            label: format_category_label(&count.label, policy),
            value: count.value,
        })
        .collect()
}

/// Scatter-axis rank for a raw priority tag (unknown or absent -> medium).
pub fn priority_rank(raw: Option<&str>) -> u8 {
    raw.and_then(Priority::from_raw)
        .unwrap_or(Priority::Medium)
        .rank()
}

/// Scatter-axis rank for a raw status tag (unknown or absent -> pending).
pub fn status_rank(raw: Option<&str>) -> u8 {
    raw.and_then(IncidentStatus::from_raw)
        .unwrap_or(IncidentStatus::Pending)
        .rank()
}

/// Project every incident onto the priority x status plane, in input order.
pub fn build_priority_status_scatter(incidents: &[Incident]) -> Vec<ScatterPoint> {
    incidents
        .iter()
        .map(|incident| ScatterPoint {
            priority_rank: priority_rank(incident.priority.as_deref()),
            status_rank: status_rank(incident.status.as_deref()),
            label: incident
                .kind
                .clone()
                .unwrap_or_else(|| DEFAULT_SCATTER_LABEL.to_string()),
        })
        .collect()
}

/// Shorten a poll title to its chart label.
pub fn poll_label(title: &str) -> String {
    if title.chars().count() > POLL_LABEL_MAX_CHARS {
        let prefix: String = title.chars().take(POLL_LABEL_MAX_CHARS).collect();
        format!("{}...", prefix)
    } else {
        title.to_string()
    }
}

/// Response and question counts for each poll, in input order.
pub fn summarize_poll_participation(polls: &[Poll]) -> Vec<PollParticipation> {
    polls
        .iter()
        .map(|poll| PollParticipation {
            label: poll_label(poll.title.as_deref().unwrap_or_default()),
            response_count: poll.responses.as_ref().map_or(0, Vec::len),
            question_count: poll.questions.as_ref().map_or(0, Vec::len),
        })
        .collect()
}

/// Summarize resident verification figures.
///
/// `verified_users > total_users` is tolerated: the unverified count
/// saturates at zero and the rate is reported as computed.
pub fn summarize_verification(stats: &VerificationStats) -> VerificationSummary {
    let unverified = stats.total_users.saturating_sub(stats.verified_users);

    VerificationSummary {
        total_users: stats.total_users,
        verified_users: stats.verified_users,
        unverified_users: unverified,
        active_users: stats.active_users,
        verification_rate: percentage(stats.verified_users as f64, stats.total_users as f64),
        breakdown: vec![
            CategoryCount {
                label: "Verified".to_string(),
                value: stats.verified_users as usize,
            },
            CategoryCount {
                label: "Unverified".to_string(),
                value: unverified as usize,
            },
        ],
    }
}
