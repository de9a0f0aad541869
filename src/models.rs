//! Data models for the dashboard analytics.
//!
//! Input records mirror the JSON the civic-services API hands to the admin
//! dashboard: every field is optional, and a field of the wrong JSON type
//! reads as absent so the aggregation code applies its default. Output
//! types are the plain, chart-ready structures the aggregator produces.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Default label for an incident without a priority.
pub const DEFAULT_PRIORITY: &str = "medium";

/// Default label for an incident or document request without a status.
pub const DEFAULT_STATUS: &str = "pending";

/// Default label for a record without a type.
pub const DEFAULT_TYPE: &str = "other";

/// Urgency of an incident report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Low priority - minor nuisances, cosmetic issues
    Low,
    /// Medium priority - the default for unclassified reports
    Medium,
    /// High priority - needs attention within the day
    High,
    /// Critical priority - threat to life or property
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Medium => write!(f, "Medium"),
            Priority::High => write!(f, "High"),
            Priority::Critical => write!(f, "Critical"),
        }
    }
}

impl Priority {
    /// Parses a raw priority tag. Matching is exact; `"HIGH"` is not `High`.
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "critical" => Some(Priority::Critical),
            _ => None,
        }
    }

    /// Ordinal used on the scatter plot's priority axis.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Critical => 4,
        }
    }
}

/// Resolution state of an incident report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IncidentStatus {
    Pending,
    InProgress,
    Resolved,
}

impl IncidentStatus {
    /// Parses a raw status tag.
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(IncidentStatus::Pending),
            "in_progress" => Some(IncidentStatus::InProgress),
            "resolved" => Some(IncidentStatus::Resolved),
            _ => None,
        }
    }

    /// Ordinal used on the scatter plot's status axis.
    pub fn rank(&self) -> u8 {
        match self {
            IncidentStatus::Pending => 1,
            IncidentStatus::InProgress => 2,
            IncidentStatus::Resolved => 3,
        }
    }
}

/// Keep a field only when it is a JSON string; anything else reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Keep a field only when it is a JSON array.
fn lenient_sequence<'de, D>(deserializer: D) -> Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items),
        _ => None,
    })
}

/// Read a non-negative integer count; anything else reads as zero.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_u64().unwrap_or(0))
}

/// A resident-filed report of a community issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Category tag, e.g. `public-safety`.
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    /// Raw priority tag.
    #[serde(default, deserialize_with = "lenient_string")]
    pub priority: Option<String>,
    /// Raw status tag.
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    /// Creation timestamp as sent by the API.
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
}

/// A resident's request for an official record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    /// Requested document, e.g. `barangay_clearance`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub document_type: Option<String>,
    /// Raw approval status tag.
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    /// Creation timestamp as sent by the API.
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
}

/// A multi-question survey open to residents.
///
/// Only the lengths of `responses` and `questions` are read, so their
/// elements are kept as untyped JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_sequence")]
    pub responses: Option<Vec<serde_json::Value>>,
    #[serde(default, deserialize_with = "lenient_sequence")]
    pub questions: Option<Vec<serde_json::Value>>,
}

/// Resident account statistics reported by the verification service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_users: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub verified_users: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub active_users: u64,
}

/// Everything the analytics view reads, as exported in one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    #[serde(default)]
    pub incidents: Vec<Incident>,
    #[serde(default)]
    pub documents: Vec<DocumentRequest>,
    #[serde(default)]
    pub polls: Vec<Poll>,
    #[serde(default)]
    pub verification_stats: Option<VerificationStats>,
}

/// Number of records falling into one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub value: usize,
}

/// Incident and document activity for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Day the counts belong to.
    pub date: NaiveDate,
    /// Short axis label such as `Jan 5`.
    pub label: String,
    pub incident_count: usize,
    pub document_count: usize,
}

/// One incident projected onto the priority x status plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub priority_rank: u8,
    pub status_rank: u8,
    pub label: String,
}

/// Participation figures for a single poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollParticipation {
    pub label: String,
    pub response_count: usize,
    pub question_count: usize,
}

/// Verified versus unverified resident accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total_users: u64,
    pub verified_users: u64,
    pub unverified_users: u64,
    pub active_users: u64,
    /// Percentage of verified accounts, one decimal place.
    pub verification_rate: f64,
    pub breakdown: Vec<CategoryCount>,
}

/// Headline figures shown above the charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub total_incidents: usize,
    pub pending_incidents: usize,
    pub resolved_incidents: usize,
    /// Percentage of resolved incidents, one decimal place.
    pub resolution_rate: f64,
    pub total_documents: usize,
    pub pending_documents: usize,
    pub total_polls: usize,
    pub total_poll_responses: usize,
}

impl DashboardOverview {
    /// Computes the headline figures from the raw collections.
    pub fn from_records(
        incidents: &[Incident],
        documents: &[DocumentRequest],
        polls: &[Poll],
    ) -> Self {
        let mut overview = Self {
            total_incidents: incidents.len(),
            total_documents: documents.len(),
            total_polls: polls.len(),
            ..Self::default()
        };

        for incident in incidents {
            match incident.status.as_deref().unwrap_or(DEFAULT_STATUS) {
                "pending" => overview.pending_incidents += 1,
                "resolved" => overview.resolved_incidents += 1,
                _ => {}
            }
        }

        overview.pending_documents = documents
            .iter()
            .filter(|d| d.status.as_deref().unwrap_or(DEFAULT_STATUS) == DEFAULT_STATUS)
            .count();

        overview.total_poll_responses = polls
            .iter()
            .map(|p| p.responses.as_ref().map_or(0, Vec::len))
            .sum();

        overview.resolution_rate =
            percentage(overview.resolved_incidents as f64, incidents.len() as f64);

        overview
    }
}

/// `part / whole` as a percentage rounded to one decimal; 0 when `whole` is 0.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        0.0
    } else {
        (part / whole * 1000.0).round() / 10.0
    }
}

/// Every chart series the admin analytics view renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardAnalytics {
    pub overview: DashboardOverview,
    pub incidents_by_type: Vec<CategoryCount>,
    pub incidents_by_priority: Vec<CategoryCount>,
    pub incidents_by_status: Vec<CategoryCount>,
    pub documents_by_type: Vec<CategoryCount>,
    pub documents_by_status: Vec<CategoryCount>,
    pub activity_trend: Vec<TrendPoint>,
    pub priority_status_scatter: Vec<ScatterPoint>,
    pub poll_participation: Vec<PollParticipation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationSummary>,
}

/// Metadata about an analytics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Snapshot file the analytics were computed from.
    pub data_source: String,
    /// Reference instant the trend window ends at.
    pub reference_instant: DateTime<FixedOffset>,
    /// Zone used for day bucketing.
    pub timezone: String,
    /// Number of incidents in the snapshot.
    pub incident_count: usize,
    /// Number of document requests in the snapshot.
    pub document_count: usize,
    /// Number of polls in the snapshot.
    pub poll_count: usize,
}

/// The complete analytics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub metadata: ReportMetadata,
    pub analytics: DashboardAnalytics,
}
