//! Category label formatting.
//!
//! Each chart axis formats its raw category tags with its own policy. The
//! policies intentionally differ per field and are not interchangeable.

use crate::models::Priority;

/// How a raw category tag is turned into a display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPolicy {
    /// `public-safety` -> `Public Safety` (incident type)
    HyphenTitleCase,
    /// `high` -> `High`, unknown tags capitalized (incident priority)
    PriorityVocabulary,
    /// `in_progress` -> `In progress` (incident status)
    UnderscoreStatus,
    /// `approved` -> `Approved` (document status)
    CapitalizeFirst,
    /// Label is the raw tag (document type)
    Passthrough,
}

/// Format a raw category tag under the given policy. Never fails.
pub fn format_category_label(raw: &str, policy: LabelPolicy) -> String {
    match policy {
        LabelPolicy::HyphenTitleCase => raw
            .split('-')
            .map(capitalize_first)
            .collect::<Vec<_>>()
            .join(" "),
        LabelPolicy::PriorityVocabulary => match Priority::from_raw(raw) {
            Some(priority) => priority.to_string(),
            None => capitalize_first(raw),
        },
        LabelPolicy::UnderscoreStatus => {
            // Only the first underscore after the leading character is replaced.
            let mut chars = raw.chars();
            match chars.next() {
                Some(first) => {
                    let mut label: String = first.to_uppercase().collect();
                    label.push_str(&chars.as_str().replacen('_', " ", 1));
                    label
                }
                None => String::new(),
            }
        }
        LabelPolicy::CapitalizeFirst => capitalize_first(raw),
        LabelPolicy::Passthrough => raw.to_string(),
    }
}

/// Uppercase the first character and keep the rest as-is.
pub fn capitalize_first(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
