//! Dashboard snapshot loading.
//!
//! A snapshot is the JSON export of everything the admin analytics view
//! fetches: incidents, document requests, polls and, optionally, the
//! verification statistics.

use crate::models::DashboardSnapshot;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while reading a snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a snapshot from a JSON string.
pub fn parse_snapshot(content: &str) -> Result<DashboardSnapshot, serde_json::Error> {
    serde_json::from_str(content)
}

/// Read and parse a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<DashboardSnapshot, SnapshotError> {
    debug!("Reading snapshot from {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let snapshot = parse_snapshot(&content).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "Loaded snapshot: {} incidents, {} documents, {} polls{}",
        snapshot.incidents.len(),
        snapshot.documents.len(),
        snapshot.polls.len(),
        if snapshot.verification_stats.is_some() {
            ", verification stats"
        } else {
            ""
        }
    );

    Ok(snapshot)
}
