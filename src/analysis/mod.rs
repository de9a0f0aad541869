//! Analytics modules.
//!
//! Pure transformations from raw dashboard records into chart series. Nothing
//! here reads the clock or touches the filesystem.

pub mod aggregator;
pub mod dashboard;
pub mod labels;
pub mod trend;

pub use dashboard::build_dashboard_analytics;
