//! Report generation.
//!
//! Renders computed analytics as Markdown tables or pretty JSON.

pub mod generator;

pub use generator::*;
