//! Renderings of the store's read interface for the `report` command.
//!
//! # Submodules
//!
//! - [`json`]: The `{findings, stats, lastUpdated}` payload a dashboard consumes
//! - [`markdown`]: A triage digest grouped by region

pub mod json;
pub mod markdown;
