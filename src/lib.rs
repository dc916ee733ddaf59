//! Employee records dashboard: per-column filtering, KPI aggregates,
//! chart-ready projections and descriptive statistics.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod state;

pub use data::filter::{apply_filter, distinct_values, FilterSelection, FilteredView};
pub use data::model::{Dataset, Record, Value};
pub use error::PipelineError;
