/// Filter-and-aggregate pipeline: everything derived from a filtered view.
///
/// ```text
///   FilteredView
///        │
///        ├──► aggregate   count + KPI means (None when empty)
///        ├──► project     scatter points, grouped series, value counts
///        └──► describe    per numeric column statistics
/// ```
///
/// Every function is pure; only column lookups can fail.

pub mod aggregate;
pub mod describe;
pub mod project;

pub use aggregate::{compute_aggregates, mean, AggregateSummary, KpiColumns};
pub use describe::{describe, ColumnSummary, Description};
pub use project::{
    project_grouped, project_scatter, value_counts, GroupedSeries, ScatterPoint,
    ScatterProjection,
};
