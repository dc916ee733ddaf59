use std::collections::BTreeSet;

use crate::config::{DashboardConfig, ScatterSpec};
use crate::data::filter::{select_all_values, FilterSelection, FilteredView};
use crate::data::model::{Dataset, Value};
use crate::error::{PipelineError, Result};
use crate::pipeline::{
    compute_aggregates, describe, project_grouped, project_scatter, value_counts,
    AggregateSummary, Description, GroupedSeries, ScatterProjection,
};

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// The dashboard state, independent of rendering.
#[derive(Debug, Default)]
pub struct Dashboard {
    /// Loaded dataset (None until one is set).
    pub dataset: Option<Dataset>,

    pub config: DashboardConfig,

    /// Per-column filter selections.
    pub filters: FilterSelection,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,
}

/// Everything derived from the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub summary: AggregateSummary,
    pub distribution: Vec<(Value, usize)>,
    pub salary_vs_performance: ScatterProjection,
    pub experience_vs_salary: ScatterProjection,
    pub satisfaction_by_group: GroupedSeries,
    pub description: Description,
    /// Indices of the visible records.
    pub visible: Vec<usize>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Ingest a newly loaded dataset and select every value of each filter
    /// column.
    ///
    /// A dataset without records is treated like no dataset at all: every
    /// output reports "no data" instead of failing the schema checks.
    pub fn set_dataset(&mut self, dataset: Dataset) -> Result<()> {
        if dataset.is_empty() {
            log::warn!("dataset has no records, showing no data");
            self.dataset = None;
            self.filters.clear();
            self.visible_indices.clear();
            return Ok(());
        }

        dataset.ensure_unique(&self.config.id_column)?;
        for col in &self.config.filter_columns {
            dataset.require_column(col)?;
        }

        self.filters = select_all_values(&dataset, &self.config.filter_columns);
        self.visible_indices = (0..dataset.len()).collect();
        log::info!(
            "dashboard showing {} records, filtering on {:?}",
            dataset.len(),
            self.config.filter_columns
        );
        self.dataset = Some(dataset);
        Ok(())
    }

    /// Recompute `visible_indices` after filter change.
    pub fn refilter(&mut self) -> Result<()> {
        if let Some(ds) = &self.dataset {
            let view = FilteredView::all(ds).filter(&self.filters)?;
            self.visible_indices = view.indices().to_vec();
            log::debug!("{} of {} records visible", self.visible_indices.len(), ds.len());
        }
        Ok(())
    }

    /// Replace the selection for one column.
    pub fn set_selection(&mut self, column: &str, values: BTreeSet<Value>) -> Result<()> {
        self.require_filter_column(column)?;
        self.filters.insert(column.to_string(), values);
        self.refilter()
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: &str, value: &Value) -> Result<()> {
        self.require_filter_column(column)?;
        let selected = self.filters.entry(column.to_string()).or_default();
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.refilter()
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: &str) -> Result<()> {
        self.require_filter_column(column)?;
        if let Some(all_vals) = self.dataset.as_ref().and_then(|ds| ds.unique_values(column)) {
            self.filters.insert(column.to_string(), all_vals.clone());
        }
        self.refilter()
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: &str) -> Result<()> {
        self.set_selection(column, BTreeSet::new())
    }

    /// The records passing the current filters.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.dataset
            .as_ref()
            .map(|ds| FilteredView::from_indices(ds, self.visible_indices.clone()))
    }

    /// Recompute every dashboard output for the current selection.
    /// `None` when no dataset is loaded.
    pub fn snapshot(&self) -> Result<Option<DashboardSnapshot>> {
        let Some(view) = self.view() else {
            return Ok(None);
        };
        let cfg = &self.config;
        let scatter = |chart: &ScatterSpec| {
            project_scatter(&view, &chart.x, &chart.y, &chart.color, chart.size.as_deref())
        };

        Ok(Some(DashboardSnapshot {
            summary: compute_aggregates(&view, &cfg.kpi)?,
            distribution: value_counts(&view, &cfg.distribution_column)?,
            salary_vs_performance: scatter(&cfg.salary_vs_performance)?,
            experience_vs_salary: scatter(&cfg.experience_vs_salary)?,
            satisfaction_by_group: project_grouped(
                &view,
                &cfg.satisfaction_by_group.group,
                &cfg.satisfaction_by_group.value,
            )?,
            description: describe(&view),
            visible: view.indices().to_vec(),
        }))
    }

    /// KPI summary, reporting "no data" when nothing is loaded.
    pub fn summary(&self) -> Result<AggregateSummary> {
        match self.view() {
            Some(view) => compute_aggregates(&view, &self.config.kpi),
            None => Ok(AggregateSummary::no_data()),
        }
    }

    fn require_filter_column(&self, column: &str) -> Result<()> {
        if self.config.filter_columns.iter().any(|c| c == column) {
            Ok(())
        } else {
            Err(PipelineError::FieldNotFound {
                field: column.to_string(),
            })
        }
    }
}
