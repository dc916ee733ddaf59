use serde::{Deserialize, Serialize};

use crate::data::employee;
use crate::data::filter::FilteredView;
use crate::data::model::Value;
use crate::error::{PipelineError, Result};

/// Columns averaged into the KPI summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiColumns {
    pub performance: String,
    pub salary: String,
    pub satisfaction: String,
}

impl Default for KpiColumns {
    fn default() -> Self {
        Self {
            performance: employee::PERFORMANCE_SCORE.to_string(),
            salary: employee::MONTHLY_SALARY.to_string(),
            satisfaction: employee::SATISFACTION_SCORE.to_string(),
        }
    }
}

/// KPI block of the dashboard. A mean of `None` means the view had no
/// values to average.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AggregateSummary {
    pub count: usize,
    pub mean_performance: Option<f64>,
    pub mean_salary: Option<f64>,
    pub mean_satisfaction: Option<f64>,
}

impl AggregateSummary {
    /// Summary for an absent dataset.
    pub fn no_data() -> Self {
        Self::default()
    }

    pub fn performance_display(&self) -> String {
        format_mean(self.mean_performance, 2)
    }

    /// Salary mean as currency, e.g. `$85,000.00`.
    pub fn salary_display(&self) -> String {
        match self.mean_salary {
            Some(v) => format!("${}", group_thousands(v, 2)),
            None => NO_DATA.to_string(),
        }
    }

    pub fn satisfaction_display(&self) -> String {
        format_mean(self.mean_satisfaction, 2)
    }
}

/// Placeholder shown for undefined statistics.
pub const NO_DATA: &str = "N/A";

/// Round for display, or [`NO_DATA`].
pub fn format_mean(mean: Option<f64>, decimals: usize) -> String {
    match mean {
        Some(v) => format!("{v:.decimals$}"),
        None => NO_DATA.to_string(),
    }
}

fn group_thousands(v: f64, decimals: usize) -> String {
    let text = format!("{:.decimals$}", v.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    if v.is_sign_negative() && v != 0.0 {
        grouped.insert(0, '-');
    }
    grouped
}

/// Arithmetic mean of `column` over the view, skipping missing cells.
/// `None` when there is nothing to average.
pub fn mean(view: &FilteredView<'_>, column: &str) -> Result<Option<f64>> {
    let values = numeric_values(view, column)?;
    if values.is_empty() {
        return Ok(None);
    }
    Ok(Some(values.iter().sum::<f64>() / values.len() as f64))
}

/// Non-missing numeric cells of `column`, in view order.
pub(crate) fn numeric_values(view: &FilteredView<'_>, column: &str) -> Result<Vec<f64>> {
    view.dataset().require_column(column)?;
    view.records()
        .map(|r| r.get(column))
        .filter(|v| !v.is_missing())
        .map(|v| as_number(column, v))
        .collect()
}

pub(crate) fn as_number(column: &str, value: &Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| PipelineError::NotNumeric {
        field: column.to_string(),
        value: value.to_string(),
    })
}

/// Count and KPI means over the view, at full precision.
pub fn compute_aggregates(view: &FilteredView<'_>, kpi: &KpiColumns) -> Result<AggregateSummary> {
    Ok(AggregateSummary {
        count: view.len(),
        mean_performance: mean(view, &kpi.performance)?,
        mean_salary: mean(view, &kpi.salary)?,
        mean_satisfaction: mean(view, &kpi.satisfaction)?,
    })
}
