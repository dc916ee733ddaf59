//! Per-column descriptive statistics, the `DataFrame.describe()` table.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::data::filter::FilteredView;

use super::aggregate::numeric_values;

/// Statistics of one numeric column. Undefined entries are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1).
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl ColumnSummary {
    fn from_values(column: &str, mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        let n = values.len();
        let mean = if n == 0 {
            f64::NAN
        } else {
            values.iter().sum::<f64>() / n as f64
        };
        let std = if n < 2 {
            f64::NAN
        } else {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        };

        ColumnSummary {
            column: column.to_string(),
            count: n,
            mean,
            std,
            min: values.first().copied().unwrap_or(f64::NAN),
            p25: percentile(&values, 0.25),
            p50: percentile(&values, 0.50),
            p75: percentile(&values, 0.75),
            max: values.last().copied().unwrap_or(f64::NAN),
        }
    }

    /// Statistics in table row order.
    pub fn stats(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.p25),
            ("50%", self.p50),
            ("75%", self.p75),
            ("max", self.max),
        ]
    }
}

/// Percentile `q` in `[0, 1]` of sorted values, linearly interpolated
/// between the closest ranks.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// The `describe()` table of a view: one summary per numeric column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Description {
    pub columns: Vec<ColumnSummary>,
}

impl Description {
    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.column == column)
    }

    /// Table with a `statistic` label column and one `Float64` column per
    /// summarised dataset column.
    pub fn to_record_batch(&self) -> arrow::error::Result<RecordBatch> {
        let labels = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
        let mut fields = vec![Field::new("statistic", DataType::Utf8, false)];
        let mut arrays: Vec<ArrayRef> = vec![Arc::new(StringArray::from(labels.to_vec()))];

        for summary in &self.columns {
            fields.push(Field::new(&summary.column, DataType::Float64, true));
            let values: Vec<Option<f64>> = summary
                .stats()
                .iter()
                .map(|(_, v)| (!v.is_nan()).then_some(*v))
                .collect();
            arrays.push(Arc::new(Float64Array::from(values)));
        }

        RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
    }
}

/// Descriptive statistics for every numeric column of the dataset, over the
/// non-missing cells of the view.
pub fn describe(view: &FilteredView<'_>) -> Description {
    let columns = view
        .dataset()
        .numeric_columns()
        .filter_map(|col| match numeric_values(view, col) {
            Ok(values) => Some(ColumnSummary::from_values(col, values)),
            Err(e) => {
                log::warn!("skipping column {col} in describe: {e}");
                None
            }
        })
        .collect();
    Description { columns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::employee::*;
    use arrow::array::Array;

    #[test]
    fn test_performance_score_column() {
        let desc = describe(&FilteredView::all(sample_dataset()));
        let perf = desc.get(PERFORMANCE_SCORE).unwrap();

        assert_eq!(perf.count, 5);
        assert_eq!(perf.min, 2.0);
        assert_eq!(perf.max, 5.0);
        assert!((perf.mean - 3.6).abs() < 1e-12);
        // values 2, 3, 4, 4, 5
        assert_eq!(perf.p25, 3.0);
        assert_eq!(perf.p50, 4.0);
        assert_eq!(perf.p75, 4.0);
        assert!((perf.std - 1.140175425099138).abs() < 1e-12);
    }

    #[test]
    fn test_numeric_columns_only() {
        let desc = describe(&FilteredView::all(sample_dataset()));
        let names: Vec<_> = desc.columns.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(
            names,
            vec![
                EMPLOYEE_ID,
                AGE,
                YEARS_AT_COMPANY,
                PERFORMANCE_SCORE,
                MONTHLY_SALARY,
                WORK_HOURS_PER_WEEK,
                SATISFACTION_SCORE,
                RESIGNED,
            ]
        );
    }

    #[test]
    fn test_empty_view_is_nan() {
        let ds = sample_dataset();
        let desc = describe(&FilteredView::from_indices(ds, Vec::new()));
        let salary = desc.get(MONTHLY_SALARY).unwrap();
        assert_eq!(salary.count, 0);
        for (name, v) in salary.stats().iter().skip(1) {
            assert!(v.is_nan(), "{name} should be NaN");
        }
    }

    #[test]
    fn test_single_value_has_no_std() {
        let ds = sample_dataset();
        let desc = describe(&FilteredView::from_indices(ds, vec![0]));
        let age = desc.get(AGE).unwrap();
        assert_eq!(age.mean, 29.0);
        assert_eq!(age.p75, 29.0);
        assert!(age.std.is_nan());
    }

    #[test]
    fn test_percentile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&v, 0.25), 1.75);
        assert_eq!(percentile(&v, 0.5), 2.5);
        assert_eq!(percentile(&v, 1.0), 4.0);
        assert!(percentile(&[], 0.5).is_nan());
    }

    #[test]
    fn test_description_batch() {
        let ds = sample_dataset();
        let batch = describe(&FilteredView::from_indices(ds, vec![2])).to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 8);
        assert_eq!(batch.num_columns(), 9);
        let age = batch
            .column_by_name(AGE)
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        // single row: count 1, std undefined
        assert_eq!(age.value(0), 1.0);
        assert!(age.is_null(2));
    }
}
