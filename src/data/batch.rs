use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::Result;
use arrow::record_batch::RecordBatch;

use super::filter::FilteredView;
use super::model::{ColumnKind, Value};

// ---------------------------------------------------------------------------
// View → Arrow record batch (raw data table, Parquet export)
// ---------------------------------------------------------------------------

/// Convert the rows of a view into a [`RecordBatch`] with one column per
/// dataset column. Numeric columns become `Int64` when every value is an
/// integer and `Float64` otherwise; dates become `Date32`.
pub fn to_record_batch(view: &FilteredView<'_>) -> Result<RecordBatch> {
    let dataset = view.dataset();
    let mut fields = Vec::with_capacity(dataset.column_names().len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(dataset.column_names().len());

    for col in dataset.column_names() {
        let cells: Vec<&Value> = view.records().map(|r| r.get(col)).collect();
        let kind = dataset.column_kind(col).unwrap_or(ColumnKind::Empty);
        let array = column_array(kind, &cells)?;
        fields.push(Field::new(col, array.data_type().clone(), true));
        arrays.push(array);
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
}

fn column_array(kind: ColumnKind, cells: &[&Value]) -> Result<ArrayRef> {
    let array: ArrayRef = match kind {
        ColumnKind::Numeric => {
            let all_integer = cells
                .iter()
                .all(|v| matches!(v, Value::Integer(_) | Value::Null));
            if all_integer {
                Arc::new(
                    cells
                        .iter()
                        .map(|v| match v {
                            Value::Integer(i) => Some(*i),
                            _ => None,
                        })
                        .collect::<Int64Array>(),
                )
            } else {
                Arc::new(cells.iter().map(|v| v.as_f64()).collect::<Float64Array>())
            }
        }
        ColumnKind::Flag => Arc::new(
            cells
                .iter()
                .map(|v| match v {
                    Value::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect::<BooleanArray>(),
        ),
        ColumnKind::Date => cast(&text_array(cells), &DataType::Date32)?,
        ColumnKind::Text | ColumnKind::Empty => text_array(cells),
    };
    Ok(array)
}

fn text_array(cells: &[&Value]) -> ArrayRef {
    Arc::new(
        cells
            .iter()
            .map(|v| match v {
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect::<StringArray>(),
    )
}
