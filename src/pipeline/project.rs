//! Chart inputs derived from a view: scatter points, grouped value series for
//! box plots and value counts for the distribution plot.

use std::collections::{BTreeMap, BTreeSet};

use crate::color::ColorMap;
use crate::data::filter::FilteredView;
use crate::data::model::Value;
use crate::error::Result;

use super::aggregate::as_number;

/// One point of a scatter plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: Value,
    pub y: Value,
    pub color: Value,
    pub size: Option<Value>,
}

/// Scatter plot input: one point per view row plus the colour legend.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterProjection {
    pub points: Vec<ScatterPoint>,
    pub legend: ColorMap,
}

/// Project every row of the view onto the given columns, in view order.
pub fn project_scatter(
    view: &FilteredView<'_>,
    x: &str,
    y: &str,
    color: &str,
    size: Option<&str>,
) -> Result<ScatterProjection> {
    let dataset = view.dataset();
    for col in [x, y, color].into_iter().chain(size) {
        dataset.require_column(col)?;
    }

    let points: Vec<ScatterPoint> = view
        .records()
        .map(|r| ScatterPoint {
            x: r.get(x).clone(),
            y: r.get(y).clone(),
            color: r.get(color).clone(),
            size: size.map(|s| r.get(s).clone()),
        })
        .collect();
    let categories: BTreeSet<Value> = points.iter().map(|p| p.color.clone()).collect();
    let legend = ColorMap::new(color, &categories);

    Ok(ScatterProjection { points, legend })
}

/// Numeric values grouped by a category, groups in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedSeries {
    pub groups: Vec<(Value, Vec<f64>)>,
}

impl GroupedSeries {
    pub fn get(&self, key: &Value) -> Option<&[f64]> {
        self.groups
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Collect `value` per distinct `group`, for a grouped box plot.
///
/// Group order is the order in which each group first appears in the view.
/// Missing values are skipped; a row whose group has no values still
/// creates its group.
pub fn project_grouped(view: &FilteredView<'_>, group: &str, value: &str) -> Result<GroupedSeries> {
    let dataset = view.dataset();
    dataset.require_column(group)?;
    dataset.require_column(value)?;

    let mut series = GroupedSeries::default();
    let mut slots: BTreeMap<&Value, usize> = BTreeMap::new();
    for rec in view.records() {
        let key = rec.get(group);
        let slot = *slots.entry(key).or_insert_with(|| {
            series.groups.push((key.clone(), Vec::new()));
            series.groups.len() - 1
        });

        let cell = rec.get(value);
        if !cell.is_missing() {
            series.groups[slot].1.push(as_number(value, cell)?);
        }
    }
    Ok(series)
}

/// Number of rows per distinct value of `column`, sorted by value.
pub fn value_counts(view: &FilteredView<'_>, column: &str) -> Result<Vec<(Value, usize)>> {
    view.dataset().require_column(column)?;
    let mut counts: BTreeMap<&Value, usize> = BTreeMap::new();
    for rec in view.records() {
        *counts.entry(rec.get(column)).or_default() += 1;
    }
    Ok(counts.into_iter().map(|(v, n)| (v.clone(), n)).collect())
}
