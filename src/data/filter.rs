use std::collections::{BTreeMap, BTreeSet};

use super::model::{Dataset, Record, Value};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Filter predicate: which values are allowed per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of allowed values.
///
/// Columns absent from the map impose no constraint. A column mapped to an
/// empty set lets nothing through.
pub type FilterSelection = BTreeMap<String, BTreeSet<Value>>;

/// Initialise a [`FilterSelection`] over `columns` with every value selected.
/// Columns missing from the dataset are skipped.
pub fn select_all_values<S: AsRef<str>>(dataset: &Dataset, columns: &[S]) -> FilterSelection {
    columns
        .iter()
        .filter_map(|col| {
            let col = col.as_ref();
            dataset
                .unique_values(col)
                .map(|vals| (col.to_string(), vals.clone()))
        })
        .collect()
}

/// Distinct values observed in `column`, sorted. Empty for an empty dataset
/// or a column the dataset does not have.
pub fn distinct_values(dataset: &Dataset, column: &str) -> BTreeSet<Value> {
    dataset
        .unique_values(column)
        .cloned()
        .unwrap_or_default()
}

/// Keep the records of `dataset` that satisfy every entry of `selection`.
pub fn apply_filter<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> Result<FilteredView<'a>> {
    FilteredView::all(dataset).filter(selection)
}

// ---------------------------------------------------------------------------
// FilteredView – ordered subset of a dataset
// ---------------------------------------------------------------------------

/// Indices of the dataset records that passed a selection, in source order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl PartialEq for FilteredView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.dataset, other.dataset) && self.indices == other.indices
    }
}

impl<'a> FilteredView<'a> {
    /// A view over every record.
    pub fn all(dataset: &'a Dataset) -> Self {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// A view over the given record indices. Out-of-range indices are dropped.
    pub fn from_indices(dataset: &'a Dataset, indices: Vec<usize>) -> Self {
        let indices = indices.into_iter().filter(|&i| i < dataset.len()).collect();
        FilteredView { dataset, indices }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Records of the view, in order.
    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    /// Narrow this view to the records that also satisfy `selection`.
    ///
    /// A record passes a column filter when its value for that column (or
    /// `Null` if it has none) is in the allowed set. Every key of
    /// `selection` must name a column of the dataset.
    pub fn filter(&self, selection: &FilterSelection) -> Result<FilteredView<'a>> {
        for col in selection.keys() {
            self.dataset.require_column(col)?;
        }

        // Columns where every known value is allowed cannot reject anything.
        let active: Vec<(&String, &BTreeSet<Value>)> = selection
            .iter()
            .filter(|(col, allowed)| match self.dataset.unique_values(col) {
                Some(all_vals) => !all_vals.is_subset(allowed),
                None => true,
            })
            .collect();
        log::debug!(
            "filtering {} records on {} of {} selected columns",
            self.len(),
            active.len(),
            selection.len()
        );

        let records = self.dataset.records();
        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|&i| {
                let rec = &records[i];
                active
                    .iter()
                    .all(|(col, allowed)| allowed.contains(rec.get(col)))
            })
            .collect();

        Ok(FilteredView {
            dataset: self.dataset,
            indices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    fn dataset() -> Dataset {
        let rows = [
            (1, "eng", "MSc"),
            (2, "ops", "PhD"),
            (3, "eng", "BSc"),
            (4, "hr", "MSc"),
        ];
        Dataset::from_records(
            rows.iter()
                .map(|&(id, team, edu)| {
                    [
                        ("id", Value::Integer(id)),
                        ("team", Value::from(team)),
                        ("edu", Value::from(edu)),
                    ]
                    .into_iter()
                    .collect::<Record>()
                })
                .collect(),
        )
    }

    fn set(values: &[&str]) -> BTreeSet<Value> {
        values.iter().map(|&v| Value::from(v)).collect()
    }

    fn ids(view: &FilteredView<'_>) -> Vec<i64> {
        view.records()
            .filter_map(|r| match r.get("id") {
                Value::Integer(i) => Some(*i),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_selection_is_identity() {
        let ds = dataset();
        let view = apply_filter(&ds, &FilterSelection::new()).unwrap();
        assert_eq!(view, FilteredView::all(&ds));
        assert_eq!(ids(&view), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_conjunctive_filter_keeps_order() {
        let ds = dataset();
        let mut sel = FilterSelection::new();
        sel.insert("team".into(), set(&["eng", "hr"]));
        sel.insert("edu".into(), set(&["MSc", "BSc"]));
        let view = apply_filter(&ds, &sel).unwrap();
        assert_eq!(ids(&view), vec![1, 3, 4]);

        sel.insert("edu".into(), set(&["MSc"]));
        let view = apply_filter(&ds, &sel).unwrap();
        assert_eq!(ids(&view), vec![1, 4]);
    }

    #[test]
    fn test_empty_allowed_set_excludes_everything() {
        let ds = dataset();
        let mut sel = FilterSelection::new();
        sel.insert("team".into(), BTreeSet::new());
        assert!(apply_filter(&ds, &sel).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_value_matches_nothing() {
        let ds = dataset();
        let mut sel = FilterSelection::new();
        sel.insert("team".into(), set(&["finance"]));
        assert!(apply_filter(&ds, &sel).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_column_fails() {
        let ds = dataset();
        let mut sel = FilterSelection::new();
        sel.insert("salary".into(), set(&["1"]));
        assert_eq!(
            apply_filter(&ds, &sel).unwrap_err(),
            PipelineError::FieldNotFound {
                field: "salary".into()
            }
        );
    }

    #[test]
    fn test_filter_is_idempotent() {
        let ds = dataset();
        let mut sel = FilterSelection::new();
        sel.insert("team".into(), set(&["eng"]));
        let once = apply_filter(&ds, &sel).unwrap();
        let twice = once.filter(&sel).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_cell_matches_null() {
        let mut records = dataset().into_records();
        records[1].values.remove("team");
        let ds = Dataset::from_records(records);

        let mut sel = FilterSelection::new();
        sel.insert("team".into(), [Value::Null].into_iter().collect());
        assert_eq!(ids(&apply_filter(&ds, &sel).unwrap()), vec![2]);
    }

    #[test]
    fn test_select_all_values_and_distinct() {
        let ds = dataset();
        let sel = select_all_values(&ds, &["team", "nope"]);
        assert_eq!(sel.len(), 1);
        assert_eq!(sel["team"], set(&["eng", "hr", "ops"]));
        assert_eq!(distinct_values(&ds, "edu"), set(&["BSc", "MSc", "PhD"]));
        assert!(distinct_values(&Dataset::default(), "edu").is_empty());
    }
}
