use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Value – a single cell of a record
// ---------------------------------------------------------------------------

/// One cell of the employee table: an ID, a job title, a hire date, a
/// salary. Filter selections and distinct-value indexes are ordered sets of
/// these, hence the total order below (NaN sorts after every float).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date (`YYYY-MM-DD`) kept as text.
    Date(String),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) | Value::Date(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl Value {
    /// Numeric reading of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Null or a NaN float.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(v) => v.is_nan(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// A single row: column_name → value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub values: BTreeMap<String, Value>,
}

static NULL: Value = Value::Null;

impl Record {
    pub fn new(values: BTreeMap<String, Value>) -> Self {
        Record { values }
    }

    /// Value of a column, or `Null` when the row has no entry for it.
    pub fn get(&self, column: &str) -> &Value {
        self.values.get(column).unwrap_or(&NULL)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnKind – inferred column type
// ---------------------------------------------------------------------------

/// Column type inferred from the non-missing values of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Only integers and floats.
    Numeric,
    /// Only booleans.
    Flag,
    /// Only ISO dates.
    Date,
    /// Strings, or a mix of types.
    Text,
    /// No non-missing values at all.
    Empty,
}

impl ColumnKind {
    fn infer<'a>(values: impl Iterator<Item = &'a Value>) -> Self {
        let mut kind = ColumnKind::Empty;
        for v in values.filter(|v| !v.is_missing()) {
            let this = match v {
                Value::Integer(_) | Value::Float(_) => ColumnKind::Numeric,
                Value::Bool(_) => ColumnKind::Flag,
                Value::Date(_) => ColumnKind::Date,
                _ => ColumnKind::Text,
            };
            kind = match kind {
                ColumnKind::Empty => this,
                k if k == this => k,
                _ => return ColumnKind::Text,
            };
        }
        kind
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded table with pre-computed column indices.
///
/// Records are fixed at construction so the distinct-value index and the
/// column kinds always describe them.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records (rows), in source order.
    records: Vec<Record>,
    /// Ordered list of column names (the schema).
    column_names: Vec<String>,
    /// For each column the sorted set of unique values.
    unique_values: BTreeMap<String, BTreeSet<Value>>,
    /// For each column its inferred kind.
    column_kinds: BTreeMap<String, ColumnKind>,
}

impl Dataset {
    /// Build a dataset whose schema is the sorted union of the record keys.
    pub fn from_records(records: Vec<Record>) -> Self {
        let columns: BTreeSet<String> = records
            .iter()
            .flat_map(|r| r.values.keys().cloned())
            .collect();
        Self::with_columns(columns.into_iter().collect(), records)
    }

    /// Build a dataset with an explicit column order. Record keys outside
    /// `column_names` are appended to the schema.
    pub fn with_columns(mut column_names: Vec<String>, records: Vec<Record>) -> Self {
        for rec in &records {
            for col in rec.values.keys() {
                if !column_names.contains(col) {
                    column_names.push(col.clone());
                }
            }
        }

        let mut unique_values: BTreeMap<String, BTreeSet<Value>> = BTreeMap::new();
        let mut column_kinds = BTreeMap::new();
        for col in &column_names {
            let values: BTreeSet<Value> = records.iter().map(|r| r.get(col).clone()).collect();
            column_kinds.insert(col.clone(), ColumnKind::infer(values.iter()));
            unique_values.insert(col.clone(), values);
        }

        Dataset {
            records,
            column_names,
            unique_values,
            column_kinds,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Give the records back, e.g. to rebuild the dataset from edited rows.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Sorted distinct values of `column`, `Null` included for missing cells.
    pub fn unique_values(&self, column: &str) -> Option<&BTreeSet<Value>> {
        self.unique_values.get(column)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }

    /// Fail with [`PipelineError::FieldNotFound`] unless `column` is in the schema.
    pub fn require_column(&self, column: &str) -> Result<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(PipelineError::FieldNotFound {
                field: column.to_string(),
            })
        }
    }

    pub fn column_kind(&self, column: &str) -> Option<ColumnKind> {
        self.column_kinds.get(column).copied()
    }

    /// Numeric columns in schema order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &str> {
        self.column_names
            .iter()
            .filter(|c| self.column_kind(c) == Some(ColumnKind::Numeric))
            .map(String::as_str)
    }

    /// Check that no two records share a value in `column`.
    pub fn ensure_unique(&self, column: &str) -> Result<()> {
        self.require_column(column)?;
        let mut seen = BTreeSet::new();
        for rec in &self.records {
            let value = rec.get(column);
            if !seen.insert(value) {
                return Err(PipelineError::DuplicateValue {
                    field: column.to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, team: &str, score: f64) -> Record {
        [
            ("id", Value::Integer(id)),
            ("team", Value::from(team)),
            ("score", Value::Float(score)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_column_index() {
        let ds = Dataset::from_records(vec![row(1, "a", 1.5), row(2, "b", 2.0), row(3, "a", 3.0)]);

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.column_names(), ["id", "score", "team"]);
        assert_eq!(ds.unique_values("team").map(|v| v.len()), Some(2));
        assert_eq!(ds.column_kind("score"), Some(ColumnKind::Numeric));
        assert_eq!(ds.column_kind("team"), Some(ColumnKind::Text));
        assert_eq!(ds.numeric_columns().collect::<Vec<_>>(), vec!["id", "score"]);
    }

    #[test]
    fn test_schema_survives_empty_dataset() {
        let ds = Dataset::with_columns(vec!["id".into(), "team".into()], Vec::new());
        assert!(ds.is_empty());
        assert!(ds.require_column("team").is_ok());
        assert_eq!(ds.column_kind("team"), Some(ColumnKind::Empty));
        assert!(matches!(
            ds.require_column("salary"),
            Err(PipelineError::FieldNotFound { field }) if field == "salary"
        ));
    }

    #[test]
    fn test_mixed_column_is_text() {
        let mut odd = row(2, "b", 1.0);
        odd.values.insert("score".into(), Value::from("high"));
        let ds = Dataset::from_records(vec![row(1, "a", 1.0), odd]);
        assert_eq!(ds.column_kind("score"), Some(ColumnKind::Text));
    }

    #[test]
    fn test_rebuilt_dataset_reindexes_edited_rows() {
        let ds = Dataset::from_records(vec![row(1, "a", 1.0), row(2, "b", 2.0)]);
        let mut records = ds.into_records();
        records[1].values.insert("team".into(), Value::from("c"));
        records[0].values.insert("score".into(), Value::from("n/a"));

        let ds = Dataset::from_records(records);
        let teams: Vec<_> = ds.unique_values("team").unwrap().iter().cloned().collect();
        assert_eq!(teams, vec![Value::from("a"), Value::from("c")]);
        assert_eq!(ds.column_kind("score"), Some(ColumnKind::Text));
        assert_eq!(ds.records()[1].get("team"), &Value::from("c"));
    }

    #[test]
    fn test_ensure_unique() {
        let ds = Dataset::from_records(vec![row(1, "a", 1.0), row(2, "b", 1.0)]);
        assert!(ds.ensure_unique("id").is_ok());

        let dup = Dataset::from_records(vec![row(1, "a", 1.0), row(1, "b", 1.0)]);
        assert!(matches!(
            dup.ensure_unique("id"),
            Err(PipelineError::DuplicateValue { value, .. }) if value == "1"
        ));
    }

    #[test]
    fn test_value_ordering() {
        let mut vals = vec![
            Value::from("b"),
            Value::Float(f64::NAN),
            Value::Integer(3),
            Value::Null,
            Value::Float(1.0),
        ];
        vals.sort();
        assert_eq!(vals[0], Value::Null);
        assert_eq!(vals[1], Value::Integer(3));
        assert_eq!(vals[2], Value::Float(1.0));
        assert!(vals[3].is_missing());
        assert_eq!(vals[4], Value::from("b"));
    }
}
