//! Errors raised by the filter-and-aggregate pipeline.
//!
//! Only column lookups can fail. An empty view is not an error: aggregates
//! report it as `None` and descriptive statistics as NaN.

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// The named column is not part of the dataset schema.
    #[error("field not found: {field}")]
    FieldNotFound { field: String },

    /// A numeric column was required but a row holds something else.
    #[error("field {field} holds non-numeric value {value}")]
    NotNumeric { field: String, value: String },

    /// A column expected to identify rows holds a repeated value.
    #[error("duplicate value {value} in field {field}")]
    DuplicateValue { field: String, value: String },
}
