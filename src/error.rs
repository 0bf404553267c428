use thiserror::Error;

/// Errors surfaced by the chart core. All of these are programmer or
/// configuration mistakes, not transient failures, so callers are expected
/// to fail fast rather than retry.
#[derive(Debug, Error)]
pub enum ChartError {
    /// A requested column is not present in the dataset headers.
    #[error("column '{column}' not found in dataset")]
    Schema { column: String },

    /// A span falls outside the grid geometry or overlaps a region that
    /// was already handed out.
    #[error("layout error: {reason}")]
    Layout { reason: String },

    /// After excluding empty/non-numeric cells, a category was left with
    /// no usable value for the requested column.
    #[error("no usable values in column '{column}' for category '{category}'")]
    AggregationPolicy { column: String, category: String },
}

impl ChartError {
    pub fn layout(reason: impl Into<String>) -> Self {
        ChartError::Layout {
            reason: reason.into(),
        }
    }

    pub fn schema(column: impl Into<String>) -> Self {
        ChartError::Schema {
            column: column.into(),
        }
    }
}
