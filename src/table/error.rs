//! Error types for the table widget.

use thiserror::Error;

/// Errors raised by the table widget.
///
/// Only [`TableError::Configuration`] can occur while rendering; the other
/// variants come from building columns out of configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A column without a render function has no matching field in a row.
    #[error("no data for column '{column}' in row '{row_id}' and no render function")]
    Configuration { column: String, row_id: String },

    /// A column names a comparator that does not exist.
    #[error("unknown comparator '{name}' for column '{column}'")]
    UnknownComparator { column: String, name: String },

    /// A column definition is contradictory.
    #[error("invalid column '{column}': {reason}")]
    InvalidColumn { column: String, reason: String },
}
