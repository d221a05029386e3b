/// Errors that can occur while building or editing an event table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventTableError {
    /// A short name is empty
    #[error("Parameter {0} has an empty short name")]
    EmptyShortName(usize),

    /// Two parameters share a short name
    #[error("Duplicate parameter short name: {0}")]
    DuplicateShortName(String),

    /// Number of columns differs from number of names
    #[error("{parameters} parameter names but {columns} columns")]
    ColumnCountMismatch {
        /// Number of names supplied
        parameters: usize,
        /// Number of columns supplied
        columns: usize,
    },

    /// A column's length differs from the first column's
    #[error("Column {parameter} has {actual} events, expected {expected}")]
    ColumnLengthMismatch {
        /// Short name of the offending column
        parameter: String,
        /// Length of the first column
        expected: usize,
        /// Length of this column
        actual: usize,
    },

    /// A parameter index is past the end of the table
    #[error("Parameter index {index} out of range ({count} parameters)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of parameters
        count: usize,
    },
}
