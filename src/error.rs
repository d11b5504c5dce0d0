use thiserror::Error;

use crate::base::{AttributeValue, RowId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Degenerate domain for column {column}: every row has value {value}")]
    DegenerateDomain {
        column: String,
        value: AttributeValue,
    },

    #[error("Cannot aggregate an empty list of values")]
    EmptyAggregation,

    #[error("Unknown aggregation function: {0}")]
    UnknownAggregation(String),

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column {0} is listed more than once")]
    DuplicateColumn(String),

    #[error("Constant {0} for degenerate domains is outside [0, 1]")]
    ConstantOutOfRange(AttributeValue),

    #[error("Expected {expected} rows, got {actual}")]
    RowCountMismatch { expected: usize, actual: usize },

    #[error("Row {row} has no attribute {column}")]
    MissingAttribute { row: RowId, column: String },

    #[error("Attribute {column} of row {row} is not a finite number")]
    NotNumeric { row: RowId, column: String },

    #[error("Sorted list for {column} has {actual} entries, expected {expected}")]
    ListLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Sorted lists {lists:?} do not match the scored columns {columns:?}")]
    ListColumnMismatch {
        lists: Vec<String>,
        columns: Vec<String>,
    },

    #[error("Sorted list for {column} holds row {row} more than once")]
    DuplicateRow { column: String, row: RowId },

    #[error("Strategy {0} needs sorted access lists")]
    MissingSortedLists(String),

    #[error("No sorted access list for column {0}")]
    MissingSortedList(String),

    #[error("Row {row} is out of range (dataset has {len} rows)")]
    RowOutOfRange { row: RowId, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
