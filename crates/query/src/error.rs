use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    #[error("The dataset has no date index yet; convert TIMESTAMP first")]
    NotIndexed,

    #[error("Sort needs one or two columns, got {0}")]
    InvalidSortKeys(usize),

    #[error("Column '{0}' is not present in the dataset")]
    UnknownColumn(String),

    #[error("Row-sets with and without a date index cannot be combined")]
    IndexMismatch,
}

impl From<core_types::CoreError> for QueryError {
    fn from(err: core_types::CoreError) -> Self {
        match err {
            core_types::CoreError::UnknownColumn(name) => QueryError::UnknownColumn(name),
            core_types::CoreError::IndexMismatch => QueryError::IndexMismatch,
        }
    }
}
