use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("Column '{0}' is not present in the dataset")]
    UnknownColumn(String),

    #[error("Cannot append a raw row-set to an indexed one (or vice versa)")]
    IndexMismatch,
}
