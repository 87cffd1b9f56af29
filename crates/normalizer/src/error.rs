use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("TIMESTAMP value '{value}' in row {row} does not match any known date format")]
    UnparseableTimestamp { row: usize, value: String },

    #[error("No date formats configured")]
    NoFormats,
}
