use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Column '{0}' is required for this calculation")]
    MissingColumn(String),

    #[error("The dataset has no date index yet; convert TIMESTAMP first")]
    NotIndexed,

    #[error("Calculation error: Division by zero encountered in metric '{0}'")]
    DivisionByZero(String),

    #[error("Calculation error: Decimal overflow in metric '{0}'")]
    Overflow(String),

    #[error("Moving-average window must be at least one row")]
    InvalidWindow,

    #[error("Unknown moving-average duration '{0}' (expected 1 W, 1 M, 3 M, 6 M, 1 Y or a row count)")]
    UnknownDuration(String),

    #[error("No colours to assign to moving-average series")]
    EmptyPalette,
}
