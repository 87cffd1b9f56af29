//! # Bhavscope Query Engine
//!
//! Read-only views over a normalized row-set. Nothing here mutates its input.

pub mod error;
pub mod series;
pub mod sort;

pub use error::QueryError;
pub use series::{chart_series, symbols, SeriesRequest, SymbolSeries};
pub use sort::{range_sort, RangeSort};
