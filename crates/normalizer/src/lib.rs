//! # Bhavscope Normalizer
//!
//! Prepares a merged row-set for range queries and analytics:
//!
//! - `normalize` parses `TIMESTAMP` with a `TimestampParser` and moves it into
//!   the record keys. It never sorts.
//! - `drop_nulls` fills missing `SERIES` with `NONE`, then drops incomplete rows.
//! - `deduplicate` removes exact-duplicate records, first occurrence wins.

pub mod cleaning;
pub mod error;
pub mod normalize;
pub mod parser;

pub use cleaning::{deduplicate, drop_nulls, NullDropReport};
pub use error::NormalizeError;
pub use normalize::{normalize, Normalization};
pub use parser::TimestampParser;
