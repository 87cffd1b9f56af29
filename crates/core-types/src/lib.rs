pub mod bounds;
pub mod columns;
pub mod enums;
pub mod error;
pub mod rowset;
pub mod value;

// Re-export the core types to provide a clean public API.
pub use bounds::DateBounds;
pub use enums::{CellKind, SortDirection};
pub use error::CoreError;
pub use rowset::{ColumnInfo, DatasetInfo, Record, RowSet};
pub use value::{is_null_token, parse_decimal, SortValue};
