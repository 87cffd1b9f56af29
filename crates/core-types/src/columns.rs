//! Well-known bhavcopy column names.

pub const SYMBOL: &str = "SYMBOL";
pub const SERIES: &str = "SERIES";
pub const TIMESTAMP: &str = "TIMESTAMP";

pub const OPEN: &str = "OPEN";
pub const HIGH: &str = "HIGH";
pub const LOW: &str = "LOW";
pub const CLOSE: &str = "CLOSE";
pub const LAST: &str = "LAST";
pub const PREVCLOSE: &str = "PREVCLOSE";
pub const TOTTRDVAL: &str = "TOTTRDVAL";
pub const TOTALTRADES: &str = "TOTALTRADES";

/// Sentinel written into missing `SERIES` cells before nulls are dropped.
pub const SERIES_SENTINEL: &str = "NONE";

/// The numeric price/volume fields offered for sorting and charting.
pub const PRICE_COLUMNS: [&str; 8] = [
    OPEN,
    CLOSE,
    HIGH,
    LOW,
    LAST,
    PREVCLOSE,
    TOTTRDVAL,
    TOTALTRADES,
];
