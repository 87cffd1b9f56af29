use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// One trading day of a symbol's closing price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub symbol: String,
    pub series: Option<String>,
    pub close: Decimal,
}

/// A daily or cumulative return on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub symbol: String,
    pub series: Option<String>,
    pub value: Decimal,
}

/// A rolling mean aligned to a price point; `None` during the warm-up rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovingAveragePoint {
    pub date: NaiveDate,
    pub value: Option<Decimal>,
}

/// One moving average in an overlay, with the colour it is drawn in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovingAverageSeries {
    pub label: String,
    pub window: usize,
    pub color: String,
    pub points: Vec<MovingAveragePoint>,
}

/// Actual closing prices plus every requested moving average over the same dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovingAverageOverlay {
    pub symbol: String,
    pub actual: Vec<PricePoint>,
    pub averages: Vec<MovingAverageSeries>,
}
