use crate::error::AnalyticsError;
use crate::report::{MovingAverageOverlay, MovingAveragePoint, MovingAverageSeries, PricePoint, ReturnPoint};
use crate::window::MaWindow;
use chrono::NaiveDate;
use core_types::columns::{CLOSE, SERIES, SYMBOL};
use core_types::{parse_decimal, RowSet};
use rust_decimal::Decimal;

/// A stateless calculator for per-symbol returns and moving averages.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts one symbol's closing prices inside `[start, end]`, in date order.
    ///
    /// # Arguments
    ///
    /// * `rows` - A normalized (date-indexed) row-set.
    /// * `symbol` - The exact `SYMBOL` value to select.
    /// * `start`, `end` - Inclusive bounds; `None` means the dataset's own bound.
    ///
    /// Rows whose `CLOSE` is missing or not numeric are skipped. Rows sharing a
    /// date keep their row-set order.
    pub fn price_history(
        &self,
        rows: &RowSet,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>, AnalyticsError> {
        if !rows.is_indexed() {
            return Err(AnalyticsError::NotIndexed);
        }
        let symbol_col = rows
            .column_index(SYMBOL)
            .ok_or_else(|| AnalyticsError::MissingColumn(SYMBOL.to_string()))?;
        let close_col = rows
            .column_index(CLOSE)
            .ok_or_else(|| AnalyticsError::MissingColumn(CLOSE.to_string()))?;
        let series_col = rows.column_index(SERIES);

        let Some(dataset) = rows.date_bounds() else {
            return Ok(Vec::new());
        };
        let window = dataset.narrow(start, end);

        let mut points = Vec::new();
        for record in rows.records() {
            if record.cell(symbol_col) != Some(symbol) {
                continue;
            }
            let Some(date) = record.key.filter(|k| window.contains(*k)) else {
                continue;
            };
            let Some(close) = record.cell(close_col).and_then(parse_decimal) else {
                tracing::debug!(symbol, %date, "Skipping row without a numeric CLOSE.");
                continue;
            };
            points.push(PricePoint {
                date,
                symbol: symbol.to_string(),
                series: series_col.and_then(|c| record.cell(c)).map(str::to_string),
                close,
            });
        }
        points.sort_by_key(|p| p.date);
        Ok(points)
    }

    /// `(CLOSE[t] - CLOSE[t-1]) / CLOSE[t-1]` for every row after the first.
    ///
    /// The first row has no return and is not emitted, so the output is one
    /// shorter than the input (empty for one row or fewer).
    pub fn daily_returns(&self, prices: &[PricePoint]) -> Result<Vec<ReturnPoint>, AnalyticsError> {
        prices
            .windows(2)
            .map(|w| {
                let (prev, curr) = (&w[0], &w[1]);
                let metric = || format!("daily return of {} on {}", curr.symbol, curr.date);
                if prev.close.is_zero() {
                    return Err(AnalyticsError::DivisionByZero(metric()));
                }
                let value = curr
                    .close
                    .checked_sub(prev.close)
                    .and_then(|change| change.checked_div(prev.close))
                    .ok_or_else(|| AnalyticsError::Overflow(metric()))?;
                Ok(ReturnPoint {
                    date: curr.date,
                    symbol: curr.symbol.clone(),
                    series: curr.series.clone(),
                    value,
                })
            })
            .collect()
    }

    /// Running product of `1 + r`, seeded at 1; the seed itself is not emitted.
    pub fn cumulative_returns(&self, daily: &[ReturnPoint]) -> Result<Vec<ReturnPoint>, AnalyticsError> {
        let mut growth = Decimal::ONE;
        daily
            .iter()
            .map(|r| {
                growth = Decimal::ONE
                    .checked_add(r.value)
                    .and_then(|factor| growth.checked_mul(factor))
                    .ok_or_else(|| {
                        AnalyticsError::Overflow(format!("cumulative return of {} on {}", r.symbol, r.date))
                    })?;
                Ok(ReturnPoint {
                    value: growth,
                    ..r.clone()
                })
            })
            .collect()
    }

    /// Trailing simple mean of `CLOSE` over `window` rows, aligned to `prices`.
    ///
    /// Positions before `window - 1` have no value.
    pub fn moving_average(
        &self,
        prices: &[PricePoint],
        window: usize,
    ) -> Result<Vec<MovingAveragePoint>, AnalyticsError> {
        if window == 0 {
            return Err(AnalyticsError::InvalidWindow);
        }
        let divisor = Decimal::from(window);
        let mut sum = Decimal::ZERO;

        let mut averages = Vec::with_capacity(prices.len());
        for (i, p) in prices.iter().enumerate() {
            let overflow = || AnalyticsError::Overflow(format!("{window}-row moving average on {}", p.date));
            sum = sum.checked_add(p.close).ok_or_else(overflow)?;
            if i >= window {
                sum = sum.checked_sub(prices[i - window].close).ok_or_else(overflow)?;
            }
            let value = if i + 1 >= window {
                Some(sum.checked_div(divisor).ok_or_else(overflow)?)
            } else {
                None
            };
            averages.push(MovingAveragePoint { date: p.date, value });
        }
        Ok(averages)
    }

    /// The actual price series plus one moving average per requested window.
    ///
    /// Colours are taken from `palette` in request order and cycle when there
    /// are more windows than colours.
    pub fn moving_average_overlay(
        &self,
        symbol: &str,
        prices: Vec<PricePoint>,
        windows: &[MaWindow],
        palette: &[String],
    ) -> Result<MovingAverageOverlay, AnalyticsError> {
        if palette.is_empty() {
            return Err(AnalyticsError::EmptyPalette);
        }

        let averages = windows
            .iter()
            .enumerate()
            .map(|(i, w)| {
                Ok(MovingAverageSeries {
                    label: w.label(),
                    window: w.rows(),
                    color: palette[i % palette.len()].clone(),
                    points: self.moving_average(&prices, w.rows())?,
                })
            })
            .collect::<Result<Vec<_>, AnalyticsError>>()?;

        Ok(MovingAverageOverlay {
            symbol: symbol.to_string(),
            actual: prices,
            averages,
        })
    }
}
