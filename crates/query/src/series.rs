use crate::error::QueryError;
use chrono::NaiveDate;
use core_types::columns::{SERIES, SYMBOL};
use core_types::{parse_decimal, RowSet};
use rust_decimal::Decimal;
use serde::Serialize;

/// Unique `SYMBOL` values in order of first appearance.
///
/// With `series` set, only rows of that market series are considered.
pub fn symbols(rows: &RowSet, series: Option<&str>) -> Result<Vec<String>, QueryError> {
    let symbol_col = rows.require_column(SYMBOL)?;
    let series_col = match series {
        Some(_) => Some(rows.require_column(SERIES)?),
        None => None,
    };

    let mut unique: Vec<String> = Vec::new();
    for record in rows.records() {
        if let (Some(col), Some(wanted)) = (series_col, series) {
            if record.cell(col) != Some(wanted) {
                continue;
            }
        }
        if let Some(symbol) = record.cell(symbol_col) {
            if !unique.iter().any(|s| s == symbol) {
                unique.push(symbol.to_string());
            }
        }
    }
    Ok(unique)
}

/// Parameters for a per-symbol chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub symbols: Vec<String>,
    /// The numeric column plotted on the Y axis, e.g. `CLOSE`.
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// A date-indexed numeric series for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolSeries {
    pub symbol: String,
    pub points: Vec<SeriesPoint>,
}

/// Builds one date-ordered series per requested symbol, in request order.
///
/// Rows outside the range, or whose value is missing or not numeric, are left
/// out. A symbol with no rows yields an empty series.
pub fn chart_series(rows: &RowSet, request: &SeriesRequest) -> Result<Vec<SymbolSeries>, QueryError> {
    if !rows.is_indexed() {
        return Err(QueryError::NotIndexed);
    }
    let symbol_col = rows.require_column(SYMBOL)?;
    let value_col = rows.require_column(&request.column)?;

    let Some(dataset) = rows.date_bounds() else {
        return Ok(request
            .symbols
            .iter()
            .map(|s| SymbolSeries {
                symbol: s.clone(),
                points: Vec::new(),
            })
            .collect());
    };
    let window = dataset.narrow(request.start, request.end);

    let series = request
        .symbols
        .iter()
        .map(|symbol| {
            let mut points: Vec<SeriesPoint> = rows
                .records()
                .iter()
                .filter(|r| r.cell(symbol_col) == Some(symbol.as_str()))
                .filter_map(|r| {
                    let date = r.key.filter(|k| window.contains(*k))?;
                    let value = r.cell(value_col).and_then(parse_decimal)?;
                    Some(SeriesPoint { date, value })
                })
                .collect();
            points.sort_by_key(|p| p.date);
            SymbolSeries {
                symbol: symbol.clone(),
                points,
            }
        })
        .collect();

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Record;
    use rust_decimal_macros::dec;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn data() -> RowSet {
        let rows = [
            (2, "ABC", "EQ", "110"),
            (1, "ABC", "EQ", "100"),
            (1, "XYZ", "BE", "50"),
            (3, "ABC", "EQ", "-"),
            (2, "XYZ", "BE", "51"),
        ];
        let records = rows
            .iter()
            .map(|(day, symbol, series, close)| Record {
                key: Some(d(*day)),
                cells: vec![
                    Some(symbol.to_string()),
                    Some(series.to_string()),
                    Some(close.to_string()),
                ],
            })
            .collect();
        RowSet::from_parts(vec!["SYMBOL".into(), "SERIES".into(), "CLOSE".into()], records, true)
    }

    #[test]
    fn symbols_are_unique_in_first_seen_order() {
        assert_eq!(symbols(&data(), None).unwrap(), vec!["ABC", "XYZ"]);
        assert_eq!(symbols(&data(), Some("BE")).unwrap(), vec!["XYZ"]);
    }

    #[test]
    fn chart_series_is_date_ordered_and_skips_non_numeric() {
        let request = SeriesRequest {
            start: None,
            end: None,
            symbols: vec!["ABC".into(), "XYZ".into(), "NOPE".into()],
            column: "CLOSE".into(),
        };
        let series = chart_series(&data(), &request).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(
            series[0].points,
            vec![
                SeriesPoint { date: d(1), value: dec!(100) },
                SeriesPoint { date: d(2), value: dec!(110) },
            ]
        );
        assert_eq!(series[1].points.len(), 2);
        assert!(series[2].points.is_empty());
    }

    #[test]
    fn chart_series_respects_range() {
        let request = SeriesRequest {
            start: Some(d(2)),
            end: Some(d(2)),
            symbols: vec!["XYZ".into()],
            column: "CLOSE".into(),
        };
        let series = chart_series(&data(), &request).unwrap();
        assert_eq!(series[0].points, vec![SeriesPoint { date: d(2), value: dec!(51) }]);
    }
}
