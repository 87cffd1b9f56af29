use crate::error::QueryError;
use chrono::NaiveDate;
use core_types::{Record, RowSet, SortDirection, SortValue};
use std::cmp::Ordering;

/// A date-restricted, multi-key sort request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSort {
    /// Inclusive; defaults to the dataset's first date.
    pub start: Option<NaiveDate>,
    /// Inclusive; defaults to the dataset's last date.
    pub end: Option<NaiveDate>,
    /// One or two column names: primary, then tie-break.
    pub keys: Vec<String>,
    pub direction: SortDirection,
}

impl RangeSort {
    pub fn new(keys: Vec<String>, ascending: bool) -> Self {
        Self {
            start: None,
            end: None,
            keys,
            direction: SortDirection::from_ascending(ascending),
        }
    }

    pub fn between(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }
}

/// Returns the rows whose key falls in `[start, end]`, ordered by `keys`.
///
/// Rows are first put in date order, then restricted to the range, then
/// stable-sorted by the requested columns, so the result does not depend on
/// ingestion order. Missing cells sort last in either direction. An inverted
/// or empty range yields an empty row-set.
pub fn range_sort(rows: &RowSet, request: &RangeSort) -> Result<RowSet, QueryError> {
    if !rows.is_indexed() {
        return Err(QueryError::NotIndexed);
    }
    if request.keys.is_empty() || request.keys.len() > 2 {
        return Err(QueryError::InvalidSortKeys(request.keys.len()));
    }
    let key_columns = request
        .keys
        .iter()
        .map(|k| rows.require_column(k))
        .collect::<Result<Vec<_>, _>>()?;

    let Some(dataset) = rows.date_bounds() else {
        return Ok(rows.with_records(Vec::new()));
    };
    let window = dataset.narrow(request.start, request.end);
    if window.is_inverted() {
        tracing::debug!(?window, "Inverted date range; returning no rows.");
        return Ok(rows.with_records(Vec::new()));
    }

    let mut selected: Vec<&Record> = rows.records().iter().collect();
    selected.sort_by_key(|r| r.key);
    selected.retain(|r| r.key.is_some_and(|k| window.contains(k)));

    selected.sort_by(|a, b| {
        key_columns
            .iter()
            .map(|&col| {
                compare_cells(a.cell(col), b.cell(col), request.direction)
            })
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    tracing::debug!(rows = selected.len(), keys = ?request.keys, "Range sort complete.");
    Ok(rows.with_records(selected.into_iter().cloned().collect()))
}

fn compare_cells(a: Option<&str>, b: Option<&str>, direction: SortDirection) -> Ordering {
    match (SortValue::from_cell(a), SortValue::from_cell(b)) {
        (Some(x), Some(y)) => match direction {
            SortDirection::Ascending => x.cmp(&y),
            SortDirection::Descending => y.cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
