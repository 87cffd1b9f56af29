use core_types::columns::{SERIES, SERIES_SENTINEL};
use core_types::{Record, RowSet};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NullDropReport {
    /// Missing `SERIES` cells replaced with `NONE`.
    pub filled_series: usize,
    /// Rows removed because some other value was still missing.
    pub dropped: usize,
}

/// Fills missing `SERIES` with the `NONE` sentinel, then drops every row that
/// still has a missing cell (or a missing key, once indexed).
///
/// The fill happens first so rows whose only defect is `SERIES` survive.
pub fn drop_nulls(rows: &mut RowSet) -> NullDropReport {
    let mut report = NullDropReport::default();

    if let Some(series) = rows.column_index(SERIES) {
        for record in rows.records_mut().iter_mut() {
            if record.cells[series].is_none() {
                record.cells[series] = Some(SERIES_SENTINEL.to_string());
                report.filled_series += 1;
            }
        }
    }

    let indexed = rows.is_indexed();
    let before = rows.len();
    rows.records_mut()
        .retain(|r| !r.has_missing_cell() && (!indexed || r.key.is_some()));
    report.dropped = before - rows.len();

    tracing::info!(
        filled_series = report.filled_series,
        dropped = report.dropped,
        remaining = rows.len(),
        "Dropped incomplete rows."
    );
    report
}

/// Removes exact-duplicate records (same key and cells), keeping the first.
/// Returns the number of rows removed.
pub fn deduplicate(rows: &mut RowSet) -> usize {
    let before = rows.len();
    let mut seen: HashSet<Record> = HashSet::with_capacity(before);
    rows.records_mut().retain(|r| seen.insert(r.clone()));
    let removed = before - rows.len();
    if removed > 0 {
        tracing::info!(removed, "Removed duplicate rows.");
    }
    removed
}
