use crate::error::NormalizeError;
use crate::parser::TimestampParser;
use core_types::columns::TIMESTAMP;
use core_types::{DateBounds, RowSet};

/// What `normalize` did to the row-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// `TIMESTAMP` was parsed and became the ordering key.
    Applied { bounds: Option<DateBounds> },
    /// The row-set was already indexed; nothing changed.
    AlreadyIndexed { bounds: Option<DateBounds> },
    /// There is no `TIMESTAMP` column; nothing changed.
    MissingTimestamp,
}

impl Normalization {
    /// True when the row-set is indexed after the call.
    pub fn applied(&self) -> bool {
        !matches!(self, Normalization::MissingTimestamp)
    }

    pub fn bounds(&self) -> Option<DateBounds> {
        match self {
            Normalization::Applied { bounds } | Normalization::AlreadyIndexed { bounds } => *bounds,
            Normalization::MissingTimestamp => None,
        }
    }
}

/// Parses `TIMESTAMP` and sets it as the row-set's ordering key.
///
/// All values are parsed before anything is touched, so a failure leaves the
/// row-set exactly as it was. Missing cells become missing keys. Row order is
/// not changed.
pub fn normalize(
    rows: &mut RowSet,
    parser: &TimestampParser,
) -> Result<Normalization, NormalizeError> {
    if rows.is_indexed() {
        return Ok(Normalization::AlreadyIndexed {
            bounds: rows.date_bounds(),
        });
    }
    let Some(column) = rows.column_index(TIMESTAMP) else {
        tracing::warn!("No TIMESTAMP column; normalization skipped.");
        return Ok(Normalization::MissingTimestamp);
    };

    let mut keys = Vec::with_capacity(rows.len());
    for (row, record) in rows.records().iter().enumerate() {
        let key = match record.cell(column) {
            None => None,
            Some(raw) => Some(parser.parse(raw).ok_or_else(|| {
                NormalizeError::UnparseableTimestamp {
                    row,
                    value: raw.to_string(),
                }
            })?),
        };
        keys.push(key);
    }

    rows.set_index(column, keys);
    let bounds = rows.date_bounds();
    tracing::info!(rows = rows.len(), ?bounds, "TIMESTAMP set as ordering key.");

    Ok(Normalization::Applied { bounds })
}
