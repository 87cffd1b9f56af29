use crate::bounds::DateBounds;
use crate::columns::TIMESTAMP;
use crate::enums::CellKind;
use crate::error::CoreError;
use crate::value::parse_decimal;
use chrono::NaiveDate;
use serde::Serialize;

/// One row of the dataset: an optional ordering key plus the raw cell text.
///
/// `None` cells are missing values. Cells keep the exact text read from the
/// source; numeric interpretation happens on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub key: Option<NaiveDate>,
    pub cells: Vec<Option<String>>,
}

impl Record {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { key: None, cells }
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    pub fn has_missing_cell(&self) -> bool {
        self.cells.iter().any(Option::is_none)
    }
}

/// The in-memory collection of trading-day/symbol records under analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    columns: Vec<String>,
    records: Vec<Record>,
    indexed: bool,
}

/// Summary of a single column for dataset info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub kind: CellKind,
}

/// Shape and per-column summary of a row-set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetInfo {
    pub rows: usize,
    pub indexed: bool,
    pub bounds: Option<DateBounds>,
    pub columns: Vec<ColumnInfo>,
}

impl RowSet {
    /// Creates an empty, un-indexed row-set with the given header.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
            indexed: false,
        }
    }

    /// Builds a row-set from parts. Records are padded or truncated to the header width.
    pub fn from_parts(columns: Vec<String>, records: Vec<Record>, indexed: bool) -> Self {
        let width = columns.len();
        let records = records
            .into_iter()
            .map(|mut r| {
                r.cells.resize(width, None);
                r
            })
            .collect();
        Self {
            columns,
            records,
            indexed,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut Vec<Record> {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True once the `TIMESTAMP` column has been moved into the record keys.
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, CoreError> {
        self.column_index(name)
            .ok_or_else(|| CoreError::UnknownColumn(name.to_string()))
    }

    pub fn push(&mut self, mut record: Record) {
        record.cells.resize(self.columns.len(), None);
        self.records.push(record);
    }

    /// Appends `other` below `self`, unioning the columns in first-seen order.
    ///
    /// Cells for columns a side lacks become missing. An empty, header-less
    /// row-set adopts `other` wholesale.
    pub fn append(&mut self, other: RowSet) -> Result<(), CoreError> {
        if self.columns.is_empty() && self.records.is_empty() {
            *self = other;
            return Ok(());
        }
        if other.columns.is_empty() && other.records.is_empty() {
            return Ok(());
        }
        if self.indexed != other.indexed {
            return Err(CoreError::IndexMismatch);
        }

        let mut mapping = Vec::with_capacity(other.columns.len());
        for name in &other.columns {
            let position = match self.column_index(name) {
                Some(i) => i,
                None => {
                    self.columns.push(name.clone());
                    self.columns.len() - 1
                }
            };
            mapping.push(position);
        }

        let width = self.columns.len();
        for record in &mut self.records {
            record.cells.resize(width, None);
        }

        self.records.reserve(other.records.len());
        for record in other.records {
            let mut cells = vec![None; width];
            for (source, cell) in record.cells.into_iter().enumerate() {
                cells[mapping[source]] = cell;
            }
            self.records.push(Record {
                key: record.key,
                cells,
            });
        }
        Ok(())
    }

    /// A new row-set with the same header and index state but different records.
    pub fn with_records(&self, records: Vec<Record>) -> RowSet {
        RowSet::from_parts(self.columns.clone(), records, self.indexed)
    }

    /// Removes `column` from the cells and installs `keys` as the ordering key.
    ///
    /// `keys` must have one entry per record.
    pub fn set_index(&mut self, column: usize, keys: Vec<Option<NaiveDate>>) {
        debug_assert_eq!(keys.len(), self.records.len());
        self.columns.remove(column);
        for (record, key) in self.records.iter_mut().zip(keys) {
            record.cells.remove(column);
            record.key = key;
        }
        self.indexed = true;
    }

    /// Min/max ordering key, or `None` when un-indexed or every key is missing.
    pub fn date_bounds(&self) -> Option<DateBounds> {
        if !self.indexed {
            return None;
        }
        DateBounds::spanning(self.records.iter().filter_map(|r| r.key))
    }

    /// Missing-value count per column; the index is reported as `TIMESTAMP`.
    pub fn null_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let missing = self.records.iter().filter(|r| r.cell(i).is_none()).count();
                (name.clone(), missing)
            })
            .collect();
        if self.indexed {
            let missing = self.records.iter().filter(|r| r.key.is_none()).count();
            counts.insert(0, (TIMESTAMP.to_string(), missing));
        }
        counts
    }

    pub fn describe(&self) -> DatasetInfo {
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let present: Vec<&str> = self.records.iter().filter_map(|r| r.cell(i)).collect();
                let kind = if !present.is_empty() && present.iter().all(|v| parse_decimal(v).is_some()) {
                    CellKind::Numeric
                } else {
                    CellKind::Text
                };
                ColumnInfo {
                    name: name.clone(),
                    non_null: present.len(),
                    kind,
                }
            })
            .collect();

        DatasetInfo {
            rows: self.records.len(),
            indexed: self.indexed,
            bounds: self.date_bounds(),
            columns,
        }
    }
}
