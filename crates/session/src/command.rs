use analytics::{MaWindow, MovingAverageOverlay, ReturnPoint};
use chrono::NaiveDate;
use core_types::{DatasetInfo, DateBounds, RowSet};
use ingestion::{SkippedSource, UploadedFile};
use normalizer::{Normalization, NullDropReport};
use query::{RangeSort, SeriesRequest, SymbolSeries};

/// One user action against a `Session`.
#[derive(Debug, Clone)]
pub enum Command {
    /// Replaces the current uploads with these files.
    Upload(Vec<UploadedFile>),
    /// Concatenates every upload group into a fresh master row-set.
    CreateMaster,
    Info,
    NullCounts,
    DropNulls,
    NormalizeTimestamps,
    Deduplicate,
    Symbols {
        series: Option<String>,
    },
    SortRange(RangeSort),
    ChartSeries(SeriesRequest),
    DailyReturns {
        symbol: String,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    CumulativeReturns {
        symbol: String,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    MovingAverages {
        symbol: String,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        windows: Vec<MaWindow>,
    },
    /// Pulls one symbol's history out of the archive directory into the master.
    ExtractMoreData {
        symbol: String,
        deduplicate: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
    Daily,
    Cumulative,
}

/// Rows per upload group, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    pub label: String,
    pub rows: usize,
}

/// The result of a command. Presentation decides how each one is drawn.
#[derive(Debug, Clone)]
pub enum Outcome {
    Uploaded(Vec<UploadSummary>),
    MasterCreated {
        rows: usize,
        columns: usize,
    },
    Info(DatasetInfo),
    NullCounts(Vec<(String, usize)>),
    NullsDropped(NullDropReport),
    Normalized(Normalization),
    Deduplicated {
        removed: usize,
    },
    Symbols(Vec<String>),
    Table(RowSet),
    Series(Vec<SymbolSeries>),
    Returns {
        kind: ReturnKind,
        points: Vec<ReturnPoint>,
    },
    Overlay(MovingAverageOverlay),
    Extracted {
        added: usize,
        removed: usize,
        archives: usize,
        skipped: Vec<SkippedSource>,
        bounds: Option<DateBounds>,
    },
    /// A notice for the user, typically a failed command.
    Status(String),
}
