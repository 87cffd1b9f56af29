use crate::command::{Command, Outcome, ReturnKind, UploadSummary};
use crate::error::SessionError;
use analytics::{AnalyticsEngine, MaWindow, PricePoint};
use chrono::NaiveDate;
use configuration::Settings;
use core_types::columns::TIMESTAMP;
use core_types::{DateBounds, RowSet};
use ingestion::{ArchiveScanner, LabeledRowSet, NoProgress, ScanProgress};
use normalizer::{Normalization, TimestampParser};

/// All state carried between commands.
///
/// Nothing is global: a second `Session` is fully independent of the first.
pub struct Session {
    parser: TimestampParser,
    scanner: ArchiveScanner,
    palette: Vec<String>,
    engine: AnalyticsEngine,
    uploads: Vec<LabeledRowSet>,
    master: Option<RowSet>,
    bounds: Option<DateBounds>,
    progress: Box<dyn ScanProgress>,
}

impl Session {
    pub fn new(settings: &Settings) -> Result<Self, SessionError> {
        let parser = TimestampParser::new(settings.normalizer.date_formats.clone())?;
        let scanner = ArchiveScanner::new(
            settings.ingestion.data_dir.clone(),
            settings.ingestion.member_suffix.clone(),
        );

        Ok(Self {
            parser,
            scanner,
            palette: settings.analytics.palette.clone(),
            engine: AnalyticsEngine::new(),
            uploads: Vec::new(),
            master: None,
            bounds: None,
            progress: Box::new(NoProgress),
        })
    }

    /// Replaces the observer notified during archive scans.
    pub fn with_progress(mut self, progress: Box<dyn ScanProgress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn uploads(&self) -> &[LabeledRowSet] {
        &self.uploads
    }

    pub fn master(&self) -> Option<&RowSet> {
        self.master.as_ref()
    }

    /// Dataset min/max dates, known once the master has been normalized.
    pub fn bounds(&self) -> Option<DateBounds> {
        self.bounds
    }

    /// Runs `command`, turning any failure into an `Outcome::Status` notice.
    pub fn execute(&mut self, command: Command) -> Outcome {
        match self.try_execute(command) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "Command failed.");
                Outcome::Status(e.to_string())
            }
        }
    }

    pub fn try_execute(&mut self, command: Command) -> Result<Outcome, SessionError> {
        match command {
            Command::Upload(files) => {
                self.uploads = ingestion::parse_uploads(&files)?;
                let summary = self
                    .uploads
                    .iter()
                    .map(|g| UploadSummary {
                        label: g.label.clone(),
                        rows: g.rows.len(),
                    })
                    .collect();
                Ok(Outcome::Uploaded(summary))
            }
            Command::CreateMaster => {
                if self.uploads.is_empty() {
                    return Err(SessionError::NoUploads);
                }
                let master = ingestion::concat(self.uploads.clone())?;
                tracing::info!(rows = master.len(), columns = master.columns().len(), "Master dataset created.");
                let outcome = Outcome::MasterCreated {
                    rows: master.len(),
                    columns: master.columns().len(),
                };
                self.master = Some(master);
                self.bounds = None;
                Ok(outcome)
            }
            Command::Info => Ok(Outcome::Info(self.require_master()?.describe())),
            Command::NullCounts => Ok(Outcome::NullCounts(self.require_master()?.null_counts())),
            Command::DropNulls => {
                let master = self.master.as_mut().ok_or(SessionError::NoMaster)?;
                let report = normalizer::drop_nulls(master);
                self.bounds = master.date_bounds();
                Ok(Outcome::NullsDropped(report))
            }
            Command::NormalizeTimestamps => {
                let master = self.master.as_mut().ok_or(SessionError::NoMaster)?;
                let result = normalizer::normalize(master, &self.parser)?;
                if result == Normalization::MissingTimestamp {
                    return Err(SessionError::MissingColumn(TIMESTAMP.to_string()));
                }
                self.bounds = result.bounds();
                Ok(Outcome::Normalized(result))
            }
            Command::Deduplicate => {
                let master = self.master.as_mut().ok_or(SessionError::NoMaster)?;
                let removed = normalizer::deduplicate(master);
                self.bounds = master.date_bounds();
                Ok(Outcome::Deduplicated { removed })
            }
            Command::Symbols { series } => {
                let master = self.require_master()?;
                Ok(Outcome::Symbols(query::symbols(master, series.as_deref())?))
            }
            Command::SortRange(request) => {
                let master = self.require_master()?;
                Ok(Outcome::Table(query::range_sort(master, &request)?))
            }
            Command::ChartSeries(request) => {
                let master = self.require_master()?;
                Ok(Outcome::Series(query::chart_series(master, &request)?))
            }
            Command::DailyReturns { symbol, start, end } => {
                let prices = self.price_history(&symbol, start, end)?;
                let points = self.engine.daily_returns(&prices)?;
                Ok(Outcome::Returns {
                    kind: ReturnKind::Daily,
                    points,
                })
            }
            Command::CumulativeReturns { symbol, start, end } => {
                let prices = self.price_history(&symbol, start, end)?;
                let daily = self.engine.daily_returns(&prices)?;
                Ok(Outcome::Returns {
                    kind: ReturnKind::Cumulative,
                    points: self.engine.cumulative_returns(&daily)?,
                })
            }
            Command::MovingAverages {
                symbol,
                start,
                end,
                windows,
            } => self.moving_averages(&symbol, start, end, &windows),
            Command::ExtractMoreData {
                symbol,
                deduplicate,
            } => self.extract_more_data(&symbol, deduplicate),
        }
    }

    fn require_master(&self) -> Result<&RowSet, SessionError> {
        self.master.as_ref().ok_or(SessionError::NoMaster)
    }

    fn price_history(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>, SessionError> {
        let master = self.require_master()?;
        Ok(self.engine.price_history(master, symbol, start, end)?)
    }

    fn moving_averages(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        windows: &[MaWindow],
    ) -> Result<Outcome, SessionError> {
        let prices = self.price_history(symbol, start, end)?;
        let overlay = self
            .engine
            .moving_average_overlay(symbol, prices, windows, &self.palette)?;
        Ok(Outcome::Overlay(overlay))
    }

    /// Scans the archive directory for `symbol` and merges the rows into the master.
    ///
    /// Extracted rows are normalized first when the master already is, so both
    /// sides share an index state. Without a master the extracted rows become it.
    fn extract_more_data(&mut self, symbol: &str, deduplicate: bool) -> Result<Outcome, SessionError> {
        let scan = self.scanner.scan(symbol, &mut *self.progress)?;
        let mut rows = scan.rows;
        let added = rows.len();

        let mut removed = 0;
        if added > 0 {
            let master_indexed = self.master.as_ref().is_some_and(RowSet::is_indexed);
            if master_indexed
                && normalizer::normalize(&mut rows, &self.parser)? == Normalization::MissingTimestamp
            {
                return Err(SessionError::MissingColumn(TIMESTAMP.to_string()));
            }

            match self.master.as_mut() {
                Some(master) => master.append(rows)?,
                None => self.master = Some(rows),
            }
            let master = self.master.as_mut().ok_or(SessionError::NoMaster)?;
            if deduplicate {
                removed = normalizer::deduplicate(master);
            }
            self.bounds = master.date_bounds();
        } else {
            tracing::info!(symbol, "No archived rows matched.");
        }

        Ok(Outcome::Extracted {
            added,
            removed,
            archives: scan.archives,
            skipped: scan.skipped,
            bounds: self.bounds,
        })
    }
}
