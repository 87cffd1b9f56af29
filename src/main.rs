use analytics::MaWindow;
use anyhow::Context;
use chrono::NaiveDate;
use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use configuration::{init_logging, load_settings, OutputFormat};
use core_types::columns::{CLOSE, PRICE_COLUMNS};
use ingestion::UploadedFile;
use query::{RangeSort, SeriesRequest};
use session::{Command, Outcome, Session};
use std::path::PathBuf;

mod progress;
mod render;

use progress::ScanProgressBar;

/// The main entry point for the Bhavscope analysis tool.
fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref()).context("Failed to load settings")?;
    // Held until exit so buffered file logs are flushed.
    let _guard = init_logging(&settings.logging).context("Failed to initialise logging")?;
    let format = cli.format.unwrap_or(settings.output.format);

    let mut session = Session::new(&settings)
        .context("Failed to start session")?
        .with_progress(Box::new(ScanProgressBar::new()?));

    let (dataset, command) = cli.command.into_parts();
    prepare(&mut session, &dataset)?;

    let outcome = match command {
        Some(command) => session.execute(command),
        None => session
            .master()
            .cloned()
            .map(Outcome::Table)
            .unwrap_or_else(|| Outcome::Status("No files given; nothing to show".to_string())),
    };
    render::render(&outcome, format)
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Exploratory analysis of end-of-day bhavcopy files.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to ./bhavscope.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format; overrides `output.format` from the settings.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the master dataset built from the given files.
    Master(DatasetArgs),
    /// Row count, date range and per-column summary.
    Info(DatasetArgs),
    /// Missing values per column.
    Nulls(DatasetArgs),
    /// Unique symbols, optionally for a single series.
    Symbols(SymbolsArgs),
    /// Rows inside a date range ordered by one or two price columns.
    Sort(SortArgs),
    /// Per-symbol series of one price column, as plotted by a chart.
    Plot(PlotArgs),
    /// Daily (or cumulative) returns of one symbol.
    Returns(ReturnsArgs),
    /// Closing price with moving averages over several windows.
    MovingAverage(MovingAverageArgs),
    /// Pull a symbol's history out of the archive directory into the dataset.
    Extract(ExtractArgs),
}

impl Commands {
    /// Splits into the dataset preparation flags and the session command to run.
    fn into_parts(self) -> (DatasetArgs, Option<Command>) {
        match self {
            Commands::Master(dataset) => (dataset, None),
            Commands::Info(dataset) => (dataset, Some(Command::Info)),
            Commands::Nulls(dataset) => (dataset, Some(Command::NullCounts)),
            Commands::Symbols(args) => (args.dataset, Some(Command::Symbols { series: args.series })),
            Commands::Sort(args) => {
                let request = RangeSort::new(args.by, !args.descending).between(args.range.from, args.range.to);
                (args.dataset, Some(Command::SortRange(request)))
            }
            Commands::Plot(args) => {
                let request = SeriesRequest {
                    start: args.range.from,
                    end: args.range.to,
                    symbols: args.symbol,
                    column: args.column,
                };
                (args.dataset, Some(Command::ChartSeries(request)))
            }
            Commands::Returns(args) => {
                let (symbol, start, end) = (args.symbol, args.range.from, args.range.to);
                let command = if args.cumulative {
                    Command::CumulativeReturns { symbol, start, end }
                } else {
                    Command::DailyReturns { symbol, start, end }
                };
                (args.dataset, Some(command))
            }
            Commands::MovingAverage(args) => {
                let windows = if args.window.is_empty() {
                    MaWindow::NAMED.to_vec()
                } else {
                    args.window
                };
                let command = Command::MovingAverages {
                    symbol: args.symbol,
                    start: args.range.from,
                    end: args.range.to,
                    windows,
                };
                (args.dataset, Some(command))
            }
            Commands::Extract(args) => {
                let command = Command::ExtractMoreData {
                    symbol: args.symbol,
                    deduplicate: args.dataset.dedup,
                };
                (args.dataset, Some(command))
            }
        }
    }
}

/// The files that make up the master dataset and how to clean them.
#[derive(Args)]
struct DatasetArgs {
    /// Bhavcopy CSV files, e.g. 20240101_NSE.csv.
    files: Vec<PathBuf>,

    /// Keep TIMESTAMP as a plain column instead of converting it to dates.
    #[arg(long)]
    raw: bool,

    /// Drop rows with missing values (missing SERIES is filled with NONE first).
    #[arg(long)]
    drop_nulls: bool,

    /// Remove exact-duplicate rows.
    #[arg(long)]
    dedup: bool,
}

#[derive(Args)]
struct DateRangeArgs {
    /// First date to include (YYYY-MM-DD); defaults to the earliest in the data.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last date to include (YYYY-MM-DD); defaults to the latest in the data.
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Args)]
struct SymbolsArgs {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Only symbols traded in this series, e.g. EQ.
    #[arg(long)]
    series: Option<String>,
}

#[derive(Args)]
struct SortArgs {
    #[command(flatten)]
    dataset: DatasetArgs,

    #[command(flatten)]
    range: DateRangeArgs,

    /// Sort column; repeat once for a tie-breaker.
    #[arg(long, required = true, value_parser = PossibleValuesParser::new(PRICE_COLUMNS))]
    by: Vec<String>,

    #[arg(long)]
    descending: bool,
}

#[derive(Args)]
struct PlotArgs {
    #[command(flatten)]
    dataset: DatasetArgs,

    #[command(flatten)]
    range: DateRangeArgs,

    /// Symbols to chart; repeat for several.
    #[arg(long, required = true)]
    symbol: Vec<String>,

    #[arg(long, default_value = CLOSE, value_parser = PossibleValuesParser::new(PRICE_COLUMNS))]
    column: String,
}

#[derive(Args)]
struct ReturnsArgs {
    #[command(flatten)]
    dataset: DatasetArgs,

    #[command(flatten)]
    range: DateRangeArgs,

    #[arg(long)]
    symbol: String,

    /// Compound the daily returns into cumulative growth.
    #[arg(long)]
    cumulative: bool,
}

#[derive(Args)]
struct MovingAverageArgs {
    #[command(flatten)]
    dataset: DatasetArgs,

    #[command(flatten)]
    range: DateRangeArgs,

    #[arg(long)]
    symbol: String,

    /// "1 W", "1 M", "3 M", "6 M", "1 Y" or a row count; repeatable. Defaults to all named windows.
    #[arg(long)]
    window: Vec<MaWindow>,
}

#[derive(Args)]
struct ExtractArgs {
    #[command(flatten)]
    dataset: DatasetArgs,

    #[arg(long)]
    symbol: String,
}

// ==============================================================================
// Dataset Preparation
// ==============================================================================

/// Upload, merge and clean the given files ahead of the requested command.
fn prepare(session: &mut Session, args: &DatasetArgs) -> anyhow::Result<()> {
    if args.files.is_empty() {
        return Ok(());
    }

    let files = args
        .files
        .iter()
        .map(|path| UploadedFile::from_path(path))
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to read input files")?;

    let mut steps = vec![("upload", Command::Upload(files)), ("merge", Command::CreateMaster)];
    if !args.raw {
        steps.push(("TIMESTAMP conversion", Command::NormalizeTimestamps));
    }
    if args.drop_nulls {
        steps.push(("null drop", Command::DropNulls));
    }
    if args.dedup {
        steps.push(("de-duplication", Command::Deduplicate));
    }

    for (name, step) in steps {
        let outcome = session
            .try_execute(step)
            .with_context(|| format!("Dataset preparation failed at {name}"))?;
        tracing::debug!(step = name, ?outcome, "Preparation step complete.");
    }
    Ok(())
}
