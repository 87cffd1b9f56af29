use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use configuration::OutputFormat;
use core_types::columns::TIMESTAMP;
use core_types::{CellKind, RowSet};
use rust_decimal::Decimal;
use session::{Outcome, ReturnKind};
use std::io::{self, Write};

/// A flat, printable view of an outcome.
struct Report {
    /// Lines shown above the table; omitted from CSV and JSON.
    notes: Vec<String>,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Report {
    fn new<H: Into<String>>(header: impl IntoIterator<Item = H>) -> Self {
        Self {
            notes: Vec::new(),
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    fn note(mut self, line: impl Into<String>) -> Self {
        self.notes.push(line.into());
        self
    }

    fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }
}

/// Writes `outcome` to stdout in `format`. Status notices go to stderr.
pub fn render(outcome: &Outcome, format: OutputFormat) -> anyhow::Result<()> {
    if let Outcome::Status(message) = outcome {
        eprintln!("{message}");
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if format == OutputFormat::Json {
        let value = match outcome {
            Outcome::Info(info) => serde_json::to_value(info)?,
            Outcome::Series(series) => serde_json::to_value(series)?,
            Outcome::Returns { points, .. } => serde_json::to_value(points)?,
            Outcome::Overlay(overlay) => serde_json::to_value(overlay)?,
            other => objects(&report(other)),
        };
        serde_json::to_writer_pretty(&mut out, &value)?;
        writeln!(out)?;
        return Ok(());
    }

    let report = report(outcome);
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(&report.header)?;
            for row in &report.rows {
                writer.write_record(row)?;
            }
            writer.flush().context("Failed to write CSV output")?;
        }
        _ => {
            for line in &report.notes {
                writeln!(out, "{line}")?;
            }
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(report.header);
            for row in report.rows {
                table.add_row(row);
            }
            writeln!(out, "{table}")?;
        }
    }
    Ok(())
}

fn objects(report: &Report) -> serde_json::Value {
    let rows = report
        .rows
        .iter()
        .map(|row| {
            let object = report
                .header
                .iter()
                .cloned()
                .zip(row.iter().cloned().map(serde_json::Value::String))
                .collect::<serde_json::Map<_, _>>();
            serde_json::Value::Object(object)
        })
        .collect();
    serde_json::Value::Array(rows)
}

fn decimal(value: Decimal) -> String {
    value.round_dp(6).normalize().to_string()
}

fn report(outcome: &Outcome) -> Report {
    match outcome {
        Outcome::Uploaded(groups) => {
            let mut report = Report::new(["label", "rows"]);
            for group in groups {
                report.row(vec![group.label.clone(), group.rows.to_string()]);
            }
            report
        }
        Outcome::MasterCreated { rows, columns } => {
            let mut report = Report::new(["rows", "columns"]);
            report.row(vec![rows.to_string(), columns.to_string()]);
            report
        }
        Outcome::Info(info) => {
            let mut report = Report::new(["column", "non_null", "kind"]).note(format!("Rows: {}", info.rows));
            if let Some(bounds) = info.bounds {
                report = report.note(format!("Dates: {} to {}", bounds.start, bounds.end));
            } else if !info.indexed {
                report = report.note("Dates: TIMESTAMP not converted");
            }
            for column in &info.columns {
                let kind = match column.kind {
                    CellKind::Numeric => "numeric",
                    CellKind::Text => "text",
                };
                report.row(vec![column.name.clone(), column.non_null.to_string(), kind.to_string()]);
            }
            report
        }
        Outcome::NullCounts(counts) => {
            let mut report = Report::new(["column", "missing"]);
            for (column, missing) in counts {
                report.row(vec![column.clone(), missing.to_string()]);
            }
            report
        }
        Outcome::NullsDropped(summary) => {
            let mut report = Report::new(["series_filled", "rows_dropped"]);
            report.row(vec![summary.filled_series.to_string(), summary.dropped.to_string()]);
            report
        }
        Outcome::Normalized(normalization) => {
            let state = if normalization.applied() { "indexed" } else { "unchanged" };
            let mut report = Report::new(["state", "start", "end"]);
            let (start, end) = normalization
                .bounds()
                .map(|b| (b.start.to_string(), b.end.to_string()))
                .unwrap_or_default();
            report.row(vec![state.to_string(), start, end]);
            report
        }
        Outcome::Deduplicated { removed } => {
            let mut report = Report::new(["duplicates_removed"]);
            report.row(vec![removed.to_string()]);
            report
        }
        Outcome::Symbols(symbols) => {
            let mut report = Report::new(["SYMBOL"]);
            for symbol in symbols {
                report.row(vec![symbol.clone()]);
            }
            report
        }
        Outcome::Table(rows) => row_set(rows),
        Outcome::Series(series) => {
            let mut report = Report::new(["symbol", "date", "value"]);
            for s in series {
                for point in &s.points {
                    report.row(vec![s.symbol.clone(), point.date.to_string(), decimal(point.value)]);
                }
            }
            report
        }
        Outcome::Returns { kind, points } => {
            let label = match kind {
                ReturnKind::Daily => "daily_return",
                ReturnKind::Cumulative => "cumulative_return",
            };
            let mut report = Report::new(["date", "symbol", "series", label]);
            for point in points {
                report.row(vec![
                    point.date.to_string(),
                    point.symbol.clone(),
                    point.series.clone().unwrap_or_default(),
                    decimal(point.value),
                ]);
            }
            report
        }
        Outcome::Overlay(overlay) => {
            let mut header = vec!["date".to_string(), "close".to_string()];
            header.extend(overlay.averages.iter().map(|s| format!("{} ({})", s.label, s.color)));
            let mut report = Report::new(header).note(format!("Symbol: {}", overlay.symbol));
            for (i, price) in overlay.actual.iter().enumerate() {
                let mut row = vec![price.date.to_string(), decimal(price.close)];
                row.extend(overlay.averages.iter().map(|s| {
                    s.points
                        .get(i)
                        .and_then(|p| p.value)
                        .map(decimal)
                        .unwrap_or_default()
                }));
                report.row(row);
            }
            report
        }
        Outcome::Extracted {
            added,
            removed,
            archives,
            skipped,
            bounds,
        } => {
            let mut report = Report::new(["archives", "rows_added", "duplicates_removed", "skipped"]);
            if let Some(b) = bounds {
                report = report.note(format!("Dates: {} to {}", b.start, b.end));
            }
            for source in skipped {
                let member = source.member.as_deref().unwrap_or("*");
                report = report.note(format!(
                    "Skipped {} [{member}]: {}",
                    source.archive.display(),
                    source.reason
                ));
            }
            report.row(vec![
                archives.to_string(),
                added.to_string(),
                removed.to_string(),
                skipped.len().to_string(),
            ]);
            report
        }
        Outcome::Status(message) => {
            let mut report = Report::new(["status"]);
            report.row(vec![message.clone()]);
            report
        }
    }
}

/// The index, when present, is shown as a leading `TIMESTAMP` column.
fn row_set(rows: &RowSet) -> Report {
    let indexed = rows.is_indexed();
    let mut header = Vec::with_capacity(rows.columns().len() + 1);
    if indexed {
        header.push(TIMESTAMP.to_string());
    }
    header.extend(rows.columns().iter().cloned());

    let mut report = Report::new(header);
    if rows.is_empty() {
        report = report.note("No rows.");
    }
    for record in rows.records() {
        let mut cells = Vec::with_capacity(rows.columns().len() + 1);
        if indexed {
            cells.push(record.key.map(|k| k.to_string()).unwrap_or_default());
        }
        cells.extend(record.cells.iter().map(|c| c.clone().unwrap_or_default()));
        report.row(cells);
    }
    report
}
