use analytics::MaWindow;
use chrono::NaiveDate;
use configuration::Settings;
use core_types::DateBounds;
use ingestion::{ArchiveScan, ScanProgress, UploadedFile};
use normalizer::Normalization;
use query::{RangeSort, SeriesRequest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use session::{Command, Outcome, ReturnKind, Session, SessionError};
use std::cell::RefCell;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;
use zip::write::SimpleFileOptions;

const HEADER: &str = "SYMBOL,SERIES,OPEN,HIGH,LOW,CLOSE,LAST,PREVCLOSE,TOTTRDQTY,TOTTRDVAL,TIMESTAMP,TOTALTRADES,ISIN,";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn bhavcopy(day: &str, rows: &[(&str, &str)]) -> String {
    let mut text = format!("{HEADER}\n");
    for (symbol, close) in rows {
        text.push_str(&format!(
            "{symbol},EQ,{close},{close},{close},{close},{close},{close},100,1000,{day},10,INE000000000,\n"
        ));
    }
    text
}

fn five_symbols(day: &str) -> String {
    bhavcopy(
        day,
        &[("ABC", "10"), ("DEF", "20"), ("GHI", "30"), ("JKL", "40"), ("MNO", "50")],
    )
}

fn session() -> Session {
    Session::new(&Settings::default()).unwrap()
}

fn loaded(files: Vec<UploadedFile>) -> Session {
    let mut session = session();
    session.try_execute(Command::Upload(files)).unwrap();
    session.try_execute(Command::CreateMaster).unwrap();
    session.try_execute(Command::NormalizeTimestamps).unwrap();
    session
}

fn write_zip(path: &Path, members: &[(&str, &str)]) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, contents) in members {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

#[test]
fn two_daily_files_merge_and_normalize() {
    let mut session = session();
    let uploaded = session
        .try_execute(Command::Upload(vec![
            UploadedFile::from_bytes("20240101_data.csv", five_symbols("01-Jan-2024")),
            UploadedFile::from_bytes("20240102_data.csv", five_symbols("02-Jan-2024")),
        ]))
        .unwrap();
    let Outcome::Uploaded(groups) = uploaded else {
        panic!("unexpected outcome");
    };
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].label, "20240101");

    let created = session.try_execute(Command::CreateMaster).unwrap();
    assert!(matches!(created, Outcome::MasterCreated { rows: 10, .. }));
    // The trailing comma of each line does not become a column.
    assert_eq!(session.master().unwrap().columns().len(), 13);

    let normalized = session.try_execute(Command::NormalizeTimestamps).unwrap();
    let expected = DateBounds::new(date(2024, 1, 1), date(2024, 1, 2));
    assert!(matches!(
        normalized,
        Outcome::Normalized(Normalization::Applied { bounds: Some(b) }) if b == expected
    ));
    assert_eq!(session.bounds(), Some(expected));

    // A second conversion is a no-op.
    let again = session.try_execute(Command::NormalizeTimestamps).unwrap();
    assert!(matches!(again, Outcome::Normalized(Normalization::AlreadyIndexed { .. })));
    assert_eq!(session.master().unwrap().len(), 10);
}

#[test]
fn uploads_sharing_a_label_are_concatenated() {
    let mut session = session();
    let outcome = session
        .try_execute(Command::Upload(vec![
            UploadedFile::from_bytes("20240101_a.csv", five_symbols("01-Jan-2024")),
            UploadedFile::from_bytes("20240101_b.csv", five_symbols("01-Jan-2024")),
        ]))
        .unwrap();
    let Outcome::Uploaded(groups) = outcome else {
        panic!("unexpected outcome");
    };
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].rows, 10);

    session.try_execute(Command::CreateMaster).unwrap();
    session.try_execute(Command::NormalizeTimestamps).unwrap();
    let removed = session.try_execute(Command::Deduplicate).unwrap();
    assert!(matches!(removed, Outcome::Deduplicated { removed: 5 }));
}

#[test]
fn abc_daily_and_cumulative_returns() {
    let mut session = loaded(vec![
        UploadedFile::from_bytes("20240101_data.csv", bhavcopy("01-Jan-2024", &[("ABC", "100"), ("XYZ", "7")])),
        UploadedFile::from_bytes("20240103_data.csv", bhavcopy("03-Jan-2024", &[("ABC", "99")])),
        UploadedFile::from_bytes("20240102_data.csv", bhavcopy("02-Jan-2024", &[("ABC", "110")])),
    ]);

    let values = |outcome: Outcome| -> Vec<Decimal> {
        match outcome {
            Outcome::Returns { points, .. } => points.into_iter().map(|p| p.value).collect(),
            other => panic!("unexpected outcome: {other:?}"),
        }
    };

    let daily = session
        .try_execute(Command::DailyReturns {
            symbol: "ABC".into(),
            start: None,
            end: None,
        })
        .unwrap();
    assert!(matches!(daily, Outcome::Returns { kind: ReturnKind::Daily, .. }));
    assert_eq!(values(daily), vec![dec!(0.10), dec!(-0.10)]);

    let cumulative = session
        .try_execute(Command::CumulativeReturns {
            symbol: "ABC".into(),
            start: None,
            end: None,
        })
        .unwrap();
    assert_eq!(values(cumulative), vec![dec!(1.10), dec!(0.99)]);

    let single = session
        .try_execute(Command::DailyReturns {
            symbol: "XYZ".into(),
            start: None,
            end: None,
        })
        .unwrap();
    assert!(values(single).is_empty());
}

#[test]
fn decimal_overflow_becomes_a_status_notice() {
    let mut session = loaded(vec![
        UploadedFile::from_bytes("20240101_data.csv", bhavcopy("01-Jan-2024", &[("ABC", "0.0001")])),
        UploadedFile::from_bytes(
            "20240102_data.csv",
            bhavcopy("02-Jan-2024", &[("ABC", "79228162514264337593543950335")]),
        ),
    ]);

    let outcome = session.execute(Command::DailyReturns {
        symbol: "ABC".into(),
        start: None,
        end: None,
    });
    assert!(matches!(outcome, Outcome::Status(msg) if msg.contains("overflow")));
}

#[test]
fn moving_average_overlay_uses_palette() {
    let mut session = loaded(vec![
        UploadedFile::from_bytes("20240101_data.csv", bhavcopy("01-Jan-2024", &[("ABC", "1")])),
        UploadedFile::from_bytes("20240102_data.csv", bhavcopy("02-Jan-2024", &[("ABC", "2")])),
        UploadedFile::from_bytes("20240103_data.csv", bhavcopy("03-Jan-2024", &[("ABC", "6")])),
    ]);

    let outcome = session
        .try_execute(Command::MovingAverages {
            symbol: "ABC".into(),
            start: None,
            end: None,
            windows: vec![MaWindow::Rows(3), MaWindow::OneWeek],
        })
        .unwrap();
    let Outcome::Overlay(overlay) = outcome else {
        panic!("unexpected outcome");
    };
    assert_eq!(overlay.actual.len(), 3);
    assert_eq!(overlay.averages[0].color, "red");
    assert_eq!(overlay.averages[1].color, "green");
    assert_eq!(overlay.averages[0].points[2].value, Some(dec!(3)));
    assert!(overlay.averages[1].points.iter().all(|p| p.value.is_none()));
}

#[test]
fn sort_and_series_over_normalized_master() {
    let mut session = loaded(vec![
        UploadedFile::from_bytes("20240102_data.csv", bhavcopy("02-Jan-2024", &[("ABC", "12"), ("DEF", "8")])),
        UploadedFile::from_bytes("20240101_data.csv", bhavcopy("01-Jan-2024", &[("ABC", "10"), ("DEF", "9")])),
    ]);

    let sorted = session
        .try_execute(Command::SortRange(
            RangeSort::new(vec!["CLOSE".into()], false).between(Some(date(2024, 1, 2)), None),
        ))
        .unwrap();
    let Outcome::Table(table) = sorted else {
        panic!("unexpected outcome");
    };
    let symbol = table.column_index("SYMBOL").unwrap();
    let order: Vec<_> = table.records().iter().map(|r| r.cell(symbol).unwrap()).collect();
    assert_eq!(order, vec!["ABC", "DEF"]);

    let inverted = session
        .try_execute(Command::SortRange(
            RangeSort::new(vec!["CLOSE".into()], true).between(Some(date(2024, 1, 2)), Some(date(2024, 1, 1))),
        ))
        .unwrap();
    assert!(matches!(inverted, Outcome::Table(t) if t.is_empty()));

    let series = session
        .try_execute(Command::ChartSeries(SeriesRequest {
            start: None,
            end: None,
            symbols: vec!["ABC".into()],
            column: "CLOSE".into(),
        }))
        .unwrap();
    let Outcome::Series(series) = series else {
        panic!("unexpected outcome");
    };
    let closes: Vec<_> = series[0].points.iter().map(|p| p.value).collect();
    assert_eq!(closes, vec![dec!(10), dec!(12)]);
}

#[test]
fn missing_inputs_become_status_notices() {
    let mut session = session();

    assert!(matches!(session.try_execute(Command::CreateMaster), Err(SessionError::NoUploads)));
    assert!(matches!(session.try_execute(Command::Info), Err(SessionError::NoMaster)));
    assert!(matches!(session.execute(Command::NullCounts), Outcome::Status(_)));

    session
        .try_execute(Command::Upload(vec![UploadedFile::from_bytes(
            "20240101_data.csv",
            "SYMBOL,CLOSE\nABC,1\n",
        )]))
        .unwrap();
    session.try_execute(Command::CreateMaster).unwrap();
    assert!(matches!(
        session.try_execute(Command::NormalizeTimestamps),
        Err(SessionError::MissingColumn(c)) if c == "TIMESTAMP"
    ));

    let status = session.execute(Command::SortRange(RangeSort::new(vec!["CLOSE".into()], true)));
    assert!(matches!(status, Outcome::Status(msg) if msg.contains("TIMESTAMP")));
}

#[test]
fn unparseable_timestamp_leaves_master_untouched() {
    let mut session = session();
    session
        .try_execute(Command::Upload(vec![UploadedFile::from_bytes(
            "20240101_data.csv",
            "SYMBOL,TIMESTAMP,CLOSE\nABC,01-Jan-2024,1\nDEF,someday,2\n",
        )]))
        .unwrap();
    session.try_execute(Command::CreateMaster).unwrap();
    let before = session.master().unwrap().clone();

    let err = session.try_execute(Command::NormalizeTimestamps).unwrap_err();
    assert!(err.to_string().contains("someday"));
    assert_eq!(session.master().unwrap(), &before);
    assert_eq!(session.bounds(), None);
}

#[test]
fn drop_nulls_keeps_rows_missing_only_series() {
    let mut session = session();
    session
        .try_execute(Command::Upload(vec![UploadedFile::from_bytes(
            "20240101_data.csv",
            "SYMBOL,SERIES,CLOSE,TIMESTAMP\nABC,,1,01-Jan-2024\nDEF,EQ,,01-Jan-2024\nGHI,EQ,3,01-Jan-2024\n",
        )]))
        .unwrap();
    session.try_execute(Command::CreateMaster).unwrap();

    let Outcome::NullCounts(counts) = session.try_execute(Command::NullCounts).unwrap() else {
        panic!("expected null counts");
    };
    assert!(counts.contains(&("SERIES".to_string(), 1)));
    assert!(counts.contains(&("CLOSE".to_string(), 1)));

    let outcome = session.try_execute(Command::DropNulls).unwrap();
    assert!(matches!(outcome, Outcome::NullsDropped(r) if r.filled_series == 1 && r.dropped == 1));

    let Outcome::Symbols(symbols) = session.try_execute(Command::Symbols { series: Some("NONE".into()) }).unwrap() else {
        panic!("expected symbols");
    };
    assert_eq!(symbols, vec!["ABC"]);
}

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<(usize, usize)>>>);

impl ScanProgress for Recorder {
    fn archive_done(&mut self, processed: usize, total: usize, _archive: &Path) {
        self.0.borrow_mut().push((processed, total));
    }

    fn finished(&mut self, scan: &ArchiveScan) {
        self.0.borrow_mut().push((scan.members, scan.archives));
    }
}

#[test]
fn extract_from_single_archive_takes_only_matching_member() {
    let dir = tempfile::tempdir().unwrap();
    write_zip(
        &dir.path().join("2024.zip"),
        &[
            (
                "20240103_NSE.csv",
                bhavcopy("03-Jan-2024", &[("ABC", "99"), ("XYZ", "5")]).as_str(),
            ),
            ("20240103_BSE.csv", bhavcopy("03-Jan-2024", &[("ABC", "1")]).as_str()),
        ],
    );

    let mut settings = Settings::default();
    settings.ingestion.data_dir = dir.path().to_path_buf();
    let recorder = Recorder::default();
    let mut session = Session::new(&settings)
        .unwrap()
        .with_progress(Box::new(recorder.clone()));

    let outcome = session
        .try_execute(Command::ExtractMoreData {
            symbol: "ABC".into(),
            deduplicate: false,
        })
        .unwrap();
    assert!(matches!(
        outcome,
        Outcome::Extracted { added: 1, removed: 0, archives: 1, ref skipped, .. } if skipped.is_empty()
    ));

    // Without a master the extracted rows become it, un-normalized.
    let master = session.master().unwrap();
    assert_eq!(master.len(), 1);
    assert!(!master.is_indexed());
    let close = master.column_index("CLOSE").unwrap();
    assert_eq!(master.records()[0].cell(close), Some("99"));

    assert_eq!(*recorder.0.borrow(), vec![(1, 1), (1, 1)]);
}

#[test]
fn extract_into_indexed_master_normalizes_and_optionally_dedups() {
    let dir = tempfile::tempdir().unwrap();
    write_zip(
        &dir.path().join("a.zip"),
        &[("20240101_NSE.csv", bhavcopy("01-Jan-2024", &[("ABC", "100")]).as_str())],
    );
    write_zip(
        &dir.path().join("b.zip"),
        &[("20240102_NSE.csv", bhavcopy("02-Jan-2024", &[("ABC", "110")]).as_str())],
    );
    std::fs::write(dir.path().join("c.zip"), b"not a zip").unwrap();

    let mut settings = Settings::default();
    settings.ingestion.data_dir = dir.path().to_path_buf();
    let mut session = Session::new(&settings).unwrap();
    session
        .try_execute(Command::Upload(vec![UploadedFile::from_bytes(
            "20240101_data.csv",
            bhavcopy("01-Jan-2024", &[("ABC", "100")]),
        )]))
        .unwrap();
    session.try_execute(Command::CreateMaster).unwrap();
    session.try_execute(Command::NormalizeTimestamps).unwrap();

    let outcome = session
        .try_execute(Command::ExtractMoreData {
            symbol: "ABC".into(),
            deduplicate: true,
        })
        .unwrap();
    let Outcome::Extracted { added, removed, archives, skipped, bounds } = outcome else {
        panic!("unexpected outcome");
    };
    assert_eq!((added, removed, archives), (2, 1, 3));
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0].archive.ends_with("c.zip"));
    assert_eq!(bounds, Some(DateBounds::new(date(2024, 1, 1), date(2024, 1, 2))));

    let master = session.master().unwrap();
    assert!(master.is_indexed());
    assert_eq!(master.len(), 2);
}

#[test]
fn extract_with_empty_directory_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.ingestion.data_dir = dir.path().join("missing");
    let mut session = Session::new(&settings).unwrap();

    let outcome = session.execute(Command::ExtractMoreData {
        symbol: "ABC".into(),
        deduplicate: false,
    });
    assert!(matches!(outcome, Outcome::Extracted { added: 0, archives: 0, .. }));
    assert!(session.master().is_none());
}
