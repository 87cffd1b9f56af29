use crate::error::IngestError;
use crate::reader::read_csv;
use core_types::columns::SYMBOL;
use core_types::RowSet;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Observer for a running archive scan.
///
/// Purely observational: the scan always runs to completion.
pub trait ScanProgress {
    fn started(&mut self, _total: usize) {}
    fn archive_done(&mut self, _processed: usize, _total: usize, _archive: &Path) {}
    fn finished(&mut self, _scan: &ArchiveScan) {}
}

/// A `ScanProgress` that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ScanProgress for NoProgress {}

/// An archive or archive member that could not be ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    pub archive: PathBuf,
    pub member: Option<String>,
    pub reason: String,
}

/// The combined result of scanning every archive for one symbol.
#[derive(Debug, Clone, Default)]
pub struct ArchiveScan {
    pub rows: RowSet,
    /// Archives found in the directory.
    pub archives: usize,
    /// Members that matched the suffix, parsed and carried a `SYMBOL` column.
    pub members: usize,
    pub skipped: Vec<SkippedSource>,
}

/// Collects one symbol's end-of-day rows out of a directory of zip archives.
#[derive(Debug, Clone)]
pub struct ArchiveScanner {
    data_dir: PathBuf,
    member_suffix: String,
}

impl ArchiveScanner {
    pub fn new(data_dir: impl Into<PathBuf>, member_suffix: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            member_suffix: member_suffix.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Lists `*.zip` files in the data directory, sorted by file name.
    ///
    /// A missing directory is treated as holding no archives.
    pub fn list_archives(&self) -> Result<Vec<PathBuf>, IngestError> {
        let entries = match std::fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(dir = %self.data_dir.display(), "Archive directory does not exist.");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(IngestError::Io {
                    path: self.data_dir.clone(),
                    source,
                });
            }
        };

        let mut archives = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| IngestError::Io {
                path: self.data_dir.clone(),
                source,
            })?;
            let path = entry.path();
            let is_zip = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
            if is_zip && path.is_file() {
                archives.push(path);
            }
        }
        archives.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(archives)
    }

    /// Scans every archive and returns the rows whose `SYMBOL` equals `symbol`.
    pub fn scan(
        &self,
        symbol: &str,
        progress: &mut dyn ScanProgress,
    ) -> Result<ArchiveScan, IngestError> {
        let archives = self.list_archives()?;
        let total = archives.len();
        tracing::info!(
            dir = %self.data_dir.display(),
            archives = total,
            symbol,
            "Starting archive scan."
        );

        let mut scan = ArchiveScan {
            archives: total,
            ..ArchiveScan::default()
        };
        progress.started(total);

        for (i, path) in archives.iter().enumerate() {
            if let Err(e) = self.scan_archive(path, symbol, &mut scan) {
                tracing::warn!(archive = %path.display(), error = %e, "Skipping unreadable archive.");
                scan.skipped.push(SkippedSource {
                    archive: path.clone(),
                    member: None,
                    reason: e.to_string(),
                });
            }
            progress.archive_done(i + 1, total, path);
        }

        tracing::info!(
            rows = scan.rows.len(),
            members = scan.members,
            skipped = scan.skipped.len(),
            "Archive scan complete."
        );
        progress.finished(&scan);
        Ok(scan)
    }

    /// Errors returned here concern the archive as a whole; member-level
    /// failures are recorded in `scan.skipped` and the loop carries on.
    fn scan_archive(
        &self,
        path: &Path,
        symbol: &str,
        scan: &mut ArchiveScan,
    ) -> Result<(), IngestError> {
        let file = File::open(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut archive = ZipArchive::new(file)?;

        for index in 0..archive.len() {
            let member = match archive.by_index(index) {
                Ok(member) => member,
                Err(e) => {
                    self.skip_member(scan, path, format!("#{index}"), e.to_string());
                    continue;
                }
            };
            if member.is_dir() || !member.name().ends_with(&self.member_suffix) {
                continue;
            }

            let name = member.name().to_string();
            let mut rows = match read_csv(&name, member) {
                Ok(rows) => rows,
                Err(e) => {
                    self.skip_member(scan, path, name, e.to_string());
                    continue;
                }
            };
            let Some(symbol_idx) = rows.column_index(SYMBOL) else {
                self.skip_member(scan, path, name, "no SYMBOL column".to_string());
                continue;
            };
            scan.members += 1;
            rows.records_mut()
                .retain(|r| r.cell(symbol_idx) == Some(symbol));
            tracing::debug!(archive = %path.display(), member = %name, matched = rows.len(), "Scanned member.");

            if let Err(e) = scan.rows.append(rows) {
                self.skip_member(scan, path, name, e.to_string());
            }
        }
        Ok(())
    }

    fn skip_member(&self, scan: &mut ArchiveScan, archive: &Path, member: String, reason: String) {
        tracing::warn!(archive = %archive.display(), member = %member, %reason, "Skipping archive member.");
        scan.skipped.push(SkippedSource {
            archive: archive.to_path_buf(),
            member: Some(member),
            reason,
        });
    }
}
