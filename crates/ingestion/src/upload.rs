use crate::error::IngestError;
use crate::reader::read_csv;
use core_types::RowSet;
use std::path::Path;

/// A file handed to the tool, held in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// Row-sets parsed from uploads that share one ingestion label.
#[derive(Debug, Clone)]
pub struct LabeledRowSet {
    pub label: String,
    pub rows: RowSet,
}

impl UploadedFile {
    pub fn from_bytes(file_name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            contents: contents.into(),
        }
    }

    /// Reads the whole file; the handle is closed before this returns.
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let contents = std::fs::read(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            file_name,
            contents,
        })
    }

    pub fn label(&self) -> &str {
        ingestion_label(&self.file_name)
    }
}

/// The part of the base file name before the first `_`, e.g. `20240101` for
/// `20240101_data.csv`. Names without `_` are their own label.
pub fn ingestion_label(file_name: &str) -> &str {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_name);
    base.split('_').next().unwrap_or(base)
}

/// Parses every upload independently and groups the results by label.
///
/// Groups keep the order in which their label first appeared; uploads that
/// share a label are concatenated inside their group in upload order.
pub fn parse_uploads(files: &[UploadedFile]) -> Result<Vec<LabeledRowSet>, IngestError> {
    let mut groups: Vec<LabeledRowSet> = Vec::new();

    for file in files {
        let rows = read_csv(&file.file_name, file.contents.as_slice())?;
        let label = file.label();
        tracing::info!(file = %file.file_name, label, rows = rows.len(), "Parsed upload.");

        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.rows.append(rows)?,
            None => groups.push(LabeledRowSet {
                label: label.to_string(),
                rows,
            }),
        }
    }

    Ok(groups)
}

/// Concatenates all groups into one row-set with a fresh sequential index.
///
/// The labels are dropped. No groups yields an empty row-set.
pub fn concat(groups: Vec<LabeledRowSet>) -> Result<RowSet, IngestError> {
    let mut merged = RowSet::default();
    for group in groups {
        merged.append(group.rows)?;
    }
    Ok(merged)
}
