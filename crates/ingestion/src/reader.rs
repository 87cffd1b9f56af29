use crate::error::IngestError;
use core_types::{is_null_token, Record, RowSet};
use csv::{ReaderBuilder, Trim};
use std::io::Read;

/// Parses one headered, comma-separated stream into a row-set.
///
/// `name` only labels errors. Header names are trimmed, cell text is kept as
/// read. Header cells that are blank (bhavcopy rows end
/// with a trailing comma) are dropped with their values, and repeated header
/// names get a `.1`, `.2`, ... suffix. Ragged rows are padded with missing cells.
pub fn read_csv<R: Read>(name: &str, reader: R) -> Result<RowSet, IngestError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|source| IngestError::Csv {
            name: name.to_string(),
            source,
        })?
        .clone();

    let kept: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.is_empty())
        .map(|(i, _)| i)
        .collect();
    if kept.is_empty() {
        return Err(IngestError::MissingHeader(name.to_string()));
    }

    let mut columns: Vec<String> = Vec::with_capacity(kept.len());
    for &i in &kept {
        columns.push(dedupe_header(&columns, &headers[i]));
    }

    let mut rows = RowSet::new(columns);
    for result in rdr.records() {
        let record = result.map_err(|source| IngestError::Csv {
            name: name.to_string(),
            source,
        })?;
        let cells = kept
            .iter()
            .map(|&i| {
                record
                    .get(i)
                    .filter(|v| !is_null_token(v))
                    .map(str::to_string)
            })
            .collect();
        rows.push(Record::new(cells));
    }

    tracing::debug!(source = name, rows = rows.len(), "Parsed CSV source.");
    Ok(rows)
}

fn dedupe_header(existing: &[String], name: &str) -> String {
    if !existing.iter().any(|c| c == name) {
        return name.to_string();
    }
    let mut n = 1;
    loop {
        let candidate = format!("{name}.{n}");
        if !existing.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
