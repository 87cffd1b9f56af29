//! # Bhavscope Ingestion
//!
//! Turns bhavcopy files into row-sets. Two entry points exist:
//!
//! - **Direct upload:** `UploadedFile`s are parsed independently, grouped by the
//!   label in front of the first `_` of their file name, and merged with `concat`.
//! - **Archive scan:** `ArchiveScanner` walks a directory of zip archives in
//!   lexicographic order and collects one symbol's rows from every member that
//!   ends with the configured suffix. Bad archives or members are skipped and
//!   reported, never fatal.
//!
//! No coercion happens here: cells keep their source text, only null tokens
//! are turned into missing values.

pub mod archive;
pub mod error;
pub mod reader;
pub mod upload;

pub use archive::{ArchiveScan, ArchiveScanner, NoProgress, ScanProgress, SkippedSource};
pub use error::IngestError;
pub use reader::read_csv;
pub use upload::{concat, ingestion_label, parse_uploads, LabeledRowSet, UploadedFile};
