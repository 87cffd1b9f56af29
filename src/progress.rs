use indicatif::{ProgressBar, ProgressStyle};
use ingestion::{ArchiveScan, ScanProgress};
use std::path::Path;

/// Draws the archive scan as a terminal progress bar.
pub struct ScanProgressBar {
    bar: ProgressBar,
}

impl ScanProgressBar {
    pub fn new() -> anyhow::Result<Self> {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
                .progress_chars("#>-"),
        );
        Ok(Self { bar })
    }
}

impl ScanProgress for ScanProgressBar {
    fn started(&mut self, total: usize) {
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
    }

    fn archive_done(&mut self, processed: usize, _total: usize, archive: &Path) {
        if let Some(name) = archive.file_name() {
            self.bar.set_message(format!("Done {}", name.to_string_lossy()));
        }
        self.bar.set_position(processed as u64);
    }

    fn finished(&mut self, scan: &ArchiveScan) {
        self.bar.finish_with_message(format!(
            "Scan complete: {} rows from {} members",
            scan.rows.len(),
            scan.members
        ));
    }
}
