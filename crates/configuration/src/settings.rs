use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ingestion: IngestionSettings,
    pub normalizer: NormalizerSettings,
    pub analytics: AnalyticsSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

/// Where archives live and which members count as end-of-day files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestionSettings {
    /// Directory scanned for `*.zip` archives, relative to the working directory.
    pub data_dir: PathBuf,
    /// Only archive members whose name ends with this suffix are ingested.
    pub member_suffix: String,
}

/// Date formats tried, in order, when parsing the `TIMESTAMP` column.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizerSettings {
    pub date_formats: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Colours assigned to moving-average series; cycled when exhausted.
    pub palette: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is not set (e.g. "info", "ingestion=debug").
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            member_suffix: "_NSE.csv".to_string(),
        }
    }
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        // Day-first throughout: bhavcopy exporters never emit month-first dates.
        let formats = [
            "%d-%b-%Y",
            "%Y-%m-%d",
            "%d-%m-%Y",
            "%d/%m/%Y",
            "%Y/%m/%d",
            "%d %b %Y",
            "%Y%m%d",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%dT%H:%M:%S",
            "%d-%b-%Y %H:%M:%S",
        ];
        Self {
            date_formats: formats.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        let palette = ["red", "green", "orange", "purple", "brown", "pink", "gray"];
        Self {
            palette: palette.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "bhavscope.log".to_string(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ingestion.member_suffix.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "ingestion.member_suffix must not be empty".to_string(),
            ));
        }
        if self.normalizer.date_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "normalizer.date_formats must list at least one format".to_string(),
            ));
        }
        if self.analytics.palette.is_empty() {
            return Err(ConfigError::ValidationError(
                "analytics.palette must list at least one colour".to_string(),
            ));
        }
        if self.logging.file_prefix.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.file_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
