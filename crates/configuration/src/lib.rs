use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use settings::{
    AnalyticsSettings, IngestionSettings, LoggingSettings, NormalizerSettings, OutputFormat,
    OutputSettings, Settings,
};

/// The file read when no explicit path is given. It may be absent.
pub const DEFAULT_CONFIG_FILE: &str = "bhavscope.toml";

/// Prefix for environment overrides, e.g. `BHAV__INGESTION__DATA_DIR=archives`.
pub const ENV_PREFIX: &str = "BHAV";

/// Loads the application settings.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file at `path`
/// (or `bhavscope.toml` when `None`, optional in that case), then `BHAV__*`
/// environment variables. The result is validated before it is returned.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(p) => config::File::from(p).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("normalizer.date_formats")
                .with_list_parse_key("analytics.palette")
                .try_parsing(true),
        )
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}
