use crate::error::NormalizeError;
use chrono::{NaiveDate, NaiveDateTime};

/// Parses trading dates written in any of several formats.
///
/// Formats are `chrono` strftime patterns tried in order; the first that
/// consumes the whole value wins. Patterns containing a time component are
/// parsed as date-times and truncated to the date.
#[derive(Debug, Clone)]
pub struct TimestampParser {
    formats: Vec<String>,
}

impl TimestampParser {
    pub fn new(formats: Vec<String>) -> Result<Self, NormalizeError> {
        if formats.is_empty() {
            return Err(NormalizeError::NoFormats);
        }
        Ok(Self { formats })
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let value = raw.trim();
        self.formats.iter().find_map(|format| {
            NaiveDate::parse_from_str(value, format)
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(value, format)
                        .ok()
                        .map(|dt| dt.date())
                })
        })
    }
}
