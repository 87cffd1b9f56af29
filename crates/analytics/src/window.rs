use crate::error::AnalyticsError;
use std::fmt;
use std::str::FromStr;

/// A moving-average window measured in trading rows.
///
/// The named durations are approximate trading-day counts, not calendar
/// conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaWindow {
    OneWeek,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    Rows(usize),
}

impl MaWindow {
    pub const NAMED: [MaWindow; 5] = [
        MaWindow::OneWeek,
        MaWindow::OneMonth,
        MaWindow::ThreeMonths,
        MaWindow::SixMonths,
        MaWindow::OneYear,
    ];

    pub fn rows(&self) -> usize {
        match self {
            MaWindow::OneWeek => 5,
            MaWindow::OneMonth => 22,
            MaWindow::ThreeMonths => 66,
            MaWindow::SixMonths => 132,
            MaWindow::OneYear => 264,
            MaWindow::Rows(n) => *n,
        }
    }

    pub fn label(&self) -> String {
        match self {
            MaWindow::OneWeek => "1 W".to_string(),
            MaWindow::OneMonth => "1 M".to_string(),
            MaWindow::ThreeMonths => "3 M".to_string(),
            MaWindow::SixMonths => "6 M".to_string(),
            MaWindow::OneYear => "1 Y".to_string(),
            MaWindow::Rows(n) => format!("{n} rows"),
        }
    }
}

impl fmt::Display for MaWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for MaWindow {
    type Err = AnalyticsError;

    /// Accepts `1 W`, `1 M`, `3 M`, `6 M`, `1 Y` (spacing and case ignored) or
    /// a positive row count.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();

        let window = match compact.as_str() {
            "1W" => MaWindow::OneWeek,
            "1M" => MaWindow::OneMonth,
            "3M" => MaWindow::ThreeMonths,
            "6M" => MaWindow::SixMonths,
            "1Y" => MaWindow::OneYear,
            other => match other.parse::<usize>() {
                Ok(0) => return Err(AnalyticsError::InvalidWindow),
                Ok(n) => MaWindow::Rows(n),
                Err(_) => return Err(AnalyticsError::UnknownDuration(s.to_string())),
            },
        };
        Ok(window)
    }
}
