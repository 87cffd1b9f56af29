use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive date range, used both as the dataset's min/max and as a query window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateBounds {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Fills unspecified ends from `self`.
    pub fn narrow(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> DateBounds {
        DateBounds {
            start: start.unwrap_or(self.start),
            end: end.unwrap_or(self.end),
        }
    }

    /// True when `start > end`, i.e. no date can fall inside.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Computes the min/max over a set of dates, or `None` when there are none.
    pub fn spanning<I>(dates: I) -> Option<DateBounds>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        dates.into_iter().fold(None, |acc, date| match acc {
            None => Some(DateBounds::new(date, date)),
            Some(b) => Some(DateBounds::new(b.start.min(date), b.end.max(date))),
        })
    }
}
