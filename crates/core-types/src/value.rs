use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::str::FromStr;

/// Cell contents treated as missing, in addition to the empty string.
const NULL_TOKENS: [&str; 10] = [
    "NA", "N/A", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "#N/A", "<NA>",
];

pub fn is_null_token(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || NULL_TOKENS.contains(&trimmed)
}

/// Parses a cell as a decimal, accepting plain and scientific notation.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// The comparable form of a cell. Numbers order before text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortValue<'a> {
    Number(Decimal),
    Text(&'a str),
}

impl<'a> SortValue<'a> {
    pub fn from_cell(cell: Option<&'a str>) -> Option<SortValue<'a>> {
        let raw = cell?;
        Some(match parse_decimal(raw) {
            Some(number) => SortValue::Number(number),
            None => SortValue::Text(raw),
        })
    }
}

impl Ord for SortValue<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for SortValue<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
