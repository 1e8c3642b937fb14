// src/specs/dates.rs
//! Date header extraction.
//!
//! Dates are kept as the literal text the report printed (`01/02/23`); they are
//! column identities, not calendar values.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Priority order matters: the strict two-digit forms win over the catch-all,
/// so their discovery order decides column order.
static DATE_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"\b\d{2}/\d{2}/\d{2}\b").expect("DD/MM/YY pattern"),
        Regex::new(r"\b\d{2}/\d{2}/\d{4}\b").expect("DD/MM/YYYY pattern"),
        Regex::new(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b").expect("D/M/Y pattern"),
    ]
});

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateToken(String);

impl DateToken {
    pub fn new(s: impl Into<String>) -> Self { Self(s.into()) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for DateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DateToken {
    fn as_ref(&self) -> &str { &self.0 }
}

impl From<&str> for DateToken {
    fn from(s: &str) -> Self { Self::new(s) }
}

/// All date tokens in `text`, pattern by pattern, first occurrence wins,
/// capped at `max`. Empty when nothing date-shaped is present.
pub fn extract_dates(text: &str, max: usize) -> Vec<DateToken> {
    let mut out: Vec<DateToken> = Vec::new();
    for re in DATE_PATTERNS.iter() {
        for m in re.find_iter(text) {
            if out.len() >= max { return out; }
            if !out.iter().any(|d| d.as_str() == m.as_str()) {
                out.push(DateToken::new(m.as_str()));
            }
        }
    }
    out
}

/// Position of `date` in the discovered sequence.
pub fn index_of(dates: &[DateToken], date: &str) -> Option<usize> {
    dates.iter().position(|d| d.as_str() == date)
}

/// How many of `dates` appear verbatim inside `line`.
pub fn count_in_line(dates: &[DateToken], line: &str) -> usize {
    dates.iter().filter(|d| line.contains(d.as_str())).count()
}
