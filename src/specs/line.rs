// src/specs/line.rs
//! One result row: `<test name words> <value> <value> ...`.
//!
//! Values pair with dates by position only. Whatever did not fit that pairing
//! is written down in [`Alignment`] instead of being dropped on the floor.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::consts::{MIN_LINE_LEN, UNKNOWN_MARKERS};
use crate::specs::dates::DateToken;
use crate::specs::names::{self, NameMatch};

static VALUE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[HL]?\d+\.?\d*$|^[<>]\d+\.?\d*$").expect("value token pattern")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Plain,
    High,
    Low,
    LessThan,
    GreaterThan,
    /// Explicit "Unkn"/"Unknown": the slot exists but holds nothing.
    Unknown,
}

/// A result cell exactly as printed. `H142` stays `H142`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultValue {
    raw: String,
    kind: ValueKind,
}

impl ResultValue {
    pub fn parse(token: &str) -> Option<Self> {
        if UNKNOWN_MARKERS.contains(&token) {
            return Some(Self::unknown());
        }
        if !is_value_token(token) {
            return None;
        }
        let kind = match token.as_bytes()[0] {
            b'H' => ValueKind::High,
            b'L' => ValueKind::Low,
            b'<' => ValueKind::LessThan,
            b'>' => ValueKind::GreaterThan,
            _ => ValueKind::Plain,
        };
        Some(Self { raw: s!(token), kind })
    }

    pub fn unknown() -> Self { Self { raw: s!(), kind: ValueKind::Unknown } }

    /// Text written into the template cell ("" for unknown).
    pub fn as_str(&self) -> &str { &self.raw }
    pub fn kind(&self) -> ValueKind { self.kind }
    pub fn is_flagged(&self) -> bool { matches!(self.kind, ValueKind::High | ValueKind::Low) }
}

pub fn is_value_token(token: &str) -> bool {
    VALUE_TOKEN.is_match(token)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlignmentQuality {
    /// Every date slot got a value or an explicit unknown, nothing left over.
    Exact,
    /// Fewer tokens than dates; the trailing dates have no value.
    Partial,
    /// Tokens were skipped or value-shaped tokens spilled past the last date.
    /// Columns may be shifted.
    Suspect,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Alignment {
    /// (date slot, token) for tokens that were neither a value nor unknown.
    pub skipped: Vec<(usize, String)>,
    /// Value-shaped tokens past the last date column.
    pub overflow: Vec<String>,
    pub slots_filled: usize,
    pub slots_total: usize,
}

impl Alignment {
    pub fn quality(&self) -> AlignmentQuality {
        if !self.skipped.is_empty() || !self.overflow.is_empty() {
            AlignmentQuality::Suspect
        } else if self.slots_filled < self.slots_total {
            AlignmentQuality::Partial
        } else {
            AlignmentQuality::Exact
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedLine {
    pub name: &'static str,
    pub values: BTreeMap<DateToken, ResultValue>,
    pub alignment: Alignment,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineOutcome {
    Parsed(ParsedLine),
    TooShort,
    NoValues,
    UnknownName(String),
    AmbiguousName { phrase: String, candidates: Vec<&'static str> },
}

impl LineOutcome {
    pub fn into_parsed(self) -> Option<ParsedLine> {
        match self { LineOutcome::Parsed(p) => Some(p), _ => None }
    }
}

/// Parse one line, or None if it is not a result row for a known test.
pub fn parse_line(line: &str, dates: &[DateToken]) -> Option<ParsedLine> {
    classify_line(line, dates).into_parsed()
}

/// Same as [`parse_line`] but says why a line was turned down.
pub fn classify_line(line: &str, dates: &[DateToken]) -> LineOutcome {
    if line.chars().count() < MIN_LINE_LEN {
        return LineOutcome::TooShort;
    }
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 2 {
        return LineOutcome::TooShort;
    }

    let Some(value_start) = parts.iter().position(|p| is_value_token(p)) else {
        return LineOutcome::NoValues;
    };

    let phrase = parts[..value_start].join(" ");
    let name = match names::resolve(&phrase) {
        NameMatch::Exact(c) | NameMatch::Partial { canonical: c, .. } => c,
        NameMatch::Ambiguous(candidates) => {
            debug!(phrase = %phrase, ?candidates, "ambiguous test name");
            return LineOutcome::AmbiguousName { phrase, candidates };
        }
        NameMatch::NoMatch => {
            debug!(phrase = %phrase, "unrecognized test name");
            return LineOutcome::UnknownName(phrase);
        }
    };

    let tokens = &parts[value_start..];
    let mut values = BTreeMap::new();
    let mut alignment = Alignment { slots_total: dates.len(), ..Alignment::default() };

    for (i, tok) in tokens.iter().enumerate() {
        if i >= dates.len() {
            alignment.overflow.extend(
                tokens[i..].iter().filter(|t| is_value_token(t)).map(|t| s!(*t)),
            );
            break;
        }
        match ResultValue::parse(tok) {
            Some(v) => {
                values.insert(dates[i].clone(), v);
                alignment.slots_filled += 1;
            }
            None => alignment.skipped.push((i, s!(*tok))),
        }
    }

    LineOutcome::Parsed(ParsedLine { name, values, alignment })
}
