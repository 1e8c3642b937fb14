// src/extract.rs
use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::consts::{STOP_CONTAINS, STOP_PREFIXES};
use crate::config::options::ParseOptions;
use crate::core::sanitize::content_lines;
use crate::specs::dates::{self, DateToken};
use crate::specs::line::{self, AlignmentQuality, LineOutcome, ResultValue};

pub type DateValues = BTreeMap<DateToken, ResultValue>;

/// canonical test name → date → value. Only discovered dates appear as keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultMapping {
    tests: BTreeMap<&'static str, DateValues>,
}

impl ResultMapping {
    pub fn new() -> Self { Self::default() }

    /// Last write wins: a later row for the same test replaces the earlier one.
    pub fn insert(&mut self, name: &'static str, values: DateValues) -> Option<DateValues> {
        self.tests.insert(name, values)
    }

    pub fn get(&self, name: &str) -> Option<&DateValues> { self.tests.get(name) }
    pub fn len(&self) -> usize { self.tests.len() }
    pub fn is_empty(&self) -> bool { self.tests.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &DateValues)> {
        self.tests.iter().map(|(k, v)| (*k, v))
    }

    /// Convenience for printing/tests: value text for (test, date).
    pub fn value(&self, name: &str, date: &str) -> Option<&str> {
        self.tests
            .get(name)?
            .iter()
            .find(|(d, _)| d.as_str() == date)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// A "Comment…"/"End…"/"www." footer line, with its index in content lines.
    Marker(usize),
    EndOfText,
}

/// What the assembler saw on the way to the mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extraction {
    pub mapping: ResultMapping,
    /// Index (in trimmed non-empty lines) of the header/legend line, if found.
    pub header_line: Option<usize>,
    pub data_start: usize,
    pub lines_seen: usize,
    pub rejected: usize,
    /// Lines that parsed but whose values may sit in the wrong columns.
    pub suspect: Vec<String>,
    pub stop: StopReason,
}

/// Build the full mapping from recognized text.
pub fn assemble(text: &str, dates: &[DateToken]) -> ResultMapping {
    assemble_with(text, dates, &ParseOptions::default()).mapping
}

pub fn assemble_with(text: &str, dates: &[DateToken], opts: &ParseOptions) -> Extraction {
    let lines = content_lines(text);

    let header_line = find_header_line(&lines, dates, opts.min_header_dates);
    let data_start = match header_line {
        Some(i) => i + opts.header_skip,
        None => {
            debug!("no header line with {} dates; scanning from the top", opts.min_header_dates);
            0
        }
    };

    let mut out = Extraction {
        mapping: ResultMapping::new(),
        header_line,
        data_start,
        lines_seen: 0,
        rejected: 0,
        suspect: Vec::new(),
        stop: StopReason::EndOfText,
    };

    for (ix, line) in lines.iter().enumerate().skip(data_start) {
        if is_stop_line(line) {
            debug!(line = %line, "stop marker");
            out.stop = StopReason::Marker(ix);
            break;
        }
        out.lines_seen += 1;

        match line::classify_line(line, dates) {
            LineOutcome::Parsed(parsed) => {
                if parsed.alignment.quality() == AlignmentQuality::Suspect {
                    warn!(
                        test = parsed.name,
                        skipped = ?parsed.alignment.skipped,
                        overflow = ?parsed.alignment.overflow,
                        "values may be misaligned: {}", line
                    );
                    out.suspect.push(s!(*line));
                }
                if out.mapping.insert(parsed.name, parsed.values).is_some() {
                    debug!(test = parsed.name, "later row replaced earlier values");
                }
            }
            other => {
                debug!(outcome = ?other, line = %line, "not a result row");
                out.rejected += 1;
            }
        }
    }

    out
}

/// First line holding at least `min` of the known dates.
fn find_header_line(lines: &[&str], dates: &[DateToken], min: usize) -> Option<usize> {
    lines.iter().position(|l| dates::count_in_line(dates, l) >= min)
}

pub fn is_stop_line(line: &str) -> bool {
    let lc = line.to_lowercase();
    STOP_PREFIXES.iter().any(|p| lc.starts_with(p)) || lc.contains(STOP_CONTAINS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
CITY PATHOLOGY
Patient: DOE, JANE
Test Units 01/02/23 05/03/23
Reference
Range
Sodium 140 H142
Potassium 4.1 4.3
Zinc 12 13
Comments: none of the above
Chloride 101 99
";

    fn dates() -> Vec<DateToken> { dates::extract_dates(REPORT, 6) }

    #[test]
    fn reads_rows_after_header_and_stops_at_comments() {
        let ds = dates();
        let ex = assemble_with(REPORT, &ds, &ParseOptions::default());
        assert_eq!(ex.header_line, Some(2));
        assert_eq!(ex.data_start, 5);
        assert_eq!(ex.mapping.len(), 2);
        assert_eq!(ex.mapping.value("Sodium", "05/03/23"), Some("H142"));
        assert_eq!(ex.mapping.value("Potassium", "01/02/23"), Some("4.1"));
        assert!(ex.mapping.get("Chloride").is_none());
        assert_eq!(ex.rejected, 1); // Zinc
        assert_eq!(ex.stop, StopReason::Marker(8));
    }

    #[test]
    fn header_skip_is_configurable() {
        let ds = dates();
        let opts = ParseOptions { header_skip: 4, ..ParseOptions::default() };
        let ex = assemble_with(REPORT, &ds, &opts);
        // Skipping one more line drops Sodium.
        assert!(ex.mapping.get("Sodium").is_none());
        assert!(ex.mapping.get("Potassium").is_some());
    }

    #[test]
    fn no_header_scans_everything() {
        let text = "Sodium 140\nUrea 5.1\nEnd of report\nAlbumin 40";
        let ds = vec![DateToken::from("01/02/23")];
        let ex = assemble_with(text, &ds, &ParseOptions::default());
        assert_eq!(ex.header_line, None);
        assert_eq!(ex.data_start, 0);
        assert_eq!(ex.mapping.len(), 2);
        assert!(ex.mapping.get("Albumin").is_none());
    }

    #[test]
    fn later_rows_overwrite_earlier() {
        let text = "Sodium 140\nSodium 150";
        let ds = vec![DateToken::from("01/02/23")];
        let m = assemble(text, &ds);
        assert_eq!(m.value("Sodium", "01/02/23"), Some("150"));
    }

    #[test]
    fn stop_markers() {
        assert!(is_stop_line("Comments: none of the above"));
        assert!(is_stop_line("END OF REPORT"));
        assert!(is_stop_line("Visit www.citypath.example for ranges"));
        assert!(!is_stop_line("Sodium 140"));
    }

    #[test]
    fn suspect_rows_are_kept_and_listed() {
        let text = "Urea 5.2 ** 6.1";
        let ds = vec![DateToken::from("01/02/23"), DateToken::from("05/03/23")];
        let ex = assemble_with(text, &ds, &ParseOptions::default());
        assert_eq!(ex.mapping.value("Urea", "01/02/23"), Some("5.2"));
        assert_eq!(ex.suspect, vec![s!("Urea 5.2 ** 6.1")]);
    }
}
