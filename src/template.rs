// src/template.rs
//
// The destination sheet as a fixed schema, read from a workbook sheet or a CSV/TSV export:
//   Test | Unit | <date column> ...
//
// - Template: loaded once, never mutated by populate(); populate() works on a clone.
// - Row lookup is by canonical test name against the Test column:
//   exact (case-insensitive) beats substring; several substring hits are ambiguous.

use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use tracing::{debug, warn};

use crate::config::consts::{FIXED_COLUMNS, TEMPLATE_SHEET, TEST_COLUMN, WORKBOOK_EXTS};
use crate::config::options::ExportFormat;
use crate::csv::parse_rows;
use crate::error::{Error, Result};
use crate::extract::ResultMapping;
use crate::specs::dates::{index_of, DateToken};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateRow {
    pub test: String,
    pub unit: String,
    /// One cell per date column, always `date_columns.len()` long.
    pub cells: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    identity_header: String,
    unit_header: String,
    date_columns: Vec<String>,
    rows: Vec<TemplateRow>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowMatch {
    Exact(usize),
    Substring(usize),
    Ambiguous(Vec<usize>),
    Missing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    TestNotInTemplate { test: String },
    AmbiguousRow { test: String, rows: Vec<String> },
    /// More dates than the template has date columns; the extra dates have nowhere to go.
    DatesExceedColumns { dates: usize, columns: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::TestNotInTemplate { test } =>
                write!(f, "test '{}' not found in template", test),
            Diagnostic::AmbiguousRow { test, rows } =>
                write!(f, "test '{}' matches several template rows: {}", test, rows.join(", ")),
            Diagnostic::DatesExceedColumns { dates, columns } =>
                write!(f, "{} dates found but template has only {} date columns", dates, columns),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Populated {
    pub template: Template,
    pub diagnostics: Vec<Diagnostic>,
}

impl Template {
    /// Load the template, reading the default sheet when `path` is a workbook.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, TEMPLATE_SHEET)
    }

    /// Workbooks (xlsx/xls/ods) by sheet name; anything else as CSV/TSV
    /// with the delimiter taken from the extension.
    pub fn load_with(path: &Path, sheet: &str) -> Result<Self> {
        if is_workbook(path) {
            return Self::from_rows(read_sheet(path, sheet)?);
        }
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let sep = ExportFormat::from_path(path).delim();
        Self::from_rows(parse_rows(&text, sep))
    }

    /// First row is the header: `Test`, unit, then date columns.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::Template(s!("empty template")));
        }
        let header = rows.remove(0);
        if header.len() < FIXED_COLUMNS {
            return Err(Error::Template(format!(
                "expected at least {} columns, found {}", FIXED_COLUMNS, header.len()
            )));
        }
        if !header[0].trim().eq_ignore_ascii_case(TEST_COLUMN) {
            return Err(Error::Template(format!(
                "first column must be '{}', found '{}'", TEST_COLUMN, header[0].trim()
            )));
        }

        let width = header.len() - FIXED_COLUMNS;
        let mut out_rows = Vec::with_capacity(rows.len());
        for r in rows {
            if r.iter().all(|c| c.trim().is_empty()) { continue; }
            if r.iter().skip(FIXED_COLUMNS + width).any(|c| !c.trim().is_empty()) {
                warn!(
                    row = %r[0],
                    cells = r.len(),
                    columns = FIXED_COLUMNS + width,
                    "template row wider than its header; extra cells dropped"
                );
            }
            let mut it = r.into_iter();
            let test = it.next().unwrap_or_default();
            let unit = it.next().unwrap_or_default();
            let mut cells: Vec<String> = it.take(width).collect();
            cells.resize(width, s!());
            out_rows.push(TemplateRow { test, unit, cells });
        }

        let mut hdr = header.into_iter();
        let identity_header = hdr.next().unwrap_or_default();
        let unit_header = hdr.next().unwrap_or_default();

        Ok(Self { identity_header, unit_header, date_columns: hdr.collect(), rows: out_rows })
    }

    pub fn date_columns(&self) -> &[String] { &self.date_columns }
    pub fn rows(&self) -> &[TemplateRow] { &self.rows }

    pub fn row(&self, test: &str) -> Option<&TemplateRow> {
        match self.find_row(test) {
            RowMatch::Exact(i) | RowMatch::Substring(i) => self.rows.get(i),
            _ => None,
        }
    }

    /// Cell text for (test row, date column header).
    pub fn cell(&self, test: &str, column: &str) -> Option<&str> {
        let col = self.date_columns.iter().position(|c| c == column)?;
        self.row(test).map(|r| r.cells[col].as_str())
    }

    /// Rename date columns in order to the discovered dates. Only as many as
    /// both sides have; returns how many were renamed.
    pub fn relabel_dates(&mut self, dates: &[DateToken]) -> usize {
        let n = dates.len().min(self.date_columns.len());
        for (col, date) in self.date_columns.iter_mut().zip(dates) {
            *col = s!(date.as_str());
        }
        n
    }

    pub fn find_row(&self, test: &str) -> RowMatch {
        let needle = test.trim().to_lowercase();
        if needle.is_empty() {
            return RowMatch::Missing;
        }
        let mut hits = Vec::new();
        for (i, r) in self.rows.iter().enumerate() {
            let cell = r.test.trim().to_lowercase();
            if cell == needle {
                return RowMatch::Exact(i);
            }
            if cell.contains(&needle) {
                hits.push(i);
            }
        }
        match hits.len() {
            0 => RowMatch::Missing,
            1 => RowMatch::Substring(hits[0]),
            _ => RowMatch::Ambiguous(hits),
        }
    }

    /// Merge `mapping` into a copy of this template.
    pub fn populate(&self, mapping: &ResultMapping, dates: &[DateToken]) -> Populated {
        let mut out = self.clone();
        let mut diagnostics = Vec::new();

        let relabelled = out.relabel_dates(dates);
        if relabelled < dates.len() {
            warn!(dates = dates.len(), columns = relabelled, "more dates than template date columns");
            diagnostics.push(Diagnostic::DatesExceedColumns {
                dates: dates.len(),
                columns: out.date_columns.len(),
            });
        }

        for (test, values) in mapping.iter() {
            let row_ix = match out.find_row(test) {
                RowMatch::Exact(i) | RowMatch::Substring(i) => i,
                RowMatch::Ambiguous(ixs) => {
                    let rows: Vec<String> = ixs.iter().map(|&i| out.rows[i].test.clone()).collect();
                    warn!(test, ?rows, "ambiguous template row; skipped");
                    diagnostics.push(Diagnostic::AmbiguousRow { test: s!(test), rows });
                    continue;
                }
                RowMatch::Missing => {
                    warn!(test, "test not found in template");
                    diagnostics.push(Diagnostic::TestNotInTemplate { test: s!(test) });
                    continue;
                }
            };

            let row = &mut out.rows[row_ix];
            for (date, value) in values {
                let Some(col) = index_of(dates, date.as_str()) else { continue };
                match row.cells.get_mut(col) {
                    Some(cell) => *cell = s!(value.as_str()),
                    None => debug!(test, date = %date, "no date column for value"),
                }
            }
        }

        Populated { template: out, diagnostics }
    }

    pub fn headers(&self) -> Vec<String> {
        let mut h = Vec::with_capacity(FIXED_COLUMNS + self.date_columns.len());
        h.push(self.identity_header.clone());
        h.push(self.unit_header.clone());
        h.extend(self.date_columns.iter().cloned());
        h
    }

    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| {
                let mut v = Vec::with_capacity(FIXED_COLUMNS + r.cells.len());
                v.push(r.test.clone());
                v.push(r.unit.clone());
                v.extend(r.cells.iter().cloned());
                v
            })
            .collect()
    }
}

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| WORKBOOK_EXTS.iter().any(|w| e.eq_ignore_ascii_case(w)))
}

/// Every row of `sheet` as text cells; empty cells become "".
fn read_sheet(path: &Path, sheet: &str) -> Result<Vec<Vec<String>>> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let mut book = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| Error::Template(format!("{}: {}", path.display(), e)))?;
    let range = book.worksheet_range(sheet).map_err(|e| {
        Error::Template(format!("{}: sheet '{}': {}", path.display(), sheet, e))
    })?;
    debug!(path = %path.display(), sheet, rows = range.height(), "read template sheet");

    Ok(range
        .rows()
        .map(|r| r.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => s!(),
        other => other.to_string(),
    }
}
