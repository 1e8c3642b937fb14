// src/csv.rs
use std::borrow::Cow;
use std::io::{self, Write};
use std::mem::take;

/* ---------------- Parsing ---------------- */

/// Accumulates fields and rows while the parser walks the text.
#[derive(Default)]
struct Rows {
    out: Vec<Vec<String>>,
    row: Vec<String>,
    field: String,
}

impl Rows {
    fn end_field(&mut self) {
        self.row.push(take(&mut self.field));
    }

    /// Rows that are a single empty field are blank lines; drop them.
    fn end_row(&mut self) {
        self.end_field();
        let row = take(&mut self.row);
        if !(row.len() == 1 && row[0].is_empty()) {
            self.out.push(row);
        }
    }
}

/// Small CSV/TSV reader: quoted fields, `""` escapes, CRLF, leading BOM.
/// Blank lines are dropped.
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut acc = Rows::default();
    let mut quoted = false;
    let mut chars = text.strip_prefix('\u{feff}').unwrap_or(text).chars().peekable();

    while let Some(ch) = chars.next() {
        if quoted {
            match ch {
                '"' if chars.peek() == Some(&'"') => { chars.next(); acc.field.push('"'); }
                '"' => quoted = false,
                _ => acc.field.push(ch),
            }
            continue;
        }
        match ch {
            '"' => quoted = true,
            '\r' => {
                if chars.peek() == Some(&'\n') { chars.next(); }
                acc.end_row();
            }
            '\n' => acc.end_row(),
            c if c == sep => acc.end_field(),
            c => acc.field.push(c),
        }
    }

    // Last line without a newline (or an unterminated quote).
    if !acc.field.is_empty() || !acc.row.is_empty() {
        acc.end_row();
    }
    acc.out
}

/* ---------------- Writing ---------------- */

fn quote(field: &str, sep: char) -> Cow<'_, str> {
    if field.contains([sep, '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Write one row followed by a newline.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S], sep: char) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 { write!(w, "{sep}")?; }
        w.write_all(quote(cell.as_ref(), sep).as_bytes())?;
    }
    writeln!(w)
}
