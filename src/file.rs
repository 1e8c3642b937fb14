// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::csv::write_row;
use crate::config::options::ExportOptions;
use crate::error::{Error, Result};
use crate::template::Template;

/// Write the populated template to `export.out` (header row first).
/// Returns the final path written to.
pub fn write_template(export: &ExportOptions, template: &Template) -> Result<PathBuf> {
    let path = export.out.clone();
    write_rows(&path, &template.headers(), &template.to_rows(), export.delim())?;
    Ok(path)
}

/// Ensure parent dir exists; create/truncate file; header then rows.
pub fn write_rows(
    path: &Path,
    headers: &[String],
    rows: &[Vec<String>],
    sep: char,
) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| Error::io(path, e))?; // truncate/overwrite
    let mut out = BufWriter::new(file);
    write_row(&mut out, headers, sep).map_err(|e| Error::io(path, e))?;
    for row in rows {
        write_row(&mut out, row.as_slice(), sep).map_err(|e| Error::io(path, e))?;
    }
    out.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}

/// Dump recognized text verbatim so a bad parse can be traced back to the OCR output.
pub fn write_debug_text(path: &Path, text: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, text).map_err(|e| Error::io(path, e))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "path exists but is not a directory"),
        ));
    }
    if !dir.exists() { fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?; }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_rows_creates_dirs_and_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("nested/out/results.tsv");
        let headers = vec![s!("Test"), s!("Unit"), s!("01/02/23")];
        let rows = vec![vec![s!("Sodium"), s!("mmol/L"), s!("140")]];
        write_rows(&p, &headers, &rows, '\t').unwrap();
        let text = fs::read_to_string(&p).unwrap();
        assert_eq!(text, "Test\tUnit\t01/02/23\nSodium\tmmol/L\t140\n");
    }

    #[test]
    fn file_in_place_of_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        assert!(ensure_directory(&blocker).is_err());
    }
}
