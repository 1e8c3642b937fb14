// src/ocr.rs
//! Text recognition backends.
//!
//! The pipeline only needs `image → text`. Which engine does it, where it
//! lives and how it is tuned all come in through [`OcrOptions`].

use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::process::Command;

use image::ImageFormat;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::options::{AppOptions, OcrOptions};
use crate::error::{Error, Result};

/// Anything that can turn a scanned report into raw text.
pub trait TextRecognizer {
    /// Engine identifier for logs ("tesseract", "text-file").
    fn name(&self) -> &'static str;

    fn extract_text(&self, image: &Path) -> Result<String>;
}

/* ---------------- Tesseract (external binary) ---------------- */

pub struct Tesseract {
    opts: OcrOptions,
}

impl Tesseract {
    pub fn new(opts: OcrOptions) -> Self { Self { opts } }

    /// `<input> stdout --oem N --psm N [-c tessedit_char_whitelist=...]`
    pub fn command_args(&self, input: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            input.as_os_str().to_owned(),
            "stdout".into(),
            "--oem".into(),
            self.opts.oem.to_string().into(),
            "--psm".into(),
            self.opts.psm.to_string().into(),
        ];
        if let Some(w) = self.opts.whitelist.as_deref().filter(|w| !w.is_empty()) {
            args.push("-c".into());
            args.push(join!("tessedit_char_whitelist=", w).into());
        }
        args
    }
}

impl TextRecognizer for Tesseract {
    fn name(&self) -> &'static str { "tesseract" }

    fn extract_text(&self, image: &Path) -> Result<String> {
        // Temp file must outlive the engine call.
        let prepared = if self.opts.preprocess { Some(preprocess(image)?) } else { None };
        let input = prepared.as_ref().map(|t| t.path()).unwrap_or(image);

        info!(engine = %self.opts.engine.display(), input = %input.display(), "running OCR");
        let output = Command::new(&self.opts.engine)
            .args(self.command_args(input))
            .output()
            .map_err(|e| Error::Recognizer(format!(
                "failed to launch {}: {}", self.opts.engine.display(), e
            )))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Recognizer(format!(
                "{} exited with {}: {}", self.opts.engine.display(), output.status, stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Grayscale copy of the scan as a temp PNG.
pub fn preprocess(image: &Path) -> Result<NamedTempFile> {
    let img = image::open(image)?;
    let gray = img.grayscale();
    let tmp = tempfile::Builder::new()
        .prefix("labscan-")
        .suffix(".png")
        .tempfile()
        .map_err(|e| Error::io(std::env::temp_dir(), e))?;
    gray.save_with_format(tmp.path(), ImageFormat::Png)?;
    debug!(from = %image.display(), to = %tmp.path().display(), "preprocessed scan");
    Ok(tmp)
}

/* ---------------- Replay of already-recognized text ---------------- */

/// Treats the "image" path as a text file holding recognized output,
/// e.g. a previous run's debug dump.
pub struct TextFile;

impl TextRecognizer for TextFile {
    fn name(&self) -> &'static str { "text-file" }

    fn extract_text(&self, image: &Path) -> Result<String> {
        fs::read_to_string(image).map_err(|e| Error::io(image, e))
    }
}

/// Pick the backend the options ask for.
pub fn recognizer_for(opts: &AppOptions) -> Box<dyn TextRecognizer> {
    if opts.input.text_only || is_text_path(&opts.input.image) {
        Box::new(TextFile)
    } else {
        Box::new(Tesseract::new(opts.ocr.clone()))
    }
}

fn is_text_path(p: &Path) -> bool {
    p.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
}
