// src/config/options.rs
use std::path::{ Path, PathBuf };
use super::consts::*;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AppOptions {
    pub input: InputOptions,
    pub ocr: OcrOptions,
    pub parse: ParseOptions,
    pub export: ExportOptions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputOptions {
    pub image: PathBuf,
    pub template: PathBuf,
    /// Sheet read when the template is a workbook; ignored for CSV/TSV.
    pub template_sheet: String,
    /// Input is already-recognized text (e.g. a saved debug dump); skip OCR.
    pub text_only: bool,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            image: PathBuf::new(),
            template: PathBuf::new(),
            template_sheet: s!(TEMPLATE_SHEET),
            text_only: false,
        }
    }
}

/// Recognition backend settings. Nothing here is global; every run carries its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OcrOptions {
    pub engine: PathBuf,
    pub oem: u8,
    pub psm: u8,
    pub whitelist: Option<String>,
    pub preprocess: bool,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            engine: PathBuf::from(TESSERACT_BIN),
            oem: TESSERACT_OEM,
            psm: TESSERACT_PSM,
            whitelist: Some(s!(TESSERACT_WHITELIST)),
            preprocess: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    pub max_dates: usize,
    pub header_skip: usize,
    pub min_header_dates: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_dates: MAX_DATE_COLUMNS,
            header_skip: HEADER_SKIP_LINES,
            min_header_dates: MIN_HEADER_DATES,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn delim(&self) -> char {
        match self { ExportFormat::Csv => ',', ExportFormat::Tsv => '\t' }
    }

    /// `.tsv`/`.tab` → Tsv, anything else → Csv.
    pub fn from_path(p: &Path) -> Self {
        match p.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()) {
            Some(e) if e == "tsv" || e == "tab" => ExportFormat::Tsv,
            _ => ExportFormat::Csv,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub out: PathBuf,
    /// None → follow the output extension.
    pub format: Option<ExportFormat>,
    /// Where the raw recognized text is dumped. None disables the dump.
    pub debug_text: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            out: PathBuf::from(DEFAULT_OUT_FILE),
            format: None,
            debug_text: Some(PathBuf::from(DEFAULT_DEBUG_TEXT)),
        }
    }
}

impl ExportOptions {
    pub fn format(&self) -> ExportFormat {
        self.format.unwrap_or_else(|| ExportFormat::from_path(&self.out))
    }

    pub fn delim(&self) -> char {
        self.format().delim()
    }
}
