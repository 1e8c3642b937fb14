// src/config/consts.rs

// Report layout
pub const MAX_DATE_COLUMNS: usize = 6;
pub const HEADER_SKIP_LINES: usize = 3; // legend line → first data row
pub const MIN_HEADER_DATES: usize = 2;

// Line parser
pub const MIN_LINE_LEN: usize = 5;
pub const UNKNOWN_MARKERS: [&str; 3] = ["Unkn", "Unknown", ""];
pub const STOP_PREFIXES: [&str; 2] = ["comment", "end"];
pub const STOP_CONTAINS: &str = "www.";

// Template
pub const TEST_COLUMN: &str = "Test";
pub const FIXED_COLUMNS: usize = 2; // Test, Unit
pub const TEMPLATE_SHEET: &str = "Blood Tests";
pub const WORKBOOK_EXTS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

// OCR engine
pub const TESSERACT_BIN: &str = "tesseract";
pub const TESSERACT_OEM: u8 = 3;
pub const TESSERACT_PSM: u8 = 6;
pub const TESSERACT_WHITELIST: &str =
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz./()-<>: ";

// Export
pub const DEFAULT_OUT_FILE: &str = "populated_blood_test_results.csv";
pub const DEFAULT_DEBUG_TEXT: &str = "debug_ocr_output.txt";
