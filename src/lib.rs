// src/lib.rs

#[macro_use]
pub mod macros;

pub mod cli;
pub mod config;
pub mod core;
pub mod specs;

pub mod csv;
pub mod error;
pub mod extract;
pub mod file;
pub mod ocr;
pub mod progress;
pub mod runner;
pub mod template;

pub use error::{Error, Result};
pub use extract::{Extraction, ResultMapping};
pub use runner::{process_text, run, run_with, Report, RunSummary};
pub use specs::dates::DateToken;
pub use template::{Diagnostic, Template};
