// src/specs/mod.rs
//! # Report layout “specs”
//!
//! This module hosts the **layout-specific parsing rules** for the lab report.
//! Each spec focuses on one piece of the printed table and encodes *where the
//! ground truth lives in the recognized text* and *how to read it tolerantly*.
//!
//! ## What lives here
//! - **Date header detection** (`dates`): which tokens are the report's date
//!   columns, in order.
//! - **Test name vocabulary** (`names`): the closed list of aliases OCR tends to
//!   produce and the canonical name each one stands for.
//! - **Result rows** (`line`): splitting one recognized line into a name phrase
//!   and per-date values, with an explicit record of how well it aligned.
//!
//! ## What does **not** live here
//! - **Walking the whole document** (finding the data region, stop markers):
//!   that is `extract`.
//! - **Template I/O and merging**: `template` and `file`.
//! - **Running the OCR engine**: `ocr`.
//!
//! ## Typical call chain
//! ```text
//! runner → ocr::TextRecognizer::extract_text
//!        → specs::dates::extract_dates
//!        → extract::assemble → specs::line::parse_line → specs::names::resolve
//!        → template::Template::populate
//! ```
//!
//! ## Conventions & invariants
//! - Everything here is pure: `&str` in, owned values out, no logging of data
//!   beyond `debug!`.
//! - Values are kept as the literal token text; nothing is parsed to a float.
//! - Positional pairing of values to dates is ordinal; misalignment is
//!   reported, never silently corrected.

pub mod dates;
pub mod line;
pub mod names;
