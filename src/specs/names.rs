// src/specs/names.rs
//! Test name vocabulary and normalization.
//!
//! OCR hands us phrases like `Corr. Calcium`, `BILI TOTAL` or `eGFR (mL/min)`.
//! They are cleaned, looked up exactly, and only then matched loosely.
//!
//! Loose matching contract: an alias is a candidate when it is contained in the
//! cleaned phrase or contains it. Candidates score by the length of the shared
//! text. The best score wins; a best score shared by aliases of different
//! canonical names is `Ambiguous` and yields no name.

use crate::core::sanitize::clean_phrase;

/// (alias, canonical). Aliases are already in cleaned form, except the dotted
/// `bili.total` which only ever matches as written.
pub const VOCABULARY: &[(&str, &str)] = &[
    ("sodium", "Sodium"),
    ("potassium", "Potassium"),
    ("chloride", "Chloride"),
    ("bicarbonate", "Bicarbonate"),
    ("urea", "Urea"),
    ("creatinine", "Creatinine"),
    ("egfr", "eGFR"),
    ("calcium", "Calcium"),
    ("corrected calcium", "Calcium"),
    ("corr calcium", "Calcium"),
    ("magnesium", "Magnesium"),
    ("phosphate", "Phosphate"),
    ("bilirubin total", "Bili.Total"),
    ("bili.total", "Bili.Total"),
    ("bili total", "Bili.Total"),
    ("bilitotal", "Bili.Total"),
    ("alp", "ALP"),
    ("ggt", "GGT"),
    ("ld", "LD"),
    ("ast", "AST"),
    ("alt", "ALT"),
    ("total protein", "Total Protein"),
    ("totalprotein", "Total Protein"),
    ("albumin", "Albumin"),
    ("globulin", "Globulin"),
    ("cholesterol", "Cholesterol"),
    ("triglycerides", "Triglycerides"),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameMatch {
    Exact(&'static str),
    /// Loose match through `alias`.
    Partial { canonical: &'static str, alias: &'static str },
    Ambiguous(Vec<&'static str>),
    NoMatch,
}

impl NameMatch {
    pub fn canonical(&self) -> Option<&'static str> {
        match self {
            NameMatch::Exact(c) | NameMatch::Partial { canonical: c, .. } => Some(c),
            NameMatch::Ambiguous(_) | NameMatch::NoMatch => None,
        }
    }
}

/// Canonical names in vocabulary order, without repeats.
pub fn canonical_names() -> Vec<&'static str> {
    distinct_canonicals(VOCABULARY)
}

pub fn normalize(raw: &str) -> Option<&'static str> {
    resolve(raw).canonical()
}

pub fn resolve(raw: &str) -> NameMatch {
    let cleaned = clean_phrase(raw);
    if cleaned.is_empty() {
        return NameMatch::NoMatch;
    }

    if let Some((_, canonical)) = VOCABULARY.iter().find(|(alias, _)| *alias == cleaned) {
        return NameMatch::Exact(canonical);
    }

    let mut best_score = 0usize;
    let mut best: Vec<(&'static str, &'static str)> = Vec::new();
    for &(alias, canonical) in VOCABULARY {
        let score = if cleaned.contains(alias) {
            alias.len()
        } else if alias.contains(cleaned.as_str()) {
            cleaned.len()
        } else {
            continue;
        };
        if score > best_score {
            best_score = score;
            best.clear();
        }
        if score == best_score {
            best.push((alias, canonical));
        }
    }

    let Some(&(alias, canonical)) = best.first() else {
        return NameMatch::NoMatch;
    };
    if best.iter().all(|(_, c)| *c == canonical) {
        NameMatch::Partial { canonical, alias }
    } else {
        NameMatch::Ambiguous(distinct_canonicals(&best))
    }
}

/// Canonical names of `candidates`, first-seen order, each once.
fn distinct_canonicals(candidates: &[(&'static str, &'static str)]) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for &(_, c) in candidates {
        if !out.contains(&c) { out.push(c); }
    }
    out
}
