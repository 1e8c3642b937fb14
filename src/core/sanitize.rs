// src/core/sanitize.rs

/// Collapse every whitespace run to a single ' ' and trim both ends.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Lower-case, drop punctuation (anything not a word char or whitespace),
/// then collapse whitespace. "Bili. Total " → "bili total".
pub fn clean_phrase(s: &str) -> String {
    let kept: String = s
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    normalize_ws(&kept)
}

/// Trimmed, non-empty lines in order.
pub fn content_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}
