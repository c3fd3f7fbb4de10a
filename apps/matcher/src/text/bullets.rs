//! CV bullet extraction and quantification checks.

use once_cell::sync::Lazy;
use regex::Regex;

static BULLET_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:[-*•]|\d+\.)\s+").unwrap());

static QUANTIFIED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\b\d+(\.\d+)?\b|\d+%|\bpercent\b)").unwrap());

/// Items shorter than this are noise (stray markers, initials).
const MIN_ITEM_CHARS: usize = 4;

/// Splits CV text into achievement-like items.
///
/// - A line starting with `-`, `*`, `•` or `N.` opens a new bullet (marker stripped).
/// - A plain line after a bullet continues that bullet.
/// - A line ending in `:` is a section header and closes any pending plain block.
/// - Plain lines before the first bullet are joined into one item.
pub fn extract_bullets(text: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    let mut pending: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim) {
        if let Some(marker) = BULLET_MARKER.find(line) {
            flush_pending(&mut pending, &mut items);
            items.push(line[marker.end()..].trim().to_string());
        } else if line.ends_with(':') {
            flush_pending(&mut pending, &mut items);
        } else if line.is_empty() {
            continue;
        } else if let Some(last) = items.last_mut() {
            last.push(' ');
            last.push_str(line);
        } else {
            pending.push(line);
        }
    }
    flush_pending(&mut pending, &mut items);

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| item.chars().count() >= MIN_ITEM_CHARS)
        .collect()
}

fn flush_pending(pending: &mut Vec<&str>, items: &mut Vec<String>) {
    if !pending.is_empty() {
        items.push(pending.join(" "));
        pending.clear();
    }
}

/// True if the line carries a figure: a number, a percentage, or the word "percent".
pub fn is_quantified(line: &str) -> bool {
    QUANTIFIED.is_match(line)
}
