//! Best-effort scalar fields guessed from free text.
//!
//! These are pattern matches, not parsers, and carry no correctness
//! guarantee. Every function returns `None` instead of failing, including when
//! a pattern cannot be compiled.
//!
//! - [`extract_amount`] returns the **largest** dollar amount. The largest
//!   visible figure is assumed to be the document total.
//! - [`extract_date`] returns the **first** date in document order, which is
//!   not necessarily the most relevant one.
//! - [`extract_vendor`] prefers text after an explicit marker
//!   (`from`, `to`, `vendor`, `payee`, `merchant`) and falls back to a short
//!   capitalised line.

use std::sync::OnceLock;

use regex::Regex;

const AMOUNT_PATTERN: &str = r"\$\s?((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{2})?)";
const DATE_PATTERN: &str = r"\b(?:\d{1,2}/\d{1,2}/\d{4}|\d{4}-\d{2}-\d{2})\b";
const VENDOR_MARKER_PATTERN: &str =
    r"\b(?i:from|to|vendor|payee|merchant)\b[ \t]*:?[ \t]*([A-Z][A-Za-z0-9&'.,\- ]{1,59})";
const VENDOR_LINE_PATTERN: &str = r"(?m)^[ \t]*([A-Z][A-Za-z0-9&'.,\- ]{5,29})[ \t]*$";

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("Heuristic pattern failed to compile: {}", e);
            None
        }
    })
    .as_ref()
}

fn amount_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&RE, AMOUNT_PATTERN)
}

fn date_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&RE, DATE_PATTERN)
}

fn vendor_marker_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&RE, VENDOR_MARKER_PATTERN)
}

fn vendor_line_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&RE, VENDOR_LINE_PATTERN)
}

/// Largest `$` amount in the text.
///
/// Accepts digits with optional thousands separators and an optional
/// two-digit fraction (`$45`, `$1,200.00`, `$ 7.50`). A figure that runs on
/// into more digits (`$1,2345`, `$12.345`) is not an amount.
pub fn extract_amount(text: &str) -> Option<f64> {
    let re = amount_regex()?;
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter(|m| ends_amount(&text[m.end()..]))
        .filter_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .fold(None, |max: Option<f64>, value| match max {
            Some(current) if current >= value => Some(current),
            _ => Some(value),
        })
}

/// Whether the text after a matched figure leaves it complete. A trailing
/// separator only counts as punctuation when no digit follows it.
fn ends_amount(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        None => true,
        Some(c) if c.is_ascii_digit() => false,
        Some(',' | '.') => !chars.next().is_some_and(|c| c.is_ascii_digit()),
        Some(_) => true,
    }
}

/// First `MM/DD/YYYY` or `YYYY-MM-DD` date in the text, verbatim.
pub fn extract_date(text: &str) -> Option<String> {
    let re = date_regex()?;
    re.find(text).map(|m| m.as_str().to_string())
}

/// Vendor name guessed from the text.
pub fn extract_vendor(text: &str) -> Option<String> {
    let patterns = [vendor_marker_regex(), vendor_line_regex()];
    patterns
        .into_iter()
        .flatten()
        .find_map(|re| {
            re.captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().trim_end_matches([',', '.']).trim_end())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
        })
}
