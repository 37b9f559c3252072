//! Value-to-string formatters.
//!
//! The one formatter the template surface uses is timestamp formatting via
//! a reference-date layout pattern (`January 02, 2006` means "full month
//! name, zero-padded day, four-digit year"). Patterns are translated to
//! chrono format specifiers token by token; text that matches no layout
//! token passes through literally. Formatting is pure: same timestamp and
//! pattern, same string, no ambient locale or timezone state.

use chrono::{DateTime, Utc};

use crate::error::FormatError;

/// Layout applied when `format` is called without a pattern of its own.
pub const DEFAULT_DATE_LAYOUT: &str = "January 02, 2006";

/// Layout tokens of the reference date, longest first so that e.g. `2006`
/// wins over `2` and `January` over `Jan`.
const LAYOUT_TOKENS: &[(&str, &str)] = &[
    ("January", "%B"),
    ("Monday", "%A"),
    ("-0700", "%z"),
    ("2006", "%Y"),
    ("Jan", "%b"),
    ("Mon", "%a"),
    ("MST", "%Z"),
    ("15", "%H"),
    ("01", "%m"),
    ("02", "%d"),
    ("03", "%I"),
    ("04", "%M"),
    ("05", "%S"),
    ("06", "%y"),
    ("PM", "%p"),
    ("pm", "%P"),
    ("_2", "%e"),
    ("1", "%-m"),
    ("2", "%-d"),
    ("3", "%-I"),
    ("4", "%-M"),
    ("5", "%-S"),
];

/// Format a timestamp per a reference-date layout pattern.
pub fn format_timestamp(ts: &DateTime<Utc>, pattern: &str) -> Result<String, FormatError> {
    if pattern.is_empty() {
        return Err(FormatError::EmptyPattern);
    }

    let spec = translate_layout(pattern);
    Ok(ts.format(&spec).to_string())
}

/// Translate a reference-date layout into a chrono format string.
fn translate_layout(pattern: &str) -> String {
    let mut spec = String::with_capacity(pattern.len());
    let mut rest = pattern;

    'outer: while let Some(c) = rest.chars().next() {
        for (token, replacement) in LAYOUT_TOKENS {
            if let Some(after) = rest.strip_prefix(token) {
                spec.push_str(replacement);
                rest = after;
                continue 'outer;
            }
        }

        if c == '%' {
            spec.push_str("%%");
        } else {
            spec.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }

    spec
}
