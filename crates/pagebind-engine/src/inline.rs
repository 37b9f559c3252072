//! Expression interpolation inside larger text.
//!
//! Ordinary attribute values and document bodies may embed `$...`
//! expressions between literal text (`href="$loop.it.link()"`,
//! `see $link.ref("comparison")`). This module finds those fragments,
//! evaluates them, and splices the results back in. A fragment that fails
//! to parse or evaluate aborts the whole interpolation; broken references
//! are never papered over with empty output.

use crate::context::Context;
use crate::error::RenderError;
use crate::eval::evaluate;
use crate::expr::Expr;

/// How substituted values are escaped for their output position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    /// No escaping; for body prose where results are markup hints.
    None,
    /// Escape for element text content.
    Html,
    /// Escape for a quoted attribute value.
    Attribute,
}

/// Substitute every embedded expression in `text`.
///
/// A `$` starts an expression only when followed by an identifier and a
/// `.`; any other `$` is literal text.
pub fn interpolate(
    text: &str,
    ctx: &Context,
    escape: Escape,
    location: &str,
) -> Result<String, RenderError> {
    // Fast path: nothing to substitute.
    if !text.contains('$') {
        return Ok(text.to_string());
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(dollar) = rest.find('$') {
        out.push_str(&rest[..dollar]);
        let candidate = &rest[dollar..];

        if !is_expression_start(candidate) {
            out.push('$');
            rest = &candidate[1..];
            continue;
        }

        let (expr, consumed) = Expr::parse_prefix(candidate)
            .map_err(|e| RenderError::parse(snippet(candidate), location, e))?;
        let value = evaluate(&expr, ctx)
            .map_err(|e| RenderError::eval(&expr.source, location, e))?;
        let rendered = value
            .display_text()
            .map_err(|e| RenderError::eval(&expr.source, location, e))?;

        match escape {
            Escape::None => out.push_str(&rendered),
            Escape::Html => out.push_str(&escape_text(&rendered)),
            Escape::Attribute => out.push_str(&escape_attr(&rendered)),
        }

        rest = &candidate[consumed..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Whether text starting at a `$` looks like an expression (`$ident.`).
fn is_expression_start(candidate: &str) -> bool {
    let after = &candidate[1..];
    let ident_len = after
        .char_indices()
        .take_while(|(i, c)| {
            if *i == 0 {
                c.is_ascii_alphabetic() || *c == '_'
            } else {
                c.is_ascii_alphanumeric() || *c == '_'
            }
        })
        .count();
    ident_len > 0 && after[ident_len..].starts_with('.')
}

/// Shorten a failing fragment for the error message.
fn snippet(candidate: &str) -> String {
    candidate
        .split_whitespace()
        .next()
        .unwrap_or(candidate)
        .chars()
        .take(48)
        .collect()
}

/// Escape text for element content: `&`, `<`, `>`.
pub(crate) fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for a quoted attribute value.
pub(crate) fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
