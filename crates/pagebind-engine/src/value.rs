//! Typed values and field/method dispatch.
//!
//! Every runtime value the evaluator can produce is one [`Value`] variant.
//! Field and method resolution is a closed dispatch per variant, so unknown
//! names fail with a structural [`EvalError`] instead of an empty
//! placeholder, and no implicit coercions happen outside the stated call
//! signatures.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pagebind_core::Page;

use crate::error::EvalError;
use crate::format::format_timestamp;

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text.
    Str(String),
    /// Number.
    Number(f64),
    /// UTC timestamp.
    Timestamp(DateTime<Utc>),
    /// Boolean.
    Bool(bool),
    /// Reference to a page.
    Page(Arc<Page>),
    /// Ordered sequence of values.
    Seq(Vec<Value>),
}

impl Value {
    /// Name of this value's kind, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Number(_) => "number",
            Self::Timestamp(_) => "timestamp",
            Self::Bool(_) => "boolean",
            Self::Page(_) => "page",
            Self::Seq(_) => "sequence",
        }
    }

    /// Render this value as output text.
    ///
    /// Pages and sequences have no text form; asking for one is an error,
    /// not an empty string.
    pub fn display_text(&self) -> Result<String, EvalError> {
        match self {
            Self::Str(s) => Ok(s.clone()),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    Ok(format!("{}", *n as i64))
                } else {
                    Ok(n.to_string())
                }
            }
            Self::Timestamp(ts) => Ok(ts.to_rfc3339()),
            Self::Bool(b) => Ok(b.to_string()),
            Self::Page(_) | Self::Seq(_) => Err(EvalError::Unprintable(self.type_name())),
        }
    }

    /// Resolve a field on this value.
    pub fn field(&self, name: &str) -> Result<Value, EvalError> {
        if let Self::Page(page) = self {
            match name {
                "title" => return Ok(Self::Str(page.title.clone())),
                "id" => return Ok(Self::Str(page.id.clone())),
                "url" => return Ok(Self::Str(page.url.clone())),
                "author" => {
                    return match &page.author {
                        Some(author) => Ok(Self::Str(author.clone())),
                        None => Err(EvalError::UnsetField { field: "author" }),
                    };
                }
                "date" => {
                    return match page.date {
                        Some(date) => Ok(Self::Timestamp(date)),
                        None => Err(EvalError::UnsetField { field: "date" }),
                    };
                }
                "tags" => {
                    let tags = page.tags.iter().cloned().map(Self::Str).collect();
                    return Ok(Self::Seq(tags));
                }
                _ => {}
            }
        }

        Err(EvalError::UnknownField {
            type_name: self.type_name(),
            field: name.to_string(),
        })
    }

    /// Invoke a method on this value with already-evaluated arguments.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, EvalError> {
        match self {
            Self::Page(page) => match name {
                "content" => {
                    check_arity(name, 0, args)?;
                    Ok(Self::Str(page.content.clone()))
                }
                "subpages" => {
                    check_arity(name, 0, args)?;
                    let pages = page.subpages.iter().cloned().map(Self::Page).collect();
                    Ok(Self::Seq(pages))
                }
                "link" => {
                    check_arity(name, 0, args)?;
                    Ok(Self::Str(page.url.clone()))
                }
                _ => Err(self.unknown_method(name)),
            },
            Self::Timestamp(ts) => match name {
                "format" => {
                    check_arity(name, 1, args)?;
                    let Value::Str(pattern) = &args[0] else {
                        return Err(EvalError::BadArgument {
                            method: name.to_string(),
                            index: 0,
                            expected: "string",
                        });
                    };
                    Ok(Self::Str(format_timestamp(ts, pattern)?))
                }
                _ => Err(self.unknown_method(name)),
            },
            _ => Err(self.unknown_method(name)),
        }
    }

    fn unknown_method(&self, name: &str) -> EvalError {
        EvalError::UnknownMethod {
            type_name: self.type_name(),
            method: name.to_string(),
        }
    }
}

/// Fail with `ArityMismatch` unless exactly `expected` arguments were given.
pub(crate) fn check_arity(method: &str, expected: usize, args: &[Value]) -> Result<(), EvalError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(EvalError::ArityMismatch {
            method: method.to_string(),
            expected,
            got: args.len(),
        })
    }
}
