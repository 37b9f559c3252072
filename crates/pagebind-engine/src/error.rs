//! Error types for the templating engine.
//!
//! Every failure is a deterministic content-authoring error: a page either
//! renders completely or fails as a unit, and no error is ever replaced by
//! an empty substitution.

use thiserror::Error;

/// Result type alias using `RenderError`.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Malformed expression syntax.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The root segment named a namespace the engine does not know.
    #[error("unknown namespace `{0}`")]
    UnknownNamespace(String),

    /// Expression did not start with the `$` sigil.
    #[error("expected `$` sigil")]
    MissingSigil,

    /// A `.` was not followed by an identifier.
    #[error("empty path segment")]
    EmptySegment,

    /// A call's argument list was never closed.
    #[error("unterminated call `{0}(`")]
    UnterminatedCall(String),

    /// A string literal was never closed.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// An argument was neither a literal nor a nested expression.
    #[error("invalid argument near `{0}`")]
    InvalidArgument(String),

    /// Input continued past the end of the expression.
    #[error("trailing input after expression: `{0}`")]
    TrailingInput(String),
}

/// Unresolvable symbolic reference.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinkError {
    /// The identifier matched no known page or anchor.
    #[error("unresolved {kind} reference `{id}`")]
    NotFound { kind: &'static str, id: String },
}

impl LinkError {
    /// Unknown page identifier.
    pub fn page(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "page",
            id: id.into(),
        }
    }

    /// Unknown in-document anchor.
    pub fn anchor(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "anchor",
            id: id.into(),
        }
    }
}

/// Date pattern errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// The layout pattern was empty.
    #[error("empty date pattern")]
    EmptyPattern,
}

/// Expression evaluation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Field access on a value without that field.
    #[error("{type_name} has no field `{field}`")]
    UnknownField {
        type_name: &'static str,
        field: String,
    },

    /// Method call on a value without that method.
    #[error("{type_name} has no method `{method}`")]
    UnknownMethod {
        type_name: &'static str,
        method: String,
    },

    /// Method called with the wrong number of arguments.
    #[error("`{method}` expects {expected} argument(s), got {got}")]
    ArityMismatch {
        method: String,
        expected: usize,
        got: usize,
    },

    /// Method called with an argument of the wrong type.
    #[error("`{method}` argument {index} must be a {expected}")]
    BadArgument {
        method: String,
        index: usize,
        expected: &'static str,
    },

    /// `$loop` referenced outside any enclosing `:loop`.
    #[error("`$loop` referenced outside any enclosing loop")]
    OutsideLoop,

    /// A namespace was used as a value with no following segment.
    #[error("`${0}` cannot be used as a value on its own")]
    BareNamespace(&'static str),

    /// `:loop` expression did not produce a sequence.
    #[error("expected a sequence, got {0}")]
    NotASequence(&'static str),

    /// Value kind that has no text rendering.
    #[error("a {0} value cannot be rendered as text")]
    Unprintable(&'static str),

    /// Optional page field that the frontmatter never set.
    #[error("field `{field}` is not set on this page")]
    UnsetField { field: &'static str },

    /// Link resolution failure.
    #[error(transparent)]
    Link(#[from] LinkError),

    /// Formatter failure.
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Malformed template markup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    /// An element was never closed.
    #[error("unclosed tag `<{0}>`")]
    UnclosedTag(String),

    /// A closing tag did not match the innermost open element.
    #[error("mismatched closing tag `</{found}>`, expected `</{expected}>`")]
    MismatchedClose { expected: String, found: String },

    /// A closing tag with no matching open element.
    #[error("unexpected closing tag `</{0}>`")]
    UnexpectedClose(String),

    /// A tag that could not be scanned.
    #[error("malformed tag near `{0}`")]
    MalformedTag(String),

    /// A quoted attribute value was never closed.
    #[error("unterminated attribute value in `<{0}>`")]
    UnterminatedAttribute(String),

    /// No registered layout under the requested name.
    #[error("template not found: {0}")]
    NotFound(String),
}

/// Top-level rendering error: what failed, on which expression, where.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// Template markup error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Expression syntax error, with source text and element location.
    #[error("parse error in `{expr}` at {location}: {source}")]
    Parse {
        expr: String,
        location: String,
        source: ParseError,
    },

    /// Expression evaluation error, with source text and element location.
    #[error("eval error in `{expr}` at {location}: {source}")]
    Eval {
        expr: String,
        location: String,
        source: EvalError,
    },
}

impl RenderError {
    /// Wrap a parse failure with its offending source and location.
    pub fn parse(expr: impl Into<String>, location: impl Into<String>, source: ParseError) -> Self {
        Self::Parse {
            expr: expr.into(),
            location: location.into(),
            source,
        }
    }

    /// Wrap an evaluation failure with its offending source and location.
    pub fn eval(expr: impl Into<String>, location: impl Into<String>, source: EvalError) -> Self {
        Self::Eval {
            expr: expr.into(),
            location: location.into(),
            source,
        }
    }
}
