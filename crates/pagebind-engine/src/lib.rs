//! Pagebind templating engine.
//!
//! Binds structured page data into HTML layouts through element attribute
//! directives (`:text`, `:html`, `:loop`) and a small expression language
//! (`$page.title`, `$loop.it.date.format('January 02, 2006')`,
//! `$link.page("blog/2-dbt-testing")`).
//!
//! # Modules
//!
//! - [`expr`] - Expression parsing into evaluable trees
//! - [`value`] - Typed values and field/method dispatch
//! - [`context`] - Scoped binding contexts and loop frames
//! - [`eval`] - Expression evaluation
//! - [`template`] - HTML template trees and the layout registry
//! - [`directive`] - Directive application over template trees
//! - [`links`] - Symbolic page/anchor link resolution
//! - [`format`] - Value-to-string formatters (date layouts)
//! - [`inline`] - Expression interpolation inside text and attributes
//! - [`render`] - Per-page and whole-site render driver

pub mod context;
pub mod directive;
pub mod error;
pub mod eval;
pub mod expr;
pub mod format;
pub mod inline;
pub mod links;
pub mod render;
pub mod template;
pub mod value;

pub use context::{Context, LoopFrame};
pub use directive::{Directive, render_template};
pub use error::{EvalError, FormatError, LinkError, ParseError, RenderError, TemplateError};
pub use eval::evaluate;
pub use expr::{Arg, Expr, Namespace, Step};
pub use inline::{Escape, interpolate};
pub use links::LinkIndex;
pub use render::SiteRenderer;
pub use template::{Template, TemplateRegistry};
pub use value::Value;
