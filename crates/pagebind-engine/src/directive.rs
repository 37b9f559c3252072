//! Directive application over template trees.
//!
//! Walks a parsed template top-down in document order and applies directive
//! attributes per element. Directives form a closed set with a fixed
//! precedence: `:loop` first (it decides whether and how often the subtree
//! is visited at all), then `:text`, then `:html`. `:text` output is always
//! HTML-escaped; `:html` is the explicit trust-this-content form for
//! pre-rendered fragments and is inserted verbatim. Everything else copies
//! through unchanged, except that ordinary attribute values get inline
//! expression substitution.

use crate::context::{Context, LoopFrame};
use crate::error::{EvalError, RenderError};
use crate::eval::evaluate;
use crate::expr::Expr;
use crate::inline::{Escape, escape_text, interpolate};
use crate::template::{Element, Node, Template};
use crate::value::Value;

/// The closed set of directive attributes, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// `:loop` - instantiate the element once per sequence item.
    Loop,
    /// `:text` - insert the evaluated string, escaped.
    Text,
    /// `:html` - insert the evaluated string verbatim.
    Html,
}

impl Directive {
    /// Recognize a directive attribute name.
    pub fn from_attr(name: &str) -> Option<Self> {
        match name {
            ":loop" => Some(Self::Loop),
            ":text" => Some(Self::Text),
            ":html" => Some(Self::Html),
            _ => None,
        }
    }

    /// The attribute name this directive is written as.
    pub fn as_attr(&self) -> &'static str {
        match self {
            Self::Loop => ":loop",
            Self::Text => ":text",
            Self::Html => ":html",
        }
    }
}

/// Render a template against a root context, producing the page HTML.
pub fn render_template(template: &Template, ctx: &Context) -> Result<String, RenderError> {
    let mut out = String::new();
    let mut path = vec![template.name().to_string()];
    render_nodes(template.nodes(), ctx, &mut path, &mut out)?;
    Ok(out)
}

/// Render sibling nodes in document order.
fn render_nodes(
    nodes: &[Node],
    ctx: &Context,
    path: &mut Vec<String>,
    out: &mut String,
) -> Result<(), RenderError> {
    let mut element_index = 0usize;
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            Node::Doctype(doctype) => {
                out.push('<');
                out.push('!');
                out.push_str(doctype);
                out.push('>');
            }
            Node::Element(element) => {
                path.push(format!("{}[{element_index}]", element.tag));
                let result = render_element(element, ctx, path, out);
                path.pop();
                result?;
                element_index += 1;
            }
        }
    }
    Ok(())
}

/// Apply `:loop` (if present), then emit the element once per scope.
fn render_element(
    element: &Element,
    ctx: &Context,
    path: &mut Vec<String>,
    out: &mut String,
) -> Result<(), RenderError> {
    let Some(loop_src) = element.attr(Directive::Loop.as_attr()) else {
        return emit_element(element, ctx, path, out);
    };

    let location = path.join("/");
    let expr = Expr::parse(loop_src.trim())
        .map_err(|e| RenderError::parse(loop_src.trim(), &location, e))?;
    let value = evaluate(&expr, ctx).map_err(|e| RenderError::eval(&expr.source, &location, e))?;
    let Value::Seq(items) = value else {
        return Err(RenderError::eval(
            &expr.source,
            &location,
            EvalError::NotASequence(value.type_name()),
        ));
    };

    // Zero iterations over an empty sequence is a valid, empty result.
    for (index, item) in items.iter().enumerate() {
        let frame = LoopFrame {
            it: item.clone(),
            index,
        };
        let scoped = ctx.with_frame(&frame);
        emit_element(element, &scoped, path, out)?;
    }

    Ok(())
}

/// Write one instantiation of an element: open tag, content, close tag.
fn emit_element(
    element: &Element,
    ctx: &Context,
    path: &mut Vec<String>,
    out: &mut String,
) -> Result<(), RenderError> {
    let location = path.join("/");

    out.push('<');
    out.push_str(&element.tag);
    for attr in &element.attrs {
        if Directive::from_attr(&attr.name).is_some() {
            continue;
        }
        out.push(' ');
        out.push_str(&attr.name);
        if let Some(raw) = &attr.value {
            let value = interpolate(raw, ctx, Escape::Attribute, &location)?;
            out.push_str("=\"");
            out.push_str(&value);
            out.push('"');
        }
    }
    out.push('>');

    if element.void {
        return Ok(());
    }

    if let Some(text_src) = element.attr(Directive::Text.as_attr()) {
        let text = eval_to_text(text_src, ctx, &location)?;
        out.push_str(&escape_text(&text));
    } else if let Some(html_src) = element.attr(Directive::Html.as_attr()) {
        let html = eval_to_text(html_src, ctx, &location)?;
        out.push_str(&html);
    } else {
        render_nodes(&element.children, ctx, path, out)?;
    }

    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
    Ok(())
}

/// Parse and evaluate a directive expression down to output text.
fn eval_to_text(src: &str, ctx: &Context, location: &str) -> Result<String, RenderError> {
    let src = src.trim();
    let expr = Expr::parse(src).map_err(|e| RenderError::parse(src, location, e))?;
    let value = evaluate(&expr, ctx).map_err(|e| RenderError::eval(&expr.source, location, e))?;
    value
        .display_text()
        .map_err(|e| RenderError::eval(&expr.source, location, e))
}
