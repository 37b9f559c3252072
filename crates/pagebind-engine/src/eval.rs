//! Expression evaluation.
//!
//! Resolves a parsed [`Expr`] against a [`Context`] to a typed [`Value`].
//! The root namespace picks the starting value (or dispatches directly for
//! the function namespaces `link`, `block`, `section`); each following step
//! applies field or method dispatch to the previous result. Arguments are
//! evaluated left to right before a call. Evaluation is pure: same tree,
//! same context, same value.

use std::sync::Arc;

use crate::context::Context;
use crate::error::EvalError;
use crate::expr::{Arg, Expr, Namespace, Step};
use crate::inline::escape_attr;
use crate::value::{Value, check_arity};

/// Evaluate an expression tree against a binding context.
pub fn evaluate(expr: &Expr, ctx: &Context) -> Result<Value, EvalError> {
    let mut steps = expr.steps.iter();

    let mut current = match expr.root {
        Namespace::Page => Value::Page(Arc::clone(ctx.page())),
        Namespace::Loop => resolve_loop(ctx, steps.next())?,
        ns @ (Namespace::Link | Namespace::Block | Namespace::Section) => {
            resolve_function_namespace(ns, ctx, steps.next())?
        }
    };

    for step in steps {
        current = match step {
            Step::Field(name) => current.field(name)?,
            Step::Call { name, args } => {
                let mut args = eval_args(args, ctx)?;
                // A bare `format()` falls back to the configured date layout.
                if args.is_empty() && name.as_str() == "format" {
                    args.push(Value::Str(ctx.date_format().to_string()));
                }
                current.call(name, &args)?
            }
        };
    }

    Ok(current)
}

/// Resolve the first step under `$loop` against the innermost frame.
fn resolve_loop(ctx: &Context, first: Option<&Step>) -> Result<Value, EvalError> {
    let frame = ctx.frame().ok_or(EvalError::OutsideLoop)?;

    match first {
        None => Err(EvalError::BareNamespace("loop")),
        Some(Step::Field(name)) => match name.as_str() {
            "it" => Ok(frame.it.clone()),
            "index" => Ok(Value::Number(frame.index as f64)),
            other => Err(EvalError::UnknownField {
                type_name: "loop frame",
                field: other.to_string(),
            }),
        },
        Some(Step::Call { name, .. }) => Err(EvalError::UnknownMethod {
            type_name: "loop frame",
            method: name.clone(),
        }),
    }
}

/// Dispatch the first step of a function namespace (`link`, `block`,
/// `section`), which must be a call.
fn resolve_function_namespace(
    ns: Namespace,
    ctx: &Context,
    first: Option<&Step>,
) -> Result<Value, EvalError> {
    let type_name = match ns {
        Namespace::Link => "link namespace",
        Namespace::Block => "block namespace",
        Namespace::Section => "section namespace",
        _ => unreachable!("function namespaces only"),
    };

    match first {
        None => Err(EvalError::BareNamespace(ns.as_str())),
        Some(Step::Field(name)) => Err(EvalError::UnknownField {
            type_name,
            field: name.clone(),
        }),
        Some(Step::Call { name, args }) => {
            let args = eval_args(args, ctx)?;
            match (ns, name.as_str()) {
                (Namespace::Link, "page") => {
                    check_arity(name, 1, &args)?;
                    let id = expect_str(name, 0, &args[0])?;
                    Ok(Value::Str(ctx.links().resolve_page(id)?))
                }
                (Namespace::Link, "ref") => {
                    check_arity(name, 1, &args)?;
                    let fragment = expect_str(name, 0, &args[0])?;
                    Ok(Value::Str(ctx.links().resolve_ref(fragment)?))
                }
                (Namespace::Block, "collapsible") => {
                    check_arity(name, 1, &args)?;
                    let Value::Bool(collapsed) = args[0] else {
                        return Err(EvalError::BadArgument {
                            method: name.clone(),
                            index: 0,
                            expected: "boolean",
                        });
                    };
                    // Hint marker consumed by the body-rendering collaborator.
                    Ok(Value::Str(format!("<!-- collapsible: {collapsed} -->")))
                }
                (Namespace::Section, "id") => {
                    check_arity(name, 1, &args)?;
                    let id = expect_str(name, 0, &args[0])?;
                    Ok(Value::Str(format!("<span id=\"{}\"></span>", escape_attr(id))))
                }
                _ => Err(EvalError::UnknownMethod {
                    type_name,
                    method: name.clone(),
                }),
            }
        }
    }
}

/// Evaluate call arguments left to right.
fn eval_args(args: &[Arg], ctx: &Context) -> Result<Vec<Value>, EvalError> {
    args.iter()
        .map(|arg| match arg {
            Arg::Str(s) => Ok(Value::Str(s.clone())),
            Arg::Number(n) => Ok(Value::Number(*n)),
            Arg::Bool(b) => Ok(Value::Bool(*b)),
            Arg::Expr(expr) => evaluate(expr, ctx),
        })
        .collect()
}

fn expect_str<'v>(method: &str, index: usize, value: &'v Value) -> Result<&'v str, EvalError> {
    match value {
        Value::Str(s) => Ok(s),
        _ => Err(EvalError::BadArgument {
            method: method.to_string(),
            index,
            expected: "string",
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pagebind_core::{Frontmatter, Page};

    use super::*;
    use crate::context::LoopFrame;
    use crate::links::LinkIndex;

    fn sample_page() -> Arc<Page> {
        let fm = Frontmatter {
            title: "Pipe Syntax".to_string(),
            date: Some(Utc.with_ymd_and_hms(2024, 1, 14, 10, 0, 0).unwrap()),
            ..Frontmatter::default()
        };
        Arc::new(Page::from_frontmatter(
            &fm,
            "blog/pipe-syntax",
            "/blog/pipe-syntax",
            "<p>body</p>",
        ))
    }

    fn links() -> LinkIndex {
        let mut index = LinkIndex::new();
        index.insert_page("blog/2-dbt-testing", "https://example.com/blog/2-dbt-testing");
        index.insert_anchor("comparison", "https://example.com/blog/pipe-syntax");
        index
    }

    #[test]
    fn test_page_field() {
        let page = sample_page();
        let links = links();
        let ctx = Context::new(&page, &links);

        let expr = Expr::parse("$page.title").unwrap();
        assert_eq!(
            evaluate(&expr, &ctx).unwrap(),
            Value::Str("Pipe Syntax".to_string())
        );
    }

    #[test]
    fn test_chained_call() {
        let page = sample_page();
        let links = links();
        let ctx = Context::new(&page, &links);

        let expr = Expr::parse("$page.date.format('January 02, 2006')").unwrap();
        assert_eq!(
            evaluate(&expr, &ctx).unwrap(),
            Value::Str("January 14, 2024".to_string())
        );
    }

    #[test]
    fn test_format_without_pattern_uses_date_layout() {
        let page = sample_page();
        let links = links();
        let ctx = Context::new(&page, &links);

        let expr = Expr::parse("$page.date.format()").unwrap();
        assert_eq!(
            evaluate(&expr, &ctx).unwrap(),
            Value::Str("January 14, 2024".to_string())
        );

        let ctx = ctx.with_date_format("2006-01-02");
        assert_eq!(
            evaluate(&expr, &ctx).unwrap(),
            Value::Str("2024-01-14".to_string())
        );
    }

    #[test]
    fn test_loop_outside_loop_fails() {
        let page = sample_page();
        let links = links();
        let ctx = Context::new(&page, &links);

        let expr = Expr::parse("$loop.it.title").unwrap();
        assert_eq!(evaluate(&expr, &ctx).unwrap_err(), EvalError::OutsideLoop);
    }

    #[test]
    fn test_loop_it_and_index() {
        let page = sample_page();
        let links = links();
        let ctx = Context::new(&page, &links);
        let frame = LoopFrame {
            it: Value::Str("first".to_string()),
            index: 0,
        };
        let ctx = ctx.with_frame(&frame);

        let it = Expr::parse("$loop.it").unwrap();
        assert_eq!(evaluate(&it, &ctx).unwrap(), Value::Str("first".to_string()));

        let index = Expr::parse("$loop.index").unwrap();
        assert_eq!(evaluate(&index, &ctx).unwrap(), Value::Number(0.0));
    }

    #[test]
    fn test_link_page() {
        let page = sample_page();
        let links = links();
        let ctx = Context::new(&page, &links);

        let expr = Expr::parse(r#"$link.page("blog/2-dbt-testing")"#).unwrap();
        assert_eq!(
            evaluate(&expr, &ctx).unwrap(),
            Value::Str("https://example.com/blog/2-dbt-testing".to_string())
        );
    }

    #[test]
    fn test_link_page_not_found() {
        let page = sample_page();
        let links = links();
        let ctx = Context::new(&page, &links);

        let expr = Expr::parse(r#"$link.page("missing/page")"#).unwrap();
        let err = evaluate(&expr, &ctx).unwrap_err();
        assert!(matches!(err, EvalError::Link(_)));
    }

    #[test]
    fn test_link_ref() {
        let page = sample_page();
        let links = links();
        let ctx = Context::new(&page, &links);

        let expr = Expr::parse(r#"$link.ref("comparison")"#).unwrap();
        assert_eq!(
            evaluate(&expr, &ctx).unwrap(),
            Value::Str("https://example.com/blog/pipe-syntax#comparison".to_string())
        );
    }

    #[test]
    fn test_block_and_section_hints() {
        let page = sample_page();
        let links = links();
        let ctx = Context::new(&page, &links);

        let block = Expr::parse("$block.collapsible(false)").unwrap();
        assert_eq!(
            evaluate(&block, &ctx).unwrap(),
            Value::Str("<!-- collapsible: false -->".to_string())
        );

        let section = Expr::parse(r#"$section.id("comparison")"#).unwrap();
        assert_eq!(
            evaluate(&section, &ctx).unwrap(),
            Value::Str("<span id=\"comparison\"></span>".to_string())
        );
    }

    #[test]
    fn test_nested_expression_argument() {
        let page = sample_page();
        let mut links = links();
        links.insert_page("blog/pipe-syntax", "https://example.com/blog/pipe-syntax");
        let ctx = Context::new(&page, &links);

        // $page.url feeds the link resolver. A URL is not an id, so this
        // fails as NotFound rather than silently producing something.
        let expr = Expr::parse("$link.page($page.url)").unwrap();
        assert!(matches!(
            evaluate(&expr, &ctx).unwrap_err(),
            EvalError::Link(_)
        ));
    }

    #[test]
    fn test_bare_namespace_fails() {
        let page = sample_page();
        let links = links();
        let ctx = Context::new(&page, &links);

        let expr = Expr::parse("$link").unwrap();
        assert_eq!(
            evaluate(&expr, &ctx).unwrap_err(),
            EvalError::BareNamespace("link")
        );
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let page = sample_page();
        let links = links();
        let ctx = Context::new(&page, &links);

        let expr = Expr::parse("$page.date.format('2006-01-02')").unwrap();
        let a = evaluate(&expr, &ctx).unwrap();
        let b = evaluate(&expr, &ctx).unwrap();
        assert_eq!(a, b);
    }
}
