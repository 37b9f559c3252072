//! Scoped binding contexts.
//!
//! A [`Context`] is the immutable set of named roots an expression resolves
//! against: the page being rendered, the site link index, and (inside a
//! `:loop`) the innermost iteration frame. Entering a loop never mutates the
//! outer context; it derives a child view whose lifetime is exactly the
//! subtree it was created for.

use std::sync::Arc;

use pagebind_core::Page;

use crate::format::DEFAULT_DATE_LAYOUT;
use crate::links::LinkIndex;
use crate::value::Value;

/// The iteration state a `:loop` exposes to its subtree.
#[derive(Debug, Clone)]
pub struct LoopFrame {
    /// Current sequence element, bound as `$loop.it`.
    pub it: Value,
    /// Zero-based position, bound as `$loop.index`.
    pub index: usize,
}

/// Immutable binding context for one directive subtree.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    page: &'a Arc<Page>,
    links: &'a LinkIndex,
    date_format: &'a str,
    frame: Option<&'a LoopFrame>,
}

impl<'a> Context<'a> {
    /// Root context for rendering one page.
    #[must_use]
    pub fn new(page: &'a Arc<Page>, links: &'a LinkIndex) -> Self {
        Self {
            page,
            links,
            date_format: DEFAULT_DATE_LAYOUT,
            frame: None,
        }
    }

    /// Override the date layout a bare `format()` call falls back to.
    #[must_use]
    pub fn with_date_format(mut self, date_format: &'a str) -> Self {
        self.date_format = date_format;
        self
    }

    /// Derive a child context whose loop frame shadows any enclosing one.
    ///
    /// The child may borrow a frame that lives shorter than this context;
    /// its scope is exactly the subtree rendered under it.
    #[must_use]
    pub fn with_frame<'b>(&self, frame: &'b LoopFrame) -> Context<'b>
    where
        'a: 'b,
    {
        Context {
            page: self.page,
            links: self.links,
            date_format: self.date_format,
            frame: Some(frame),
        }
    }

    /// The page being rendered.
    #[must_use]
    pub fn page(&self) -> &'a Arc<Page> {
        self.page
    }

    /// The pre-built site link index.
    #[must_use]
    pub fn links(&self) -> &'a LinkIndex {
        self.links
    }

    /// The date layout a bare `format()` call uses.
    #[must_use]
    pub fn date_format(&self) -> &'a str {
        self.date_format
    }

    /// The innermost loop frame, if any.
    #[must_use]
    pub fn frame(&self) -> Option<&'a LoopFrame> {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use pagebind_core::Frontmatter;

    use super::*;

    fn page() -> Arc<Page> {
        let fm = Frontmatter {
            title: "Home".to_string(),
            ..Frontmatter::default()
        };
        Arc::new(Page::from_frontmatter(&fm, "home", "/", ""))
    }

    #[test]
    fn test_root_context_has_no_frame() {
        let page = page();
        let links = LinkIndex::default();
        let ctx = Context::new(&page, &links);
        assert!(ctx.frame().is_none());
    }

    #[test]
    fn test_date_format_defaults_and_overrides() {
        let page = page();
        let links = LinkIndex::default();
        let ctx = Context::new(&page, &links);
        assert_eq!(ctx.date_format(), DEFAULT_DATE_LAYOUT);

        let ctx = ctx.with_date_format("2006-01-02");
        assert_eq!(ctx.date_format(), "2006-01-02");

        // Entering a loop keeps the configured layout.
        let frame = LoopFrame {
            it: Value::Str("x".to_string()),
            index: 0,
        };
        assert_eq!(ctx.with_frame(&frame).date_format(), "2006-01-02");
    }

    #[test]
    fn test_child_frame_shadows_outer() {
        let page = page();
        let links = LinkIndex::default();
        let ctx = Context::new(&page, &links);

        let outer = LoopFrame {
            it: Value::Str("outer".to_string()),
            index: 0,
        };
        let inner = LoopFrame {
            it: Value::Str("inner".to_string()),
            index: 3,
        };

        let with_outer = ctx.with_frame(&outer);
        let with_inner = with_outer.with_frame(&inner);

        assert_eq!(with_inner.frame().unwrap().index, 3);
        // The outer view is untouched; scoping is strictly lexical.
        assert_eq!(with_outer.frame().unwrap().index, 0);
        assert!(ctx.frame().is_none());
    }
}
