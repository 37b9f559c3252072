//! Per-page and whole-site rendering.
//!
//! Each page render is a single pure computation over already-resolved
//! in-memory data, so independent pages render in parallel with no shared
//! mutable state. A failure aborts that page as a unit; there is no
//! partial or degraded output.

use std::sync::Arc;

use pagebind_core::{Page, SiteConfig};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::context::Context;
use crate::directive::render_template;
use crate::error::{RenderError, TemplateError};
use crate::inline::{Escape, interpolate};
use crate::links::LinkIndex;
use crate::template::TemplateRegistry;

/// Drives page renders against a layout registry and link index.
#[derive(Debug)]
pub struct SiteRenderer {
    registry: TemplateRegistry,
    links: LinkIndex,
    config: SiteConfig,
}

impl SiteRenderer {
    /// Create a renderer over pre-built layouts and links.
    #[must_use]
    pub fn new(registry: TemplateRegistry, links: LinkIndex, config: SiteConfig) -> Self {
        Self {
            registry,
            links,
            config,
        }
    }

    /// The link index this renderer resolves against.
    #[must_use]
    pub fn links(&self) -> &LinkIndex {
        &self.links
    }

    /// Render one page to its final HTML string.
    pub fn render_page(&self, page: &Arc<Page>) -> Result<String, RenderError> {
        let layout = page.layout.as_deref().unwrap_or(&self.config.default_layout);
        debug!(page = %page.id, layout, "rendering page");

        let template = self
            .registry
            .get(layout)
            .ok_or_else(|| TemplateError::NotFound(layout.to_string()))?;

        // Resolve inline body directives before the layout consumes the
        // content; results there are markup hints and stay unescaped.
        let body_ctx = Context::new(page, &self.links)
            .with_date_format(&self.config.default_date_format);
        let body = interpolate(&page.content, &body_ctx, Escape::None, "body")?;
        let resolved = Arc::new(Page {
            content: body,
            ..(**page).clone()
        });

        let ctx = Context::new(&resolved, &self.links)
            .with_date_format(&self.config.default_date_format);
        render_template(template, &ctx)
    }

    /// Render many pages in parallel, returning `(page id, html)` pairs in
    /// input order.
    ///
    /// Pages are independent, so order of execution does not matter; on
    /// failure the first error in input order is returned.
    pub fn render_all(&self, pages: &[Arc<Page>]) -> Result<Vec<(String, String)>, RenderError> {
        info!(pages = pages.len(), "rendering pages");

        let results: Vec<_> = pages
            .par_iter()
            .map(|page| {
                self.render_page(page)
                    .map(|html| (page.id.clone(), html))
            })
            .collect();

        let mut rendered = Vec::with_capacity(results.len());
        for result in results {
            rendered.push(result?);
        }

        info!(pages = rendered.len(), "render complete");
        Ok(rendered)
    }
}
