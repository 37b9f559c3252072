//! The page entity consumed by the templating engine.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::frontmatter::Frontmatter;

/// One renderable document with its metadata and pre-rendered body.
///
/// Pages are constructed once by the external discovery/parse collaborator
/// and consumed read-only by the engine. Subpage order is whatever the
/// collaborator supplied; the engine preserves it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Site-relative identifier, e.g. `blog/2-dbt-testing`.
    pub id: String,

    /// URL path for this page.
    pub url: String,

    /// Page title.
    pub title: String,

    /// Publication date, when the frontmatter carried one.
    pub date: Option<DateTime<Utc>>,

    /// Author name.
    pub author: Option<String>,

    /// Tags in authored order.
    pub tags: Vec<String>,

    /// Layout template that renders this page.
    pub layout: Option<String>,

    /// Rendered HTML fragment for the page body.
    pub content: String,

    /// Child pages in collaborator-supplied order.
    pub subpages: Vec<Arc<Page>>,
}

impl Page {
    /// Create a page from parsed frontmatter and a rendered body.
    #[must_use]
    pub fn from_frontmatter(
        fm: &Frontmatter,
        id: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: fm.title.clone(),
            date: fm.date,
            author: fm.author.clone(),
            tags: fm.tags.clone(),
            layout: fm.layout.clone(),
            content: content.into(),
            subpages: Vec::new(),
        }
    }

    /// Attach subpages, preserving the given order.
    #[must_use]
    pub fn with_subpages(mut self, subpages: Vec<Arc<Page>>) -> Self {
        self.subpages = subpages;
        self
    }
}
