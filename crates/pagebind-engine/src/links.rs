//! Symbolic link resolution.
//!
//! The `$link` namespace resolves page identifiers and in-document anchors
//! against a pre-built index. The index is constructed once by the external
//! page-discovery collaborator; resolution itself is read-only and
//! side-effect-free, and an unknown identifier is always a hard
//! [`LinkError`], never a silently emitted dead link.

use std::collections::HashMap;
use std::sync::Arc;

use pagebind_core::Page;

use crate::error::LinkError;

/// Pre-built index of page identifiers and anchors.
#[derive(Debug, Clone, Default)]
pub struct LinkIndex {
    pages: HashMap<String, String>,
    anchors: HashMap<String, String>,
}

impl LinkIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a page tree, prefixing URLs with the site base.
    #[must_use]
    pub fn from_pages(root: &Arc<Page>, base_url: &str) -> Self {
        let mut index = Self::new();
        index.add_tree(root, base_url);
        index
    }

    /// Register a page tree, prefixing URLs with the site base.
    pub fn add_tree(&mut self, page: &Arc<Page>, base_url: &str) {
        let url = format!("{}{}", base_url.trim_end_matches('/'), page.url);
        self.insert_page(page.id.clone(), url);
        for subpage in &page.subpages {
            self.add_tree(subpage, base_url);
        }
    }

    /// Register a page identifier.
    pub fn insert_page(&mut self, id: impl Into<String>, url: impl Into<String>) {
        self.pages.insert(id.into(), url.into());
    }

    /// Register an in-document anchor and the URL of the page carrying it.
    pub fn insert_anchor(&mut self, fragment: impl Into<String>, url: impl Into<String>) {
        self.anchors.insert(fragment.into(), url.into());
    }

    /// Whether a page identifier is known.
    #[must_use]
    pub fn contains_page(&self, id: &str) -> bool {
        self.pages.contains_key(id)
    }

    /// Resolve a page identifier to its canonical URL.
    pub fn resolve_page(&self, id: &str) -> Result<String, LinkError> {
        self.pages
            .get(id)
            .cloned()
            .ok_or_else(|| LinkError::page(id))
    }

    /// Resolve an anchor fragment to a `url#fragment` reference.
    pub fn resolve_ref(&self, fragment: &str) -> Result<String, LinkError> {
        let url = self
            .anchors
            .get(fragment)
            .ok_or_else(|| LinkError::anchor(fragment))?;
        Ok(format!("{url}#{fragment}"))
    }
}
