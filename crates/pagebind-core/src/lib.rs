//! Core types for Pagebind.
//!
//! Interface types the templating engine consumes: parsed frontmatter,
//! the immutable [`Page`] entity, and site configuration. Discovery and
//! body rendering happen in external collaborators; this crate only
//! models their resolved output.

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod page;

pub use config::SiteConfig;
pub use error::{CoreError, Result};
pub use frontmatter::{Frontmatter, FrontmatterFormat, parse_frontmatter, split_frontmatter};
pub use page::Page;
