//! Site model for kiln.
//!
//! This crate holds the immutable model a build runs against: site
//! configuration, the page list, and the pure string rendering of head tags
//! and per-page meta elements.

pub mod config;
pub mod head;

pub use config::{prepare, Frontmatter, HeadTag, Page, SiteConfig, SiteError, SiteOptions};
pub use head::{render_head_tag, render_page_meta, render_user_head};
