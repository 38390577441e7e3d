//! Site configuration and the prepared site model.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

/// Name of the site configuration file under the source directory.
pub const SITE_FILE: &str = "site.toml";

/// Site-wide settings from the `[site]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Document title used for every page
    #[serde(default = "default_title")]
    pub title: String,

    /// Document language attribute
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Tags injected into every page's `<head>`, in declaration order
    #[serde(default)]
    pub head: Vec<HeadTag>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            lang: default_lang(),
            head: Vec::new(),
        }
    }
}

fn default_title() -> String {
    "Site".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

/// One element destined for the document `<head>`.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadTag {
    /// HTML tag name
    pub tag: String,

    /// Attributes, rendered in declaration order
    #[serde(default)]
    pub attrs: Map<String, Value>,

    /// Inner HTML for tags that take a closing tag
    #[serde(default)]
    pub inner_html: Option<String>,
}

/// A page to be pre-rendered.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    /// Site-relative URL, always starting with `/`
    pub path: String,

    /// Optional page-level metadata
    #[serde(default)]
    pub frontmatter: Option<Frontmatter>,
}

impl Page {
    /// Site-relative path of the fallback not-found page.
    pub const NOT_FOUND_PATH: &'static str = "/404.html";

    /// The synthetic fallback page emitted when the site defines none.
    pub fn not_found() -> Self {
        Self {
            path: Self::NOT_FOUND_PATH.to_string(),
            frontmatter: None,
        }
    }
}

/// Page-level metadata carried alongside the path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Frontmatter {
    /// Meta elements for this page, one attribute mapping per element
    #[serde(default)]
    pub meta: Option<Vec<Map<String, Value>>>,

    /// Remaining frontmatter keys, kept for collaborators downstream
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The prepared site model. Computed once at the start of a build and never
/// mutated afterward.
#[derive(Debug, Clone)]
pub struct SiteOptions {
    /// Site source directory (holds `site.toml`)
    pub source_dir: PathBuf,

    /// Output directory the build writes into
    pub output_dir: PathBuf,

    /// Site-wide settings
    pub site: SiteConfig,

    /// Pages to pre-render, in declaration order
    pub pages: Vec<Page>,
}

/// Errors raised while preparing the site model.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Page path must start with '/': {0}")]
    PagePath(String),
}

/// On-disk layout of `site.toml`.
#[derive(Debug, Default, Deserialize)]
struct SiteFile {
    #[serde(default)]
    site: SiteConfig,

    #[serde(default)]
    build: BuildSection,

    #[serde(default)]
    pages: Vec<Page>,
}

/// The `[build]` keys this crate cares about. The CLI reads its own view of
/// the same section for bundler wiring.
#[derive(Debug, Deserialize)]
struct BuildSection {
    #[serde(default = "default_output")]
    output: String,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

fn default_output() -> String {
    "dist".to_string()
}

/// Load the site model from `site.toml` under `source_dir`.
///
/// A caller-supplied output directory overrides the configured one; the
/// configured one is resolved relative to the source directory.
pub fn prepare(source_dir: &Path, output_override: Option<&Path>) -> Result<SiteOptions, SiteError> {
    let path = source_dir.join(SITE_FILE);
    let content = fs::read_to_string(&path).map_err(|e| SiteError::Read {
        path: path.clone(),
        source: e,
    })?;

    let file: SiteFile = toml::from_str(&content).map_err(|e| SiteError::Parse {
        path,
        message: e.to_string(),
    })?;

    for page in &file.pages {
        if !page.path.starts_with('/') {
            return Err(SiteError::PagePath(page.path.clone()));
        }
    }

    let output_dir = match output_override {
        Some(dir) => dir.to_path_buf(),
        None => source_dir.join(&file.build.output),
    };

    Ok(SiteOptions {
        source_dir: source_dir.to_path_buf(),
        output_dir,
        site: file.site,
        pages: file.pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_site(dir: &Path, content: &str) {
        fs::write(dir.join(SITE_FILE), content).unwrap();
    }

    #[test]
    fn prepares_site_from_toml() {
        let temp = tempdir().unwrap();
        write_site(
            temp.path(),
            r#"
[site]
title = "Test Site"
lang = "de"

[[site.head]]
tag = "meta"
attrs = { name = "description", content = "hello" }

[build]
output = "out"

[[pages]]
path = "/"

[[pages]]
path = "/guide/index.html"
frontmatter = { meta = [{ name = "robots", content = "noindex" }] }
"#,
        );

        let site = prepare(temp.path(), None).unwrap();

        assert_eq!(site.site.title, "Test Site");
        assert_eq!(site.site.lang, "de");
        assert_eq!(site.site.head.len(), 1);
        assert_eq!(site.output_dir, temp.path().join("out"));
        assert_eq!(site.pages.len(), 2);

        let meta = site.pages[1].frontmatter.as_ref().unwrap().meta.as_ref().unwrap();
        assert_eq!(meta[0]["name"], "robots");
    }

    #[test]
    fn applies_defaults_for_missing_sections() {
        let temp = tempdir().unwrap();
        write_site(temp.path(), "[[pages]]\npath = \"/\"\n");

        let site = prepare(temp.path(), None).unwrap();

        assert_eq!(site.site.title, "Site");
        assert_eq!(site.site.lang, "en");
        assert!(site.site.head.is_empty());
        assert_eq!(site.output_dir, temp.path().join("dist"));
    }

    #[test]
    fn output_override_wins() {
        let temp = tempdir().unwrap();
        write_site(temp.path(), "[build]\noutput = \"configured\"\n");

        let target = temp.path().join("elsewhere");
        let site = prepare(temp.path(), Some(&target)).unwrap();

        assert_eq!(site.output_dir, target);
    }

    #[test]
    fn rejects_relative_page_paths() {
        let temp = tempdir().unwrap();
        write_site(temp.path(), "[[pages]]\npath = \"about.html\"\n");

        let err = prepare(temp.path(), None).unwrap_err();

        assert!(matches!(err, SiteError::PagePath(p) if p == "about.html"));
    }

    #[test]
    fn missing_site_file_is_a_read_error() {
        let temp = tempdir().unwrap();

        let err = prepare(temp.path(), None).unwrap_err();

        assert!(matches!(err, SiteError::Read { .. }));
    }

    #[test]
    fn attrs_keep_declaration_order() {
        let temp = tempdir().unwrap();
        write_site(
            temp.path(),
            r#"
[[site.head]]
tag = "meta"
attrs = { zebra = "1", alpha = "2" }
"#,
        );

        let site = prepare(temp.path(), None).unwrap();
        let keys: Vec<&String> = site.site.head[0].attrs.keys().collect();

        assert_eq!(keys, ["zebra", "alpha"]);
    }
}
