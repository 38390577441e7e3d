//! Head tag and page meta string rendering.
//!
//! Attribute values come from site configuration and are trusted: nothing is
//! escaped.

use serde_json::{Map, Value};

use crate::config::HeadTag;

/// Tag names emitted without a closing tag. Deliberately limited to the two
/// names sites put in head configuration, not the full HTML void-element set.
const UNCLOSED_TAGS: [&str; 2] = ["link", "meta"];

/// Render one head tag to its HTML string.
pub fn render_head_tag(tag: &HeadTag) -> String {
    let attrs = render_attrs(&tag.attrs);
    if UNCLOSED_TAGS.contains(&tag.tag.as_str()) {
        format!("<{}{}>", tag.tag, attrs)
    } else {
        format!(
            "<{}{}>{}</{}>",
            tag.tag,
            attrs,
            tag.inner_html.as_deref().unwrap_or(""),
            tag.tag
        )
    }
}

/// Render a page's meta entries as concatenated `<meta ...>` strings.
pub fn render_page_meta(entries: &[Map<String, Value>]) -> String {
    entries
        .iter()
        .map(|attrs| format!("<meta{}>", render_attrs(attrs)))
        .collect()
}

/// Render the configured head tags as one block, joined with a newline and
/// two-space indent. Identical for every page, so callers compute it once
/// per build.
pub fn render_user_head(tags: &[HeadTag]) -> String {
    tags.iter()
        .map(render_head_tag)
        .collect::<Vec<_>>()
        .join("\n  ")
}

fn render_attrs(attrs: &Map<String, Value>) -> String {
    if attrs.is_empty() {
        return String::new();
    }

    let pairs: Vec<String> = attrs
        .iter()
        .map(|(name, value)| format!("{}=\"{}\"", name, attr_value(value)))
        .collect();

    format!(" {}", pairs.join(" "))
}

fn attr_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
