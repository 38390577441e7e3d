//! Built-in shell renderer.
//!
//! Injects a render context into the packaged HTML shell. Asset tags come
//! from the client manifest's `initial` and `css` arrays; everything else in
//! the two manifests stays opaque so this crate is not coupled to the
//! bundler's manifest schema.

use std::sync::Arc;

use async_trait::async_trait;
use minijinja::{context, Environment};
use serde_json::Value;

use crate::traits::{
    BundleManifests, RenderContext, RenderEngine, RenderError, RendererFactory,
};

/// The packaged HTML shell, read once per build.
pub const SHELL_TEMPLATE: &str = include_str!("shell.html");

const TEMPLATE_NAME: &str = "shell.html";

/// Renders pages by instantiating the shell template.
#[derive(Debug)]
pub struct ShellRenderer {
    env: Environment<'static>,
    scripts: Vec<String>,
    styles: Vec<String>,
}

impl ShellRenderer {
    /// Build a renderer from the bundle manifests and the shell template.
    pub fn new(manifests: &BundleManifests, template: &str) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.add_template_owned(TEMPLATE_NAME.to_string(), template.to_string())
            .map_err(|e| RenderError::Construct(e.to_string()))?;

        Ok(Self {
            env,
            scripts: string_list(&manifests.client, "initial"),
            styles: string_list(&manifests.client, "css"),
        })
    }
}

/// Read a string-array field from a manifest, tolerating its absence.
fn string_list(manifest: &Value, key: &str) -> Vec<String> {
    manifest
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl RenderEngine for ShellRenderer {
    async fn render_to_string(&self, ctx: &RenderContext) -> Result<String, RenderError> {
        let template = self
            .env
            .get_template(TEMPLATE_NAME)
            .map_err(|e| RenderError::Construct(e.to_string()))?;

        template
            .render(context! {
                url => &ctx.url,
                lang => &ctx.lang,
                title => &ctx.title,
                user_head_tags => &ctx.user_head_tags,
                page_meta => &ctx.page_meta,
                scripts => &self.scripts,
                styles => &self.styles,
            })
            .map_err(|e| RenderError::Render {
                message: e.to_string(),
                detail: format!("{:#}", e),
            })
    }
}

/// Factory for [`ShellRenderer`].
#[derive(Debug, Default)]
pub struct ShellRendererFactory;

impl RendererFactory for ShellRendererFactory {
    fn create(
        &self,
        manifests: BundleManifests,
        template: &str,
    ) -> Result<Arc<dyn RenderEngine>, RenderError> {
        Ok(Arc::new(ShellRenderer::new(&manifests, template)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifests() -> BundleManifests {
        BundleManifests {
            server: json!({ "entry": "server-bundle.js" }),
            client: json!({
                "initial": ["app.ef56gh78.js"],
                "css": ["app.1a2b3c4d.css"]
            }),
        }
    }

    fn ctx() -> RenderContext {
        RenderContext {
            url: "/guide/".to_string(),
            user_head_tags: "<meta name=\"a\" content=\"b\">".to_string(),
            page_meta: "<meta name=\"robots\" content=\"noindex\">".to_string(),
            title: "Test".to_string(),
            lang: "en".to_string(),
        }
    }

    #[tokio::test]
    async fn injects_context_and_assets() {
        let renderer = ShellRenderer::new(&manifests(), SHELL_TEMPLATE).unwrap();

        let html = renderer.render_to_string(&ctx()).await.unwrap();

        assert!(html.contains("<html lang=\"en\">"));
        assert!(html.contains("<title>Test</title>"));
        assert!(html.contains("<meta name=\"a\" content=\"b\">"));
        assert!(html.contains("<meta name=\"robots\" content=\"noindex\">"));
        assert!(html.contains("<script src=\"/app.ef56gh78.js\" defer></script>"));
        assert!(html.contains("<link rel=\"stylesheet\" href=\"/app.1a2b3c4d.css\">"));
        assert!(html.contains("data-url=\"/guide/\""));
    }

    #[tokio::test]
    async fn tolerates_manifests_without_asset_lists() {
        let bare = BundleManifests {
            server: json!({}),
            client: json!({}),
        };
        let renderer = ShellRenderer::new(&bare, SHELL_TEMPLATE).unwrap();

        let html = renderer.render_to_string(&ctx()).await.unwrap();

        assert!(!html.contains("<script"));
        assert!(!html.contains("stylesheet"));
    }

    #[test]
    fn factory_builds_an_engine() {
        let engine = ShellRendererFactory.create(manifests(), SHELL_TEMPLATE);
        assert!(engine.is_ok());
    }

    #[test]
    fn invalid_template_fails_construction() {
        let err = ShellRenderer::new(&manifests(), "{% for %}").unwrap_err();
        assert!(matches!(err, RenderError::Construct(_)));
    }
}
