//! Trait seams for the external bundler and renderer.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::report::{CompileReport, TargetConfig};

/// The complete input to one page render. Constructed per page, never
/// shared between renders.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Site-relative URL of the page
    pub url: String,

    /// Pre-rendered head tags from site configuration
    pub user_head_tags: String,

    /// Pre-rendered per-page meta elements
    pub page_meta: String,

    /// Document title
    pub title: String,

    /// Document language
    pub lang: String,
}

/// The two bundle manifests, read once after compilation. Their schema is
/// owned by the renderer; the pipeline passes them through opaquely.
#[derive(Debug, Clone)]
pub struct BundleManifests {
    pub server: Value,
    pub client: Value,
}

/// Errors from the compile phase. Always fatal to the build.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("Bundler invocation failed: {0}")]
    Tool(String),

    #[error("Compilation failed with {} error(s)", errors.len())]
    Failed { errors: Vec<String> },
}

/// Errors from renderer construction or a single page render.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("{message}")]
    Render { message: String, detail: String },

    #[error("Renderer construction failed: {0}")]
    Construct(String),
}

/// Dual-target bundler invocation. One call site per build; writing the
/// bundles and the two manifests to the output directory is the bundler's
/// side effect.
#[async_trait]
pub trait Bundler: Send + Sync {
    async fn compile(&self, configs: &[TargetConfig; 2]) -> Result<CompileReport, CompileError>;
}

/// Renders one page to a complete HTML string. Stateless per call;
/// concurrent calls are safe and independent.
#[async_trait]
pub trait RenderEngine: Send + Sync {
    async fn render_to_string(&self, ctx: &RenderContext) -> Result<String, RenderError>;
}

/// Builds a render engine from the bundle manifests and the shell template.
/// Invoked exactly once per build, after compilation.
pub trait RendererFactory: Send + Sync {
    fn create(
        &self,
        manifests: BundleManifests,
        template: &str,
    ) -> Result<Arc<dyn RenderEngine>, RenderError>;
}
