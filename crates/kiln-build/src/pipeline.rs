//! Build orchestration.

use std::path::PathBuf;
use std::time::Instant;

use kiln_engine::{
    Bundler, CompileError, RenderError, RendererFactory, TargetConfig, TargetKind, SHELL_TEMPLATE,
};
use kiln_site::{prepare, SiteError, SiteOptions};

use crate::compile::compile_targets;
use crate::emit::{EmitError, PageEmitter};
use crate::manifest::{load_manifests, ManifestError};
use crate::stitch::{stitch_chunks, StitchError};

/// Options for one build run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Site source directory (holds `site.toml`)
    pub source_dir: PathBuf,

    /// Overrides the configured output directory
    pub output_dir: Option<PathBuf>,

    /// Production mode, threaded into both target configs
    pub production: bool,

    /// Bound on concurrently in-flight page renders; unbounded when `None`
    pub concurrency: Option<usize>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: None,
            production: true,
            concurrency: None,
        }
    }
}

/// Errors that can abort a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Site(#[from] SiteError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Stitch(#[from] StitchError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("Failed to prepare output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result of a successful build.
#[derive(Debug)]
pub struct BuildSummary {
    /// Directory the site was written into
    pub output_dir: PathBuf,

    /// Pages rendered and written
    pub pages_rendered: usize,

    /// Pages skipped after a render failure
    pub pages_skipped: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,
}

/// Sequences the whole build: prepare, clean the output directory, compile
/// both targets, load manifests, stitch assets, construct the renderer, and
/// emit every page.
pub struct BuildPipeline {
    options: BuildOptions,
}

impl BuildPipeline {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub async fn build(
        &self,
        bundler: &dyn Bundler,
        factory: &dyn RendererFactory,
    ) -> Result<BuildSummary, BuildError> {
        let start = Instant::now();

        let site = prepare(&self.options.source_dir, self.options.output_dir.as_deref())?;
        self.clean_output(&site).await?;

        let configs = [
            TargetConfig::new(
                TargetKind::Client,
                site.output_dir.clone(),
                self.options.production,
            ),
            TargetConfig::new(
                TargetKind::Server,
                site.output_dir.clone(),
                self.options.production,
            ),
        ];

        tracing::info!("Compiling client and server bundles...");
        let report = compile_targets(bundler, &configs).await?;

        let manifests = load_manifests(&site.output_dir).await?;
        stitch_chunks(&site.output_dir, &report).await?;

        let engine = factory.create(manifests, SHELL_TEMPLATE)?;

        tracing::info!("Rendering {} pages...", site.pages.len());
        let emitter = PageEmitter::new(engine, &site, self.options.concurrency);
        let emitted = emitter.emit_all(&site.pages).await?;

        if emitted.skipped > 0 {
            tracing::warn!("{} page(s) failed to render and were skipped", emitted.skipped);
        }
        tracing::info!("Site generated in {}", site.output_dir.display());

        Ok(BuildSummary {
            output_dir: site.output_dir,
            pages_rendered: emitted.rendered,
            pages_skipped: emitted.skipped,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn clean_output(&self, site: &SiteOptions) -> Result<(), BuildError> {
        let out = &site.output_dir;

        if out.exists() {
            tokio::fs::remove_dir_all(out)
                .await
                .map_err(|e| BuildError::OutputDir {
                    path: out.clone(),
                    source: e,
                })?;
        }

        tokio::fs::create_dir_all(out)
            .await
            .map_err(|e| BuildError::OutputDir {
                path: out.clone(),
                source: e,
            })?;

        Ok(())
    }
}
