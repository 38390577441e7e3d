//! Page rendering and emission.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use kiln_engine::{RenderContext, RenderEngine, RenderError};
use kiln_site::{render_page_meta, render_user_head, Page, SiteOptions};

/// Errors raised while writing rendered pages. Render failures are not
/// errors at this level; they are logged and the page is skipped.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Render task failed: {0}")]
    Join(String),
}

/// Outcome counters for one emission pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmitSummary {
    /// Pages rendered and written
    pub rendered: usize,

    /// Pages skipped after a render failure
    pub skipped: usize,
}

/// Renders every page through the engine and writes the HTML tree.
pub struct PageEmitter {
    engine: Arc<dyn RenderEngine>,
    output_dir: PathBuf,
    user_head_tags: String,
    title: String,
    lang: String,
    limit: Option<Arc<Semaphore>>,
}

impl PageEmitter {
    /// Create an emitter for one build. The configured head block is
    /// rendered here, once, and shared by every page.
    pub fn new(
        engine: Arc<dyn RenderEngine>,
        site: &SiteOptions,
        concurrency: Option<usize>,
    ) -> Self {
        Self {
            engine,
            output_dir: site.output_dir.clone(),
            user_head_tags: render_user_head(&site.site.head),
            title: site.site.title.clone(),
            lang: site.site.lang.clone(),
            limit: concurrency.map(|n| Arc::new(Semaphore::new(n))),
        }
    }

    /// Render and write all pages, plus the fallback not-found page when the
    /// site does not define one.
    ///
    /// Every page is launched before any is awaited; the pass resolves only
    /// once each page has either been written or skipped. A failed render
    /// skips that page without stopping the rest; filesystem failures abort.
    pub async fn emit_all(&self, pages: &[Page]) -> Result<EmitSummary, EmitError> {
        let mut handles: Vec<JoinHandle<Result<bool, EmitError>>> =
            Vec::with_capacity(pages.len() + 1);

        for page in pages {
            handles.push(self.spawn_page(page.clone()));
        }

        if !pages.iter().any(|p| p.path == Page::NOT_FOUND_PATH) {
            handles.push(self.spawn_page(Page::not_found()));
        }

        let mut summary = EmitSummary::default();
        for handle in handles {
            match handle.await.map_err(|e| EmitError::Join(e.to_string()))? {
                Ok(true) => summary.rendered += 1,
                Ok(false) => summary.skipped += 1,
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }

    fn spawn_page(&self, page: Page) -> JoinHandle<Result<bool, EmitError>> {
        let engine = Arc::clone(&self.engine);
        let limit = self.limit.clone();
        let path = output_path(&self.output_dir, &page.path);
        let ctx = RenderContext {
            url: page.path,
            user_head_tags: self.user_head_tags.clone(),
            page_meta: page
                .frontmatter
                .as_ref()
                .and_then(|f| f.meta.as_deref())
                .map(render_page_meta)
                .unwrap_or_default(),
            title: self.title.clone(),
            lang: self.lang.clone(),
        };

        tokio::spawn(async move {
            let _permit = match &limit {
                Some(semaphore) => Some(semaphore.acquire().await.expect("semaphore closed")),
                None => None,
            };

            match engine.render_to_string(&ctx).await {
                Ok(html) => {
                    if let Some(parent) = path.parent() {
                        tokio::fs::create_dir_all(parent).await.map_err(|e| {
                            EmitError::Write {
                                path: parent.to_path_buf(),
                                source: e,
                            }
                        })?;
                    }
                    tokio::fs::write(&path, html)
                        .await
                        .map_err(|e| EmitError::Write {
                            path: path.clone(),
                            source: e,
                        })?;
                    Ok(true)
                }
                Err(e) => {
                    tracing::error!("Failed to render {}: {}", ctx.url, e);
                    if let RenderError::Render { detail, .. } = &e {
                        if !detail.is_empty() {
                            tracing::error!("{}", detail);
                        }
                    }
                    Ok(false)
                }
            }
        })
    }
}

/// Map a site-relative page path to its output file. `/` becomes
/// `index.html`; any other path drops the leading slash and is used
/// verbatim.
pub fn output_path(output_dir: &Path, page_path: &str) -> PathBuf {
    if page_path == "/" {
        output_dir.join("index.html")
    } else {
        output_dir.join(page_path.trim_start_matches('/'))
    }
}
