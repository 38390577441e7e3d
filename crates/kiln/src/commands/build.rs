//! Static site build command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use kiln_build::{BuildOptions, BuildPipeline};
use kiln_engine::{ProcessBundler, ShellRendererFactory};

/// The CLI's view of `site.toml`: only the `[build]` keys needed to wire up
/// the toolchain. The site model itself is loaded by the pipeline.
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    build: BuildSettings,
}

#[derive(Debug, Deserialize, Default)]
struct BuildSettings {
    /// External bundler command, e.g. ["node", "scripts/bundle.js"]
    bundler: Option<Vec<String>>,

    /// Bound on concurrently in-flight page renders
    concurrency: Option<usize>,
}

/// Load the CLI's slice of site.toml.
/// Returns an error if the config file exists but is malformed.
fn load_config(source: &Path) -> Result<ConfigFile> {
    let path = source.join("site.toml");
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Run the build command.
pub async fn run(source: PathBuf, output: Option<PathBuf>, production: bool) -> Result<()> {
    tracing::info!("Building site...");

    let config = load_config(&source)?;

    let bundler_command = config
        .build
        .bundler
        .ok_or_else(|| anyhow::anyhow!("site.toml is missing a [build] bundler command"))?;
    let bundler = ProcessBundler::new(&bundler_command)?.with_working_dir(source.clone());

    let options = BuildOptions {
        source_dir: source,
        output_dir: output,
        production,
        concurrency: config.build.concurrency,
    };

    let summary = BuildPipeline::new(options)
        .build(&bundler, &ShellRendererFactory)
        .await?;

    tracing::info!(
        "Rendered {} pages ({} skipped) in {}ms",
        summary.pages_rendered,
        summary.pages_skipped,
        summary.duration_ms
    );

    Ok(())
}
