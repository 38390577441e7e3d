//! Scaffold a site in the current directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing kiln site...");

    let config_path = Path::new("site.toml");
    if config_path.exists() && !yes {
        tracing::warn!("site.toml already exists. Use --yes to overwrite.");
        return Ok(());
    }

    fs::write(config_path, DEFAULT_CONFIG).context("Failed to write site.toml")?;
    tracing::info!("Created site.toml");

    tracing::info!("Point [build] bundler at your toolchain, then run 'kiln build'.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# kiln configuration

[site]
# Document title used for every page
title = "My Site"

# Document language attribute
lang = "en"

# Tags injected into every page's <head>, in order
[[site.head]]
tag = "meta"
attrs = { name = "description", content = "Built with kiln" }

[build]
# Output directory for the generated site
output = "dist"

# External bundler command. Receives the two target configs as a JSON array
# on stdin and must print a compile report as JSON on stdout.
bundler = ["node", "scripts/bundle.js"]

# Bound on concurrently in-flight page renders (unbounded when omitted)
# concurrency = 16

# Pages to pre-render. "/" becomes index.html; other paths are used verbatim.
[[pages]]
path = "/"
"#;
