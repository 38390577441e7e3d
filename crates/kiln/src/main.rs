//! kiln CLI - pre-rendering static site build orchestrator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "Pre-rendering static site build orchestrator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a site.toml in the current directory
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Compile both bundles and pre-render every page
    Build {
        /// Site source directory
        #[arg(default_value = ".")]
        source: PathBuf,

        /// Output directory (defaults to site.toml or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Build without production optimizations
        #[arg(long)]
        dev: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(yes).await?;
        }
        Commands::Build {
            source,
            output,
            dev,
        } => {
            commands::build::run(source, output, !dev).await?;
        }
    }

    Ok(())
}
