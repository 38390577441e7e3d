//! Chunk-ordering correction for the bundler's CSS-extraction output.
//!
//! CSS extraction emits the style runtime as a separate `styles.<hash>.js`
//! chunk that must execute before `app.<hash>.js` for module resolution to
//! succeed, yet the two are emitted and loaded independently. Merging the
//! style chunk into the front of the app chunk makes the app chunk
//! self-sufficient; the style chunk is removed so it is never served.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use kiln_engine::{CompileReport, TargetKind, TargetReport};

fn style_chunk_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^styles\.\w{8}\.js$").unwrap())
}

fn app_chunk_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^app\.\w{8}\.js$").unwrap())
}

/// Errors raised during chunk stitching. A missing or ambiguous chunk means
/// the bundler's emitted-asset naming contract changed; fatal.
#[derive(Debug, thiserror::Error)]
pub enum StitchError {
    #[error("No {0} target in compile report")]
    MissingTarget(&'static str),

    #[error("Expected exactly one {pattern} asset, found {found}")]
    ChunkMismatch {
        pattern: &'static str,
        found: usize,
    },

    #[error("Failed to rewrite {name}: {source}")]
    Io {
        name: String,
        source: std::io::Error,
    },
}

/// Merge the style chunk into the app chunk, style content first.
pub async fn stitch_chunks(output_dir: &Path, report: &CompileReport) -> Result<(), StitchError> {
    let server = report
        .target(TargetKind::Server)
        .ok_or(StitchError::MissingTarget("server"))?;

    let style_name = find_chunk(server, style_chunk_re(), "styles.<hash>.js")?;
    let app_name = find_chunk(server, app_chunk_re(), "app.<hash>.js")?;

    let style_path = output_dir.join(style_name);
    let app_path = output_dir.join(app_name);

    // Style content must be in memory before its file is removed; the app
    // chunk is read only after that removal.
    let style = tokio::fs::read_to_string(&style_path)
        .await
        .map_err(|e| io_error(style_name, e))?;
    tokio::fs::remove_file(&style_path)
        .await
        .map_err(|e| io_error(style_name, e))?;

    let app = tokio::fs::read_to_string(&app_path)
        .await
        .map_err(|e| io_error(app_name, e))?;
    tokio::fs::write(&app_path, format!("{}{}", style, app))
        .await
        .map_err(|e| io_error(app_name, e))?;

    tracing::debug!("Merged {} into {}", style_name, app_name);

    Ok(())
}

fn find_chunk<'r>(
    target: &'r TargetReport,
    re: &Regex,
    pattern: &'static str,
) -> Result<&'r str, StitchError> {
    let matches: Vec<&str> = target
        .assets
        .iter()
        .filter(|a| re.is_match(&a.name))
        .map(|a| a.name.as_str())
        .collect();

    match matches.as_slice() {
        [name] => Ok(*name),
        other => Err(StitchError::ChunkMismatch {
            pattern,
            found: other.len(),
        }),
    }
}

fn io_error(name: &str, source: std::io::Error) -> StitchError {
    StitchError::Io {
        name: name.to_string(),
        source,
    }
}
