//! Bundle manifest loading.

use std::path::{Path, PathBuf};

use kiln_engine::BundleManifests;

/// Subdirectory the bundler writes its manifests into.
pub const MANIFEST_DIR: &str = "manifest";

const SERVER_MANIFEST: &str = "server.json";
const CLIENT_MANIFEST: &str = "client.json";

/// Errors raised while loading the bundle manifests. A missing or malformed
/// manifest after a reportedly successful compile is a contract violation
/// between bundler and loader; nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Manifest missing after compile: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Manifest unreadable: {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },

    #[error("Failed to remove manifest directory: {0}")]
    Cleanup(std::io::Error),
}

/// Load the server and client manifests the bundler wrote, then delete the
/// manifest directory. Manifests are a build-time artifact, not a shipped
/// output.
pub async fn load_manifests(output_dir: &Path) -> Result<BundleManifests, ManifestError> {
    let dir = output_dir.join(MANIFEST_DIR);

    let server = read_manifest(&dir.join(SERVER_MANIFEST)).await?;
    let client = read_manifest(&dir.join(CLIENT_MANIFEST)).await?;

    tokio::fs::remove_dir_all(&dir)
        .await
        .map_err(ManifestError::Cleanup)?;

    tracing::debug!("Loaded manifests, removed {}", dir.display());

    Ok(BundleManifests { server, client })
}

async fn read_manifest(path: &Path) -> Result<serde_json::Value, ManifestError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ManifestError::Missing {
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(ManifestError::Invalid {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    };

    serde_json::from_slice(&bytes).map_err(|e| ManifestError::Invalid {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
