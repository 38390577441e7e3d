//! Compile report wire types shared with the external bundler.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One of the two compilation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Browser-facing bundle
    Client,
    /// Node-side bundle used for pre-rendering
    Server,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }
}

/// Configuration handed to the bundler for one target. Opaque to the
/// pipeline beyond construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub target: TargetKind,

    /// Directory the bundler writes bundles and manifests into
    pub output_dir: PathBuf,

    /// Production mode, passed explicitly rather than through the
    /// environment
    pub production: bool,
}

impl TargetConfig {
    pub fn new(target: TargetKind, output_dir: PathBuf, production: bool) -> Self {
        Self {
            target,
            output_dir,
            production,
        }
    }
}

/// An emitted bundle asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// File name relative to the output directory
    pub name: String,
}

/// Compile outcome for one target. Asset names only; module-level detail is
/// stripped before the report crosses the process boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetReport {
    pub target: TargetKind,

    #[serde(default)]
    pub assets: Vec<Asset>,

    #[serde(default)]
    pub errors: Vec<String>,
}

/// Aggregated result of one dual-target compile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileReport {
    pub targets: Vec<TargetReport>,
}

impl CompileReport {
    /// Look up the report for one target.
    pub fn target(&self, kind: TargetKind) -> Option<&TargetReport> {
        self.targets.iter().find(|t| t.target == kind)
    }

    /// Whether any target reported errors.
    pub fn has_errors(&self) -> bool {
        self.targets.iter().any(|t| !t.errors.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bundler_report_json() {
        let report: CompileReport = serde_json::from_str(
            r#"{
                "targets": [
                    { "target": "client", "assets": [{ "name": "app.ef56gh78.js" }] },
                    { "target": "server", "assets": [], "errors": ["boom"] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(report.targets.len(), 2);
        assert_eq!(
            report.target(TargetKind::Client).unwrap().assets[0].name,
            "app.ef56gh78.js"
        );
        assert!(report.has_errors());
    }

    #[test]
    fn target_configs_serialize_lowercase() {
        let config = TargetConfig::new(TargetKind::Server, PathBuf::from("dist"), true);

        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["target"], "server");
        assert_eq!(json["production"], true);
    }

    #[test]
    fn clean_report_has_no_errors() {
        let report = CompileReport {
            targets: vec![TargetReport {
                target: TargetKind::Client,
                assets: vec![],
                errors: vec![],
            }],
        };

        assert!(!report.has_errors());
        assert!(report.target(TargetKind::Server).is_none());
    }
}
