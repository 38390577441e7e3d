//! Dual-target compilation step.

use kiln_engine::{Bundler, CompileError, CompileReport, TargetConfig};

/// Run the bundler over the client and server configs and vet the report.
///
/// Every target-level error line is surfaced before the aggregate failure is
/// returned; a clean report passes through for manifest loading and asset
/// stitching.
pub async fn compile_targets(
    bundler: &dyn Bundler,
    configs: &[TargetConfig; 2],
) -> Result<CompileReport, CompileError> {
    let report = bundler.compile(configs).await?;

    let errors: Vec<String> = report
        .targets
        .iter()
        .flat_map(|t| {
            t.errors
                .iter()
                .map(|e| format!("[{}] {}", t.target.as_str(), e))
        })
        .collect();

    if !errors.is_empty() {
        for error in &errors {
            tracing::error!("{}", error);
        }
        return Err(CompileError::Failed { errors });
    }

    Ok(report)
}
