//! Bundler adapter that invokes an external toolchain command.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::report::{CompileReport, TargetConfig};
use crate::traits::{Bundler, CompileError};

/// Runs a configured bundler command once per build.
///
/// Protocol: the two target configs are written to the child's stdin as a
/// JSON array; the child writes a [`CompileReport`] JSON document to stdout
/// and exits zero. Its stderr passes through for diagnostics.
#[derive(Debug, Clone)]
pub struct ProcessBundler {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ProcessBundler {
    /// Create a bundler from a command line, e.g. `["node", "bundle.js"]`.
    pub fn new(command: &[String]) -> Result<Self, CompileError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| CompileError::Tool("empty bundler command".to_string()))?;

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            working_dir: None,
        })
    }

    /// Run the command from a specific directory.
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }
}

#[async_trait]
impl Bundler for ProcessBundler {
    async fn compile(&self, configs: &[TargetConfig; 2]) -> Result<CompileReport, CompileError> {
        let payload = serde_json::to_vec(configs).map_err(|e| CompileError::Tool(e.to_string()))?;

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        tracing::debug!("Invoking bundler: {} {}", self.program, self.args.join(" "));

        let mut child = cmd
            .spawn()
            .map_err(|e| CompileError::Tool(format!("{}: {}", self.program, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CompileError::Tool("bundler stdin unavailable".to_string()))?;
        stdin
            .write_all(&payload)
            .await
            .map_err(|e| CompileError::Tool(e.to_string()))?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| CompileError::Tool(e.to_string()))?;

        if !output.status.success() {
            return Err(CompileError::Tool(format!(
                "bundler exited with {}",
                output.status
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| CompileError::Tool(format!("unreadable compile report: {}", e)))
    }
}
