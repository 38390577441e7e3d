//! External toolchain seams for kiln.
//!
//! The build pipeline treats the bundler and the server-side renderer as
//! collaborators behind traits. This crate defines those traits and the wire
//! types they exchange, plus two adapters: a bundler that invokes an external
//! command, and a renderer that injects pages into the packaged HTML shell.

pub mod process;
pub mod report;
pub mod shell;
pub mod traits;

pub use process::ProcessBundler;
pub use report::{Asset, CompileReport, TargetConfig, TargetKind, TargetReport};
pub use shell::{ShellRenderer, ShellRendererFactory, SHELL_TEMPLATE};
pub use traits::{
    BundleManifests, Bundler, CompileError, RenderContext, RenderEngine, RenderError,
    RendererFactory,
};
