//! Build orchestration pipeline for kiln.
//!
//! Sequences the whole static build: dual-target compilation, manifest
//! loading, chunk stitching, renderer construction, and concurrent page
//! emission. A single broken page is skipped with a logged error; compile,
//! manifest, stitch, and filesystem failures abort the build.

pub mod compile;
pub mod emit;
pub mod manifest;
pub mod pipeline;
pub mod stitch;

pub use compile::compile_targets;
pub use emit::{output_path, EmitError, EmitSummary, PageEmitter};
pub use manifest::{load_manifests, ManifestError};
pub use pipeline::{BuildError, BuildOptions, BuildPipeline, BuildSummary};
pub use stitch::{stitch_chunks, StitchError};
