//! Export pipeline: merge and extract chosen pages into deliverable files.

pub mod naming;
pub mod pipeline;

pub use pipeline::{ExportArtifact, ExportPipeline, PDF_MIME, ZIP_MIME};
