//! Delivering export artifacts to disk.
//!
//! Writes are atomic by default: the payload goes to a hidden temporary file
//! next to the destination, which is then renamed into place.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::export::ExportArtifact;
//! use pdfdeck::io::writer::ArtifactWriter;
//! use std::path::Path;
//!
//! # async fn example(artifact: ExportArtifact) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = ArtifactWriter::new();
//! let stats = writer.write(&artifact, Path::new("out")).await?;
//! println!("wrote {} ({})", stats.output_path.display(), stats.format_file_size());
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;
use tracing::debug;

use crate::error::{PdfDeckError, Result};
use crate::export::ExportArtifact;
use crate::utils::format_file_size;

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,

    /// MIME type of the payload.
    pub mime: &'static str,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writes artifacts into an output directory.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactWriter {
    atomic: bool,
}

impl ArtifactWriter {
    /// Create a writer that writes atomically.
    pub fn new() -> Self {
        Self { atomic: true }
    }

    /// Create a writer without atomic writes.
    pub fn non_atomic() -> Self {
        Self { atomic: false }
    }

    /// Path an artifact is written to inside `dir`.
    pub fn output_path(&self, artifact: &ExportArtifact, dir: &Path) -> PathBuf {
        dir.join(&artifact.filename)
    }

    /// Write an artifact into `dir` under its own file name.
    ///
    /// # Errors
    ///
    /// Returns `FailedToWrite` if the file cannot be created, written, or
    /// renamed into place.
    pub async fn write(&self, artifact: &ExportArtifact, dir: &Path) -> Result<WriteStatistics> {
        let path = self.output_path(artifact, dir);
        let mut stats = self.write_bytes(artifact.bytes.clone(), &path).await?;
        stats.mime = artifact.mime;
        Ok(stats)
    }

    /// Write raw bytes to `path`.
    pub async fn write_bytes(&self, bytes: Vec<u8>, path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let atomic = self.atomic;

        let stats = task::spawn_blocking(move || {
            let start = Instant::now();

            let write_path = if atomic {
                temp_path_for(&path_buf)
            } else {
                path_buf.clone()
            };

            let failed = |path: &Path, source: std::io::Error| PdfDeckError::FailedToWrite {
                path: path.to_path_buf(),
                source,
            };

            let file = std::fs::File::create(&write_path).map_err(|e| failed(&write_path, e))?;
            let mut writer = std::io::BufWriter::new(file);
            if let Err(e) = write_payload(&mut writer, &bytes) {
                drop(writer);
                if atomic {
                    let _ = std::fs::remove_file(&write_path);
                }
                return Err(failed(&write_path, e));
            }
            drop(writer);

            if atomic {
                std::fs::rename(&write_path, &path_buf).map_err(|e| {
                    let _ = std::fs::remove_file(&write_path);
                    failed(&path_buf, e)
                })?;
            }

            Ok::<_, PdfDeckError>(WriteStatistics {
                write_time: start.elapsed(),
                file_size: bytes.len() as u64,
                output_path: path_buf,
                mime: "application/octet-stream",
            })
        })
        .await
        .map_err(|e| PdfDeckError::Io(std::io::Error::other(format!("Write task failed: {e}"))))??;

        debug!(path = %stats.output_path.display(), bytes = stats.file_size, "Wrote output");
        Ok(stats)
    }

    /// Check that `dir` exists and is writable.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the directory is missing or read-only.
    pub async fn can_write(&self, dir: &Path) -> Result<()> {
        let metadata = tokio::fs::metadata(dir).await.map_err(|_| {
            PdfDeckError::invalid_config(format!(
                "Output directory does not exist: {}",
                dir.display()
            ))
        })?;

        if !metadata.is_dir() {
            return Err(PdfDeckError::invalid_config(format!(
                "Output path is not a directory: {}",
                dir.display()
            )));
        }

        if metadata.permissions().readonly() {
            return Err(PdfDeckError::invalid_config(format!(
                "Output directory is not writable: {}",
                dir.display()
            )));
        }

        Ok(())
    }

    /// Check if an output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}

impl Default for ArtifactWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_payload(writer: &mut impl Write, bytes: &[u8]) -> std::io::Result<()> {
    writer.write_all(bytes)?;
    writer.flush()
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
