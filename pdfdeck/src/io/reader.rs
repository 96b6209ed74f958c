//! Reading input files into [`SourceFile`]s.
//!
//! Files are read as raw bytes. Deciding whether they are PDFs, and decoding
//! them, happens at ingestion time in the session.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::io::reader::SourceReader;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = SourceReader::new();
//! let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let (results, stats) = reader.read_all(&paths, 4).await;
//! println!("read {} file(s), {}", stats.success_count, stats.format_total_size());
//! # Ok(())
//! # }
//! ```

use futures::stream::{self, StreamExt};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{PdfDeckError, Result};
use crate::ledger::SourceFile;
use crate::utils::format_file_size;

/// A file read from disk.
#[derive(Debug, Clone)]
pub struct ReadSource {
    /// The file contents, named after the file.
    pub file: SourceFile,

    /// Path the file was read from.
    pub path: PathBuf,

    /// Time taken to read the file.
    pub read_time: Duration,
}

impl ReadSource {
    /// File size in bytes.
    pub fn file_size(&self) -> u64 {
        self.file.bytes.len() as u64
    }
}

/// Result of a read operation (success or failure).
pub type ReadResult = Result<ReadSource>;

/// Statistics for a batch read.
#[derive(Debug, Clone)]
pub struct ReadStatistics {
    /// Number of files read.
    pub success_count: usize,

    /// Number of files that could not be read.
    pub failure_count: usize,

    /// Wall-clock time of the whole batch.
    pub total_time: Duration,

    /// Total size of the files read.
    pub total_size: u64,
}

impl ReadStatistics {
    fn from_results(results: &[ReadResult], total_time: Duration) -> Self {
        let mut success_count = 0;
        let mut failure_count = 0;
        let mut total_size = 0;

        for result in results {
            match result {
                Ok(read) => {
                    success_count += 1;
                    total_size += read.file_size();
                }
                Err(_) => failure_count += 1,
            }
        }

        Self {
            success_count,
            failure_count,
            total_time,
            total_size,
        }
    }

    /// Format total size as human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Reads input files, optionally several at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceReader;

impl SourceReader {
    /// Create a reader.
    pub fn new() -> Self {
        Self
    }

    /// Read a single file.
    ///
    /// The resulting [`SourceFile`] is named after the file name component of
    /// `path`.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the path does not exist and
    /// `FileNotAccessible` for any other read failure.
    pub async fn read(&self, path: &Path) -> Result<ReadSource> {
        let start = Instant::now();

        let bytes = tokio::fs::read(path).await.map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                PdfDeckError::file_not_found(path.to_path_buf())
            } else {
                PdfDeckError::FileNotAccessible {
                    path: path.to_path_buf(),
                    source: err,
                }
            }
        })?;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!(path = %path.display(), bytes = bytes.len(), "Read input file");

        Ok(ReadSource {
            file: SourceFile::new(name, bytes),
            path: path.to_path_buf(),
            read_time: start.elapsed(),
        })
    }

    /// Read files one after another, in order.
    pub async fn read_sequential(&self, paths: &[PathBuf]) -> Vec<ReadResult> {
        let mut results = Vec::with_capacity(paths.len());

        for path in paths {
            results.push(self.read(path).await);
        }

        results
    }

    /// Read up to `workers` files concurrently.
    ///
    /// Results are returned in the same order as `paths`.
    pub async fn read_parallel(&self, paths: &[PathBuf], workers: usize) -> Vec<ReadResult> {
        let workers = workers.max(1);
        let reader = *self;

        stream::iter(paths.iter().cloned())
            .map(|path| async move { reader.read(&path).await })
            .buffered(workers)
            .collect()
            .await
    }

    /// Read all files, in parallel for larger batches.
    ///
    /// # Returns
    ///
    /// The per-file results in input order, plus aggregate statistics.
    pub async fn read_all(
        &self,
        paths: &[PathBuf],
        max_workers: usize,
    ) -> (Vec<ReadResult>, ReadStatistics) {
        let start = Instant::now();

        let results = if paths.len() <= 3 {
            self.read_sequential(paths).await
        } else {
            self.read_parallel(paths, max_workers).await
        };

        let stats = ReadStatistics::from_results(&results, start.elapsed());
        (results, stats)
    }
}
