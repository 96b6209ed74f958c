//! ZIP packaging for multi-file exports.

use std::io::{Cursor, Write};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::error::{PdfDeckError, Result};

/// Accumulates named entries and produces one ZIP payload.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    entries: Vec<String>,
}

impl ArchiveBuilder {
    /// Create an empty archive using Deflate compression.
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            entries: Vec::new(),
        }
    }

    /// Add a file entry.
    ///
    /// # Errors
    ///
    /// Returns `Archive` if the entry cannot be written, for example when
    /// the name is already taken.
    pub fn add_entry(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.writer
            .start_file(name, self.options)
            .map_err(|err| PdfDeckError::archive(format!("{name}: {err}")))?;
        self.writer
            .write_all(bytes)
            .map_err(|err| PdfDeckError::archive(format!("{name}: {err}")))?;
        self.entries.push(name.to_string());
        Ok(())
    }

    /// Names of the entries added so far, in order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Finish the archive and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self
            .writer
            .finish()
            .map_err(|err| PdfDeckError::archive(err.to_string()))?;
        Ok(cursor.into_inner())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}
