//! Merge and extract.
//!
//! Every export works on the same page choice: the selected pages, or all
//! pages when nothing is selected. Each distinct source file among the
//! chosen pages is loaded exactly once per call; the loaded documents are
//! dropped when the call returns.

use std::collections::HashMap;
use tracing::{debug, info};

use super::naming;
use crate::config::ExtractMode;
use crate::engine::{ArchiveBuilder, PageComposer};
use crate::error::{PdfDeckError, Result};
use crate::ledger::{PageLedger, PageRecord};

/// MIME type of PDF artifacts.
pub const PDF_MIME: &str = "application/pdf";

/// MIME type of ZIP artifacts.
pub const ZIP_MIME: &str = "application/zip";

/// A finished export, ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// File name to deliver the payload under.
    pub filename: String,
    /// MIME type of `bytes`.
    pub mime: &'static str,
    /// The payload.
    pub bytes: Vec<u8>,
    /// Number of pages exported.
    pub page_count: usize,
    /// Entry names when the payload is a ZIP archive.
    pub entries: Vec<String>,
}

impl ExportArtifact {
    /// Whether the payload is a ZIP archive.
    pub fn is_archive(&self) -> bool {
        self.mime == ZIP_MIME
    }
}

/// Turns ledger pages into deliverable artifacts through a [`PageComposer`].
#[derive(Debug, Clone)]
pub struct ExportPipeline<C> {
    composer: C,
}

type SourceCache<S> = HashMap<usize, S>;

impl<C: PageComposer> ExportPipeline<C> {
    /// Create a pipeline around a composer.
    pub fn new(composer: C) -> Self {
        Self { composer }
    }

    /// The composer used for every export.
    pub fn composer(&self) -> &C {
        &self.composer
    }

    /// Merge the chosen pages, in ledger order, into one PDF.
    ///
    /// The artifact is named `{name}.pdf`, where `name` defaults to the base
    /// name of the first uploaded file.
    ///
    /// # Errors
    ///
    /// - `NoPages` if the ledger is empty
    /// - source decode errors, unchanged
    /// - `PageCopy` naming the 1-based processing index of a failing page
    /// - `Serialization` if the finished document cannot be written
    pub async fn merge(&self, ledger: &PageLedger, name: Option<&str>) -> Result<ExportArtifact> {
        let records = ledger.export_selection()?;
        let name = match name {
            Some(name) => naming::base_name(name).to_string(),
            None => ledger
                .source_file(0)
                .map(|file| file.base_name().to_string())
                .ok_or(PdfDeckError::NoPages)?,
        };

        info!(pages = records.len(), name = %name, "Merging pages");

        let sources = self.load_sources(ledger, &records)?;
        let bytes = self.build_document(&sources, &records).await?;

        info!(bytes = bytes.len(), "Merge complete");

        Ok(ExportArtifact {
            filename: naming::pdf_filename(&name),
            mime: PDF_MIME,
            bytes,
            page_count: records.len(),
            entries: Vec::new(),
        })
    }

    /// Extract the chosen pages.
    ///
    /// With [`ExtractMode::Single`] this is a merge with the default name
    /// `extracted`. With [`ExtractMode::PerPage`] every chosen page becomes
    /// its own document named `{name}_page-{position}.pdf`, where `position`
    /// is the page's 1-based position in the whole ledger. More than one
    /// such document is packed into `{name}_extract.zip`.
    ///
    /// # Errors
    ///
    /// As [`ExportPipeline::merge`], plus `Archive` if the ZIP cannot be
    /// built.
    pub async fn extract(
        &self,
        ledger: &PageLedger,
        name: Option<&str>,
        mode: ExtractMode,
    ) -> Result<ExportArtifact> {
        let records = ledger.export_selection()?;
        let name = name
            .map(naming::base_name)
            .unwrap_or(naming::DEFAULT_EXTRACT_NAME)
            .to_string();

        info!(pages = records.len(), name = %name, ?mode, "Extracting pages");

        let sources = self.load_sources(ledger, &records)?;

        let artifact = match mode {
            ExtractMode::Single => ExportArtifact {
                filename: naming::pdf_filename(&name),
                mime: PDF_MIME,
                bytes: self.build_document(&sources, &records).await?,
                page_count: records.len(),
                entries: Vec::new(),
            },
            ExtractMode::PerPage => self.extract_per_page(ledger, &sources, &records, &name).await?,
        };

        info!(
            filename = %artifact.filename,
            bytes = artifact.bytes.len(),
            "Extraction complete"
        );

        Ok(artifact)
    }

    async fn extract_per_page(
        &self,
        ledger: &PageLedger,
        sources: &SourceCache<C::Source>,
        records: &[&PageRecord],
        name: &str,
    ) -> Result<ExportArtifact> {
        let mut documents = Vec::with_capacity(records.len());

        for (offset, record) in records.iter().enumerate() {
            let index = offset + 1;
            let position = ledger
                .position_of(record.id())
                .map(|position| position + 1)
                .ok_or_else(|| {
                    PdfDeckError::page_copy(
                        index,
                        PdfDeckError::invalid_argument(format!("page {} left the ledger", record.id())),
                    )
                })?;

            let bytes = self
                .single_page_document(sources, record)
                .map_err(|err| PdfDeckError::page_copy(index, err))?;
            debug!(index, position, page = %record.id(), "Extracted page");

            documents.push((naming::page_filename(name, position), bytes));
            tokio::task::yield_now().await;
        }

        if let [(filename, bytes)] = documents.as_mut_slice() {
            return Ok(ExportArtifact {
                filename: std::mem::take(filename),
                mime: PDF_MIME,
                bytes: std::mem::take(bytes),
                page_count: 1,
                entries: Vec::new(),
            });
        }

        let mut archive = ArchiveBuilder::new();
        for (filename, bytes) in &documents {
            archive.add_entry(filename, bytes)?;
        }
        let entries = archive.entries().to_vec();

        Ok(ExportArtifact {
            filename: naming::archive_filename(name),
            mime: ZIP_MIME,
            bytes: archive.finish()?,
            page_count: documents.len(),
            entries,
        })
    }

    /// Load each distinct source of `records` once, in first-appearance order.
    fn load_sources(
        &self,
        ledger: &PageLedger,
        records: &[&PageRecord],
    ) -> Result<SourceCache<C::Source>> {
        let mut sources = SourceCache::new();

        for record in records {
            let index = record.source_file_index();
            if sources.contains_key(&index) {
                continue;
            }

            let file = ledger.source_file(index).ok_or_else(|| {
                PdfDeckError::invalid_argument(format!("unknown source file index {index}"))
            })?;
            debug!(source = %file.name, "Loading source document");
            sources.insert(index, self.composer.load(&file.name, &file.bytes)?);
        }

        Ok(sources)
    }

    /// All `records` in one document; page failures carry their 1-based index.
    async fn build_document(
        &self,
        sources: &SourceCache<C::Source>,
        records: &[&PageRecord],
    ) -> Result<Vec<u8>> {
        let mut target = self.composer.create()?;

        for (offset, record) in records.iter().enumerate() {
            let index = offset + 1;
            self.copy_into(&mut target, sources, record)
                .map_err(|err| PdfDeckError::page_copy(index, err))?;
            debug!(
                index,
                page = %record.id(),
                source_page = record.source_page_number(),
                rotation = record.rotation().as_degrees(),
                "Copied page"
            );
            tokio::task::yield_now().await;
        }

        self.composer.serialize(target)
    }

    fn single_page_document(
        &self,
        sources: &SourceCache<C::Source>,
        record: &PageRecord,
    ) -> Result<Vec<u8>> {
        let mut target = self.composer.create()?;
        self.copy_into(&mut target, sources, record)?;
        self.composer.serialize(target)
    }

    /// Copy one record into `target`, applying its rotation when non-zero.
    fn copy_into(
        &self,
        target: &mut C::Target,
        sources: &SourceCache<C::Source>,
        record: &PageRecord,
    ) -> Result<()> {
        let source = sources.get(&record.source_file_index()).ok_or_else(|| {
            PdfDeckError::construct(format!(
                "source file {} was not loaded",
                record.source_file_index()
            ))
        })?;

        let page_index = (record.source_page_number() as usize)
            .checked_sub(1)
            .ok_or_else(|| PdfDeckError::invalid_argument("source page numbers start at 1"))?;

        let page = self.composer.copy_page(target, source, page_index)?;
        if !record.rotation().is_none() {
            self.composer.set_rotation(target, page, record.rotation())?;
        }
        self.composer.append_page(target, page)
    }
}
