//! One editing session: a ledger plus the capabilities that fill and export it.
//!
//! A [`Session`] is created explicitly and owns everything it needs. Edits
//! take `&mut self` and exports take `&self`, so an edit can never run while
//! an export of the same session is in flight.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::config::{CompressionLevel, EditOp};
//! use pdfdeck::engine::{LopdfComposer, LopdfRasterizer};
//! use pdfdeck::ledger::SourceFile;
//! use pdfdeck::session::Session;
//!
//! # async fn example(bytes: Vec<u8>) -> pdfdeck::Result<()> {
//! let mut session = Session::new(
//!     LopdfRasterizer::new(),
//!     LopdfComposer::new(CompressionLevel::Standard),
//! );
//! session.ingest(vec![SourceFile::new("report.pdf", bytes)])?;
//! session.apply(&"rotate:1:90".parse::<EditOp>()?)?;
//! let artifact = session.merge(None).await?;
//! assert_eq!(artifact.filename, "report.pdf");
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use tracing::{info, warn};

use crate::config::{DEFAULT_THUMBNAIL_SCALE, EditOp, ExtractMode, MAX_THUMBNAIL_SCALE};
use crate::engine::{PageComposer, Rasterizer, Thumbnail};
use crate::error::{PdfDeckError, Result};
use crate::export::{ExportArtifact, ExportPipeline};
use crate::ledger::{PageData, PageId, PageLedger, PageRecord, Rotation, SourceFile};
use crate::utils::{has_pdf_extension, has_pdf_header};

/// Outcome of a successful [`Session::ingest`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Number of files added.
    pub files: usize,
    /// Number of page records created.
    pub pages: usize,
    /// Pages whose thumbnail could not be rendered.
    pub render_failures: usize,
}

/// Live page totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageCounts {
    /// Pages in the working document.
    pub total: usize,
    /// Pages currently selected.
    pub selected: usize,
}

/// Pixel size of a thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThumbnailSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// One row of the ordered view derived from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    /// 1-based working position.
    pub position: usize,
    /// Record id.
    pub id: PageId,
    /// Name of the source file.
    pub source_name: String,
    /// 1-based page number within the source.
    pub source_page: u32,
    /// Current rotation in degrees.
    pub rotation: Rotation,
    /// Selection state.
    pub selected: bool,
    /// Thumbnail size, `None` when the page renders blank.
    pub thumbnail: Option<ThumbnailSize>,
}

/// An editing session over uploaded PDFs.
pub struct Session<R: Rasterizer, C> {
    ledger: PageLedger,
    documents: Vec<R::Document>,
    rasterizer: R,
    pipeline: ExportPipeline<C>,
    thumbnail_scale: f32,
}

impl<R: Rasterizer, C: PageComposer> Session<R, C> {
    /// Create an empty session.
    pub fn new(rasterizer: R, composer: C) -> Self {
        Self {
            ledger: PageLedger::new(),
            documents: Vec::new(),
            rasterizer,
            pipeline: ExportPipeline::new(composer),
            thumbnail_scale: DEFAULT_THUMBNAIL_SCALE,
        }
    }

    /// Set the scale thumbnails are rendered at.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` unless `0 < scale <= 4`.
    pub fn with_thumbnail_scale(mut self, scale: f32) -> Result<Self> {
        if !(scale > 0.0 && scale <= MAX_THUMBNAIL_SCALE) {
            return Err(PdfDeckError::invalid_argument(format!(
                "thumbnail scale must be in (0, {MAX_THUMBNAIL_SCALE}], got {scale}"
            )));
        }
        self.thumbnail_scale = scale;
        Ok(self)
    }

    /// The underlying ledger.
    pub fn ledger(&self) -> &PageLedger {
        &self.ledger
    }

    /// The export pipeline.
    pub fn pipeline(&self) -> &ExportPipeline<C> {
        &self.pipeline
    }

    /// Add uploaded files, one record per page.
    ///
    /// Every file is checked before anything is decoded: a name ending in
    /// `.pdf` or content starting with `%PDF-` is required. Files are then
    /// decoded in order. If one fails to decode, the files before it stay in
    /// the session and the rest of the batch is skipped.
    ///
    /// # Errors
    ///
    /// - `NotAPdf` if any file fails the check; nothing is added
    /// - `SourceDecode` or `EncryptedPdf` for the first undecodable file
    pub fn ingest(&mut self, files: Vec<SourceFile>) -> Result<IngestReport> {
        if let Some(file) = files
            .iter()
            .find(|file| !has_pdf_extension(&file.name) && !has_pdf_header(&file.bytes))
        {
            return Err(PdfDeckError::not_a_pdf(&file.name));
        }

        let mut report = IngestReport::default();

        for file in files {
            let document = self.rasterizer.decode(&file.name, &file.bytes)?;
            let page_count = self.rasterizer.page_count(&document);
            let last_page = u32::try_from(page_count).map_err(|_| {
                PdfDeckError::source_decode(&file.name, format!("too many pages ({page_count})"))
            })?;
            let name = file.name.clone();

            let source_index = self.ledger.add_source_file(file);
            self.documents.push(document);

            for page_number in 1..=last_page {
                let thumbnail = self.render(source_index, page_number, Rotation::NONE);
                if thumbnail.is_none() {
                    report.render_failures += 1;
                }
                self.ledger
                    .add_page(PageData::new(source_index, page_number).with_thumbnail(thumbnail))?;
            }

            info!(file = %name, pages = page_count, "Added file");
            report.files += 1;
            report.pages += page_count;
        }

        Ok(report)
    }

    fn render(&self, source_index: usize, page_number: u32, rotation: Rotation) -> Option<Thumbnail> {
        let document = self.documents.get(source_index)?;
        match self
            .rasterizer
            .render(document, page_number, rotation, self.thumbnail_scale)
        {
            Ok(thumbnail) => Some(thumbnail),
            Err(err) => {
                warn!(source = source_index, page = page_number, error = %err, "Thumbnail render failed");
                None
            }
        }
    }

    /// Rotate a page and re-render its thumbnail at the new rotation.
    ///
    /// Returns the new rotation, or `None` if no page has `id`.
    pub fn rotate(&mut self, id: PageId, delta_degrees: i32) -> Result<Option<Rotation>> {
        let Some(rotation) = self.ledger.rotate_page(id, delta_degrees)? else {
            return Ok(None);
        };

        if let Some(page) = self.ledger.page(id) {
            let thumbnail = self.render(page.source_file_index(), page.source_page_number(), rotation);
            self.ledger.set_thumbnail(id, thumbnail);
        }

        Ok(Some(rotation))
    }

    /// Delete a page. Absent ids are ignored.
    pub fn remove(&mut self, id: PageId) -> Option<PageRecord> {
        self.ledger.remove_page(id)
    }

    /// Move the page at 0-based `from` to 0-based `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        self.ledger.reorder_pages(from, to)
    }

    /// Flip a page's selection.
    pub fn toggle_selection(&mut self, id: PageId) {
        self.ledger.toggle_selection(id);
    }

    /// Select or deselect every page.
    pub fn select_all(&mut self, selected: bool) {
        self.ledger.select_all(selected);
    }

    /// Drop all pages and files, as if the session were new.
    pub fn clear(&mut self) {
        self.ledger.clear();
        self.documents.clear();
    }

    /// Total and selected page counts.
    pub fn counts(&self) -> PageCounts {
        PageCounts {
            total: self.ledger.len(),
            selected: self.ledger.selected_pages().len(),
        }
    }

    /// The ordered view of the working document.
    pub fn views(&self) -> Vec<PageView> {
        self.ledger
            .pages()
            .iter()
            .enumerate()
            .map(|(index, page)| PageView {
                position: index + 1,
                id: page.id(),
                source_name: self
                    .ledger
                    .source_file(page.source_file_index())
                    .map(|file| file.name.clone())
                    .unwrap_or_default(),
                source_page: page.source_page_number(),
                rotation: page.rotation(),
                selected: page.is_selected(),
                thumbnail: page.thumbnail().map(|thumbnail| ThumbnailSize {
                    width: thumbnail.width(),
                    height: thumbnail.height(),
                }),
            })
            .collect()
    }

    /// Id of the page at a 1-based working position.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if there is no page at `position`.
    pub fn id_at(&self, position: usize) -> Result<PageId> {
        position
            .checked_sub(1)
            .and_then(|index| self.ledger.page_at(index))
            .map(PageRecord::id)
            .ok_or_else(|| {
                PdfDeckError::invalid_argument(format!(
                    "no page at position {position} (document has {} page(s))",
                    self.ledger.len()
                ))
            })
    }

    /// Apply an edit addressed by 1-based working positions.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a position does not exist; the ledger is
    /// left unchanged.
    pub fn apply(&mut self, op: &EditOp) -> Result<()> {
        match op {
            EditOp::Delete(position) => {
                let id = self.id_at(*position)?;
                self.remove(id);
            }
            EditOp::Rotate { position, degrees } => {
                let id = self.id_at(*position)?;
                self.rotate(id, *degrees)?;
            }
            EditOp::Move { from, to } => {
                self.id_at(*from)?;
                self.id_at(*to)?;
                self.reorder(from - 1, to - 1)?;
            }
            EditOp::Select(range) => {
                self.id_at(range.max_page())?;
                for position in range.to_pages(self.ledger.len()) {
                    let id = self.id_at(position)?;
                    if !self.ledger.page(id).is_some_and(PageRecord::is_selected) {
                        self.toggle_selection(id);
                    }
                }
            }
            EditOp::Toggle(position) => {
                let id = self.id_at(*position)?;
                self.toggle_selection(id);
            }
            EditOp::SelectAll => self.select_all(true),
            EditOp::DeselectAll => self.select_all(false),
        }
        Ok(())
    }

    /// Merge the chosen pages into one PDF.
    pub async fn merge(&self, name: Option<&str>) -> Result<ExportArtifact> {
        self.pipeline.merge(&self.ledger, name).await
    }

    /// Extract the chosen pages.
    pub async fn extract(&self, name: Option<&str>, mode: ExtractMode) -> Result<ExportArtifact> {
        self.pipeline.extract(&self.ledger, name, mode).await
    }
}
