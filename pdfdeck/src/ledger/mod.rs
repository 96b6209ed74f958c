//! The page ledger: the authoritative, ordered list of working pages.
//!
//! The ledger owns two parallel collections:
//!
//! - the **sequence** of [`PageRecord`]s, whose order is the order of the
//!   working document (a record's working position is its index + 1), and
//! - the **source files**, the uploaded PDFs that records point into via
//!   [`PageRecord::source_file_index`].
//!
//! It is pure data. Decoding, rendering and exporting live elsewhere and only
//! read from it.
//!
//! # Examples
//!
//! ```
//! use pdfdeck::ledger::{PageData, PageLedger, SourceFile};
//!
//! let mut ledger = PageLedger::new();
//! let source = ledger.add_source_file(SourceFile::new("a.pdf", Vec::new()));
//! let first = ledger.add_page(PageData::new(source, 1)).unwrap().id();
//! let second = ledger.add_page(PageData::new(source, 2)).unwrap().id();
//!
//! ledger.reorder_pages(1, 0).unwrap();
//! assert_eq!(ledger.position_of(second), Some(0));
//! assert_eq!(ledger.position_of(first), Some(1));
//! ```

pub mod record;

pub use record::{PageData, PageId, PageRecord, Rotation, SourceFile};

use crate::engine::Thumbnail;
use crate::error::{PdfDeckError, Result};

/// Ordered page records plus the source files they were decoded from.
#[derive(Debug, Clone)]
pub struct PageLedger {
    pages: Vec<PageRecord>,
    source_files: Vec<SourceFile>,
    next_id: u64,
}

impl PageLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            source_files: Vec::new(),
            next_id: 1,
        }
    }

    /// Append an uploaded file and return its index.
    pub fn add_source_file(&mut self, file: SourceFile) -> usize {
        self.source_files.push(file);
        self.source_files.len() - 1
    }

    /// All uploaded files, indexed by `source_file_index`.
    pub fn source_files(&self) -> &[SourceFile] {
        &self.source_files
    }

    /// Look up one uploaded file.
    pub fn source_file(&self, index: usize) -> Option<&SourceFile> {
        self.source_files.get(index)
    }

    /// Append a new record with a freshly allocated id.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `data.source_file_index` does not refer
    /// to a file previously added with [`add_source_file`](Self::add_source_file).
    pub fn add_page(&mut self, data: PageData) -> Result<&PageRecord> {
        if data.source_file_index >= self.source_files.len() {
            return Err(PdfDeckError::invalid_argument(format!(
                "source file index {} is out of range ({} file(s) loaded)",
                data.source_file_index,
                self.source_files.len()
            )));
        }

        let id = PageId::new(self.next_id);
        self.next_id += 1;

        self.pages.push(PageRecord::new(id, data));
        Ok(&self.pages[self.pages.len() - 1])
    }

    /// Remove the record with `id`. Absent ids are ignored.
    pub fn remove_page(&mut self, id: PageId) -> Option<PageRecord> {
        let position = self.position_of(id)?;
        Some(self.pages.remove(position))
    }

    /// Look up a record by id.
    pub fn page(&self, id: PageId) -> Option<&PageRecord> {
        self.pages.iter().find(|page| page.id == id)
    }

    fn page_mut(&mut self, id: PageId) -> Option<&mut PageRecord> {
        self.pages.iter_mut().find(|page| page.id == id)
    }

    /// Look up a record by its 0-based position in the working document.
    pub fn page_at(&self, position: usize) -> Option<&PageRecord> {
        self.pages.get(position)
    }

    /// 0-based position of `id` in the working document.
    pub fn position_of(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|page| page.id == id)
    }

    /// Add `delta_degrees` to a page's rotation, modulo 360.
    ///
    /// Returns the new rotation, or `None` if no page has `id`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `delta_degrees` is not a multiple of 90.
    pub fn rotate_page(&mut self, id: PageId, delta_degrees: i32) -> Result<Option<Rotation>> {
        let Some(page) = self.page_mut(id) else {
            return Ok(None);
        };
        page.rotation = page.rotation.rotated_by(delta_degrees)?;
        Ok(Some(page.rotation))
    }

    /// Replace the cached raster of a page. Absent ids are ignored.
    pub fn set_thumbnail(&mut self, id: PageId, thumbnail: Option<Thumbnail>) {
        if let Some(page) = self.page_mut(id) {
            page.thumbnail = thumbnail;
        }
    }

    /// Flip the selection state of a page. Absent ids are ignored.
    pub fn toggle_selection(&mut self, id: PageId) {
        if let Some(page) = self.page_mut(id) {
            page.selected = !page.selected;
        }
    }

    /// Set the selection state of every page.
    pub fn select_all(&mut self, selected: bool) {
        for page in &mut self.pages {
            page.selected = selected;
        }
    }

    /// Selected records, in working order.
    pub fn selected_pages(&self) -> Vec<&PageRecord> {
        self.pages.iter().filter(|page| page.selected).collect()
    }

    /// Every record, in working order.
    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the working document has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Records an export operates on: the selection, or every page when
    /// nothing is selected.
    ///
    /// # Errors
    ///
    /// Returns `NoPages` when the ledger is empty.
    pub fn export_selection(&self) -> Result<Vec<&PageRecord>> {
        if self.pages.is_empty() {
            return Err(PdfDeckError::NoPages);
        }

        let selected = self.selected_pages();
        if selected.is_empty() {
            Ok(self.pages.iter().collect())
        } else {
            Ok(selected)
        }
    }

    /// Move the record at `from` so that it ends up at `to`.
    ///
    /// Both positions are 0-based indices into the current sequence.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if either position is outside
    /// `[0, len)`; the sequence is left untouched.
    pub fn reorder_pages(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.pages.len();
        if from >= len || to >= len {
            return Err(PdfDeckError::invalid_argument(format!(
                "cannot move page from position {from} to {to}: document has {len} page(s)"
            )));
        }

        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        Ok(())
    }

    /// Drop every record and source file and reset the id counter.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.source_files.clear();
        self.next_id = 1;
    }
}

impl Default for PageLedger {
    fn default() -> Self {
        Self::new()
    }
}
