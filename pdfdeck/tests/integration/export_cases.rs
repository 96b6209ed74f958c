//! Export pipeline behavior against real lopdf documents.

use lopdf::ObjectId;
use pdfdeck::config::{CompressionLevel, ExtractMode};
use pdfdeck::engine::{LopdfComposer, OutputDocument, PageComposer, SourceDocument};
use pdfdeck::error::{PdfDeckError, Result};
use pdfdeck::export::{ExportPipeline, PDF_MIME};
use pdfdeck::ledger::{PageData, PageLedger, Rotation, SourceFile};
use std::cell::RefCell;

use crate::common::{labelled_pdf, labels, rotations};

/// Wraps the lopdf composer and records every load.
struct RecordingComposer {
    inner: LopdfComposer,
    loads: RefCell<Vec<String>>,
}

impl RecordingComposer {
    fn new() -> Self {
        Self {
            inner: LopdfComposer::new(CompressionLevel::None),
            loads: RefCell::new(Vec::new()),
        }
    }
}

impl PageComposer for RecordingComposer {
    type Source = SourceDocument;
    type Target = OutputDocument;
    type Page = ObjectId;

    fn load(&self, name: &str, bytes: &[u8]) -> Result<SourceDocument> {
        self.loads.borrow_mut().push(name.to_string());
        self.inner.load(name, bytes)
    }

    fn create(&self) -> Result<OutputDocument> {
        self.inner.create()
    }

    fn copy_page(
        &self,
        target: &mut OutputDocument,
        source: &SourceDocument,
        page_index: usize,
    ) -> Result<ObjectId> {
        self.inner.copy_page(target, source, page_index)
    }

    fn set_rotation(
        &self,
        target: &mut OutputDocument,
        page: ObjectId,
        rotation: Rotation,
    ) -> Result<()> {
        self.inner.set_rotation(target, page, rotation)
    }

    fn append_page(&self, target: &mut OutputDocument, page: ObjectId) -> Result<()> {
        self.inner.append_page(target, page)
    }

    fn serialize(&self, target: OutputDocument) -> Result<Vec<u8>> {
        self.inner.serialize(target)
    }
}

/// Ledger over the given files, one record per listed `(file, page)`.
fn ledger(files: &[(&str, usize)], pages: &[(usize, u32)]) -> PageLedger {
    let mut ledger = PageLedger::new();
    for (name, count) in files {
        let tag = name.trim_end_matches(".pdf");
        ledger.add_source_file(SourceFile::new(*name, labelled_pdf(tag, *count)));
    }
    for &(file, page) in pages {
        ledger.add_page(PageData::new(file, page)).unwrap();
    }
    ledger
}

#[tokio::test]
async fn test_each_source_loaded_once_per_export() {
    let ledger = ledger(
        &[("a.pdf", 3), ("b.pdf", 2), ("c.pdf", 1)],
        &[(0, 1), (1, 1), (0, 2), (1, 2), (0, 3)],
    );
    let pipeline = ExportPipeline::new(RecordingComposer::new());

    let artifact = pipeline.merge(&ledger, None).await.unwrap();
    assert_eq!(
        labels(&artifact.bytes),
        vec!["a-1", "b-1", "a-2", "b-2", "a-3"]
    );
    assert_eq!(*pipeline.composer().loads.borrow(), vec!["a.pdf", "b.pdf"]);

    pipeline
        .extract(&ledger, None, ExtractMode::PerPage)
        .await
        .unwrap();
    assert_eq!(pipeline.composer().loads.borrow().len(), 4);
}

/// Labels of every page in a per-page archive, entry by entry.
fn archive_labels(bytes: &[u8]) -> Vec<Vec<String>> {
    let mut zip = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    (0..zip.len())
        .map(|i| {
            let mut entry = zip.by_index(i).unwrap();
            let mut pdf = Vec::new();
            std::io::Read::read_to_end(&mut entry, &mut pdf).unwrap();
            labels(&pdf)
        })
        .collect()
}

#[tokio::test]
async fn test_no_selection_exports_like_full_selection() {
    let mut ledger = ledger(&[("a.pdf", 2), ("b.pdf", 1)], &[(1, 1), (0, 2), (0, 1)]);
    let first = ledger.page_at(0).unwrap().id();
    ledger.rotate_page(first, 270).unwrap();
    let pipeline = ExportPipeline::new(LopdfComposer::new(CompressionLevel::Standard));

    let merged_none = pipeline.merge(&ledger, Some("deck")).await.unwrap();
    let split_none = pipeline
        .extract(&ledger, Some("deck"), ExtractMode::PerPage)
        .await
        .unwrap();

    ledger.select_all(true);
    let merged_all = pipeline.merge(&ledger, Some("deck")).await.unwrap();
    let split_all = pipeline
        .extract(&ledger, Some("deck"), ExtractMode::PerPage)
        .await
        .unwrap();

    assert_eq!(merged_none.filename, merged_all.filename);
    assert_eq!(merged_none.page_count, 3);
    assert_eq!(merged_none.page_count, merged_all.page_count);
    assert_eq!(labels(&merged_none.bytes), vec!["b-1", "a-2", "a-1"]);
    assert_eq!(labels(&merged_none.bytes), labels(&merged_all.bytes));
    assert_eq!(rotations(&merged_none.bytes), vec![270, 0, 0]);
    assert_eq!(rotations(&merged_none.bytes), rotations(&merged_all.bytes));

    assert!(split_none.is_archive());
    assert_eq!(split_none.filename, split_all.filename);
    assert_eq!(split_none.entries, split_all.entries);
    assert_eq!(split_none.page_count, split_all.page_count);
    assert_eq!(
        archive_labels(&split_none.bytes),
        archive_labels(&split_all.bytes)
    );
}

#[tokio::test]
async fn test_same_page_exported_twice() {
    let mut ledger = ledger(&[("a.pdf", 2)], &[(0, 2), (0, 2)]);
    let second = ledger.page_at(1).unwrap().id();
    ledger.rotate_page(second, 180).unwrap();

    let pipeline = ExportPipeline::new(LopdfComposer::new(CompressionLevel::Standard));
    let artifact = pipeline.merge(&ledger, Some("twice")).await.unwrap();

    assert_eq!(artifact.filename, "twice.pdf");
    assert_eq!(artifact.mime, PDF_MIME);
    assert_eq!(labels(&artifact.bytes), vec!["a-2", "a-2"]);
    assert_eq!(rotations(&artifact.bytes), vec![0, 180]);
}

#[tokio::test]
async fn test_single_selected_page_per_page_is_plain_pdf() {
    let mut ledger = ledger(&[("a.pdf", 3)], &[(0, 1), (0, 2), (0, 3)]);
    let third = ledger.page_at(2).unwrap().id();
    ledger.toggle_selection(third);

    let pipeline = ExportPipeline::new(LopdfComposer::new(CompressionLevel::Maximum));
    let artifact = pipeline
        .extract(&ledger, Some("notes.pdf"), ExtractMode::PerPage)
        .await
        .unwrap();

    assert!(!artifact.is_archive());
    assert_eq!(artifact.filename, "notes_page-3.pdf");
    assert_eq!(labels(&artifact.bytes), vec!["a-3"]);
}

#[tokio::test]
async fn test_bad_page_reports_processing_index() {
    let ledger = ledger(&[("a.pdf", 1)], &[(0, 1), (0, 1), (0, 7)]);
    let pipeline = ExportPipeline::new(LopdfComposer::new(CompressionLevel::Standard));

    let err = pipeline.merge(&ledger, None).await.unwrap_err();
    match err {
        PdfDeckError::PageCopy { index, source } => {
            assert_eq!(index, 3);
            assert!(matches!(
                *source,
                PdfDeckError::PageOutOfRange {
                    page: 7,
                    page_count: 1
                }
            ));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreadable_source_fails_whole_export() {
    let mut ledger = PageLedger::new();
    ledger.add_source_file(SourceFile::new("broken.pdf", b"garbage bytes".to_vec()));
    ledger.add_page(PageData::new(0, 1)).unwrap();

    let pipeline = ExportPipeline::new(LopdfComposer::new(CompressionLevel::Standard));
    let err = pipeline
        .extract(&ledger, None, ExtractMode::Single)
        .await
        .unwrap_err();

    assert!(matches!(err, PdfDeckError::SourceDecode { .. }));
}

#[tokio::test]
async fn test_empty_ledger_has_nothing_to_export() {
    let pipeline = ExportPipeline::new(LopdfComposer::new(CompressionLevel::Standard));
    let err = pipeline.merge(&PageLedger::new(), None).await.unwrap_err();
    assert!(matches!(err, PdfDeckError::NoPages));
}
