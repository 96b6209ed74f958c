//! Failure paths of reading, ingestion and editing.

use pdfdeck::config::{CompressionLevel, EditOp};
use pdfdeck::engine::{LopdfComposer, LopdfRasterizer};
use pdfdeck::error::{ErrorKind, PdfDeckError};
use pdfdeck::io::SourceReader;
use pdfdeck::ledger::SourceFile;
use pdfdeck::session::Session;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::common::labelled_pdf;

fn session() -> Session<LopdfRasterizer, LopdfComposer> {
    Session::new(
        LopdfRasterizer::new(),
        LopdfComposer::new(CompressionLevel::Standard),
    )
}

#[tokio::test]
async fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.pdf");

    let err = SourceReader::new().read(&missing).await.unwrap_err();
    assert!(matches!(err, PdfDeckError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_read_all_reports_failures_in_order() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.pdf");
    std::fs::write(&good, labelled_pdf("good", 1)).unwrap();

    let paths = vec![good, PathBuf::from("/nonexistent/nope.pdf")];
    let (results, stats) = SourceReader::new().read_all(&paths, 2).await;

    assert_eq!(stats.success_count, 1);
    assert_eq!(stats.failure_count, 1);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}

#[test]
fn test_non_pdf_rejects_whole_batch() {
    let mut session = session();
    let err = session
        .ingest(vec![
            SourceFile::new("a.pdf", labelled_pdf("a", 2)),
            SourceFile::new("notes.txt", b"hello".to_vec()),
        ])
        .unwrap_err();

    assert!(matches!(err, PdfDeckError::NotAPdf { ref name } if name == "notes.txt"));
    assert_eq!(session.counts().total, 0);
    assert!(session.ledger().source_files().is_empty());
}

#[test]
fn test_pdf_header_without_extension_accepted() {
    let mut session = session();
    let report = session
        .ingest(vec![SourceFile::new("upload", labelled_pdf("u", 1))])
        .unwrap();
    assert_eq!(report.pages, 1);
}

#[test]
fn test_decode_failure_keeps_earlier_files() {
    let mut session = session();
    let err = session
        .ingest(vec![
            SourceFile::new("a.pdf", labelled_pdf("a", 2)),
            SourceFile::new("broken.pdf", b"garbage bytes".to_vec()),
            SourceFile::new("c.pdf", labelled_pdf("c", 1)),
        ])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SourceDecode);
    assert_eq!(session.counts().total, 2);
    assert_eq!(session.ledger().source_files().len(), 1);
    assert_eq!(session.views()[1].source_name, "a.pdf");
}

#[test]
fn test_edit_out_of_range_leaves_ledger_unchanged() {
    let mut session = session();
    session
        .ingest(vec![SourceFile::new("a.pdf", labelled_pdf("a", 2))])
        .unwrap();

    for op in ["delete:3", "move:1:5", "select:1-9", "toggle:0"] {
        let Ok(op) = op.parse::<EditOp>() else {
            continue;
        };
        let err = session.apply(&op).unwrap_err();
        assert!(matches!(err, PdfDeckError::InvalidArgument { .. }));
    }

    assert_eq!(session.counts().total, 2);
    assert_eq!(session.counts().selected, 0);
}
