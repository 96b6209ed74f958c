//! End-to-end sessions: read from disk, edit, export, write back.

use pdfdeck::config::{CompressionLevel, EditOp, ExtractMode};
use pdfdeck::engine::{LopdfComposer, LopdfRasterizer};
use pdfdeck::io::{ArtifactWriter, SourceReader};
use pdfdeck::session::Session;
use tempfile::TempDir;

use crate::common::{labels, rotations, write_pdf};

fn session() -> Session<LopdfRasterizer, LopdfComposer> {
    Session::new(
        LopdfRasterizer::new(),
        LopdfComposer::new(CompressionLevel::Standard),
    )
}

async fn read(paths: &[std::path::PathBuf]) -> Vec<pdfdeck::ledger::SourceFile> {
    let (results, stats) = SourceReader::new().read_all(paths, 2).await;
    assert_eq!(stats.failure_count, 0);
    results
        .into_iter()
        .map(|result| result.expect("read succeeds").file)
        .collect()
}

#[tokio::test]
async fn test_delete_rotate_then_merge() {
    let dir = TempDir::new().unwrap();
    let path = write_pdf(dir.path(), "deck.pdf", 3);

    let mut session = session();
    let report = session.ingest(read(&[path]).await).unwrap();
    assert_eq!(report.files, 1);
    assert_eq!(report.pages, 3);
    assert_eq!(report.render_failures, 0);

    // Original page 3 sits at position 2 once page 2 is gone.
    for op in ["delete:2", "rotate:2:90"] {
        session.apply(&op.parse::<EditOp>().unwrap()).unwrap();
    }
    let views = session.views();
    assert_eq!(views[1].source_page, 3);
    assert_eq!(views[1].rotation.as_degrees(), 90);

    let artifact = session.merge(None).await.unwrap();
    assert_eq!(artifact.filename, "deck.pdf");
    assert_eq!(artifact.page_count, 2);
    assert_eq!(labels(&artifact.bytes), vec!["deck-1", "deck-3"]);
    assert_eq!(rotations(&artifact.bytes), vec![0, 90]);

    let out = TempDir::new().unwrap();
    let stats = ArtifactWriter::new()
        .write(&artifact, out.path())
        .await
        .unwrap();
    assert_eq!(stats.output_path, out.path().join("deck.pdf"));
    assert_eq!(stats.file_size, artifact.bytes.len() as u64);
    assert_eq!(std::fs::read(&stats.output_path).unwrap(), artifact.bytes);
}

#[tokio::test]
async fn test_reorder_across_files_then_extract_selection() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 2);
    let b = write_pdf(dir.path(), "b.pdf", 2);

    let mut session = session();
    session.ingest(read(&[a, b]).await).unwrap();
    assert_eq!(session.counts().total, 4);

    // a-1 a-2 b-1 b-2 -> b-2 a-1 a-2 b-1
    session.apply(&EditOp::Move { from: 4, to: 1 }).unwrap();
    session.apply(&"select:1,3".parse().unwrap()).unwrap();
    assert_eq!(session.counts().selected, 2);

    let artifact = session
        .extract(Some("picked"), ExtractMode::Single)
        .await
        .unwrap();
    assert_eq!(artifact.filename, "picked.pdf");
    assert_eq!(labels(&artifact.bytes), vec!["b-2", "a-2"]);
}

#[tokio::test]
async fn test_per_page_extract_to_zip() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 2);
    let b = write_pdf(dir.path(), "b.pdf", 1);

    let mut session = session();
    session.ingest(read(&[a, b]).await).unwrap();
    session.apply(&EditOp::SelectAll).unwrap();

    let artifact = session.extract(None, ExtractMode::PerPage).await.unwrap();
    assert!(artifact.is_archive());
    assert_eq!(artifact.filename, "extracted_extract.zip");
    assert_eq!(
        artifact.entries,
        vec![
            "extracted_page-1.pdf",
            "extracted_page-2.pdf",
            "extracted_page-3.pdf"
        ]
    );

    let mut zip = zip::ZipArchive::new(std::io::Cursor::new(artifact.bytes.clone())).unwrap();
    let expected = ["a-1", "a-2", "b-1"];
    for (i, label) in expected.iter().enumerate() {
        let mut entry = zip.by_name(&format!("extracted_page-{}.pdf", i + 1)).unwrap();
        let mut bytes = Vec::new();
        std::io::Read::read_to_end(&mut entry, &mut bytes).unwrap();
        assert_eq!(labels(&bytes), vec![label.to_string()]);
    }

    let out = TempDir::new().unwrap();
    let stats = ArtifactWriter::new()
        .write(&artifact, out.path())
        .await
        .unwrap();
    assert_eq!(stats.mime, "application/zip");
    assert!(out.path().join("extracted_extract.zip").exists());
}

#[tokio::test]
async fn test_thumbnails_follow_rotation() {
    let dir = TempDir::new().unwrap();
    let path = write_pdf(dir.path(), "wide.pdf", 2);

    let mut session = session();
    session.ingest(read(&[path]).await).unwrap();

    // Page 2 is 200 x 400 points.
    let before = session.views()[1].thumbnail.unwrap();
    assert_eq!((before.width, before.height), (40, 80));

    session.apply(&"rotate:2:-90".parse().unwrap()).unwrap();
    let after = session.views()[1].thumbnail.unwrap();
    assert_eq!((after.width, after.height), (80, 40));
    assert_eq!(session.views()[1].rotation.as_degrees(), 270);
}
