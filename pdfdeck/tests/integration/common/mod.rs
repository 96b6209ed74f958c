//! Shared fixtures for the integration tests.
//!
//! PDFs are generated on the fly with lopdf. Every page draws a label
//! `"{tag}-{n}"` and gets a MediaBox width of `100 * n`, so a page in an
//! exported document can be traced back to its source page either way.

use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};

/// Build a PDF with `count` labelled pages.
pub fn labelled_pdf(tag: &str, count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::new();
    for n in 1..=count {
        let content = format!("BT /F1 10 Tf 10 10 Td ({tag}-{n}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), (100 * n as i64).into(), 400.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => count as i64,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("fixture serializes");
    bytes
}

/// Write a labelled PDF into `dir` and return its path.
pub fn write_pdf(dir: &Path, name: &str, count: usize) -> PathBuf {
    let tag = name.trim_end_matches(".pdf");
    let path = dir.join(name);
    std::fs::write(&path, labelled_pdf(tag, count)).expect("fixture written");
    path
}

/// Labels of every page of a PDF, in page order.
pub fn labels(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).expect("output parses");
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = doc.get_page_content(page_id).expect("page content");
            let text = String::from_utf8_lossy(&content).into_owned();
            let start = text.find('(').expect("label start") + 1;
            let end = text[start..].find(')').expect("label end") + start;
            text[start..end].to_string()
        })
        .collect()
}

/// `/Rotate` of every page of a PDF, 0 when absent.
pub fn rotations(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).expect("output parses");
    doc.get_pages()
        .values()
        .map(|&page_id| {
            doc.get_dictionary(page_id)
                .ok()
                .and_then(|page| page.get(b"Rotate").ok())
                .and_then(|rotate| rotate.as_i64().ok())
                .unwrap_or(0)
        })
        .collect()
}
