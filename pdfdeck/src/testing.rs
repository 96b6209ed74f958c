//! PDF fixtures for unit tests.

use lopdf::{Document, Object, Stream, dictionary};

/// Build a PDF with one page per entry of `sizes`.
///
/// Every page draws its label `"{tag}-{n}"` so copies can be traced back to
/// their source page. When `inherited` is set, the MediaBox and Rotate live
/// on the Pages node instead of the pages.
pub(crate) fn build_pdf(
    tag: &str,
    sizes: &[(i64, i64)],
    rotate: Option<i64>,
    inherited: bool,
) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for (index, (width, height)) in sizes.iter().enumerate() {
        let label = format!("BT /F1 12 Tf 20 20 Td ({tag}-{}) Tj ET", index + 1);
        let content_id = doc.add_object(Stream::new(dictionary! {}, label.into_bytes()));

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        };
        if !inherited {
            page.set(
                "MediaBox",
                vec![0.into(), 0.into(), (*width).into(), (*height).into()],
            );
            if let Some(degrees) = rotate {
                page.set("Rotate", degrees);
            }
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let mut pages = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
    };
    if inherited && let Some((width, height)) = sizes.first() {
        pages.set(
            "MediaBox",
            vec![0.into(), 0.into(), (*width).into(), (*height).into()],
        );
        if let Some(degrees) = rotate {
            pages.set("Rotate", degrees);
        }
    }
    doc.objects.insert(pages_id, pages.into());

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("fixture serializes");
    bytes
}

/// Build a PDF of `count` US Letter pages.
pub(crate) fn letter_pdf(tag: &str, count: usize) -> Vec<u8> {
    build_pdf(tag, &vec![(612, 792); count], None, false)
}

/// Label drawn on a page of a document produced by [`build_pdf`].
pub(crate) fn page_label(doc: &Document, page_number: u32) -> Option<String> {
    let page_id = *doc.get_pages().get(&page_number)?;
    let content = doc.get_page_content(page_id).ok()?;
    let text = String::from_utf8_lossy(&content).into_owned();
    let start = text.find('(')? + 1;
    let end = text[start..].find(')')? + start;
    Some(text[start..end].to_string())
}
