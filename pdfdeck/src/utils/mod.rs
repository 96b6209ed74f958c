//! Utilities for path collection, PDF sniffing and page-tree lookups.

use crate::{Result, error::PdfDeckError};
use lopdf::{Document, Object, ObjectId};
use std::path::PathBuf;

/// Page attributes a page may inherit from its ancestors in the page tree.
pub const INHERITABLE_PAGE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// US Letter in points, used when a page declares no usable MediaBox.
pub const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

const MAX_TREE_DEPTH: usize = 64;

/// Expand multiple glob patterns into filesystem paths.
///
/// Patterns that match nothing are kept verbatim so that the reader can
/// report them as missing files.
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - Propagates filesystem errors from glob iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        let paths = collect_paths_for_pattern(pattern.as_ref())?;
        if paths.is_empty() {
            resolved_paths.push(PathBuf::from(pattern.as_ref()));
        } else {
            resolved_paths.extend(paths);
        }
    }

    Ok(resolved_paths)
}

fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut resolved_paths = Vec::new();

    let paths = glob::glob(pattern).map_err(|err| {
        PdfDeckError::invalid_argument(format!("invalid pattern '{pattern}': {err}"))
    })?;

    for entry in paths {
        let path = entry.map_err(|err| PdfDeckError::Io(err.into_error()))?;
        resolved_paths.push(path);
    }

    Ok(resolved_paths)
}

/// Whether a file name carries the `.pdf` extension (any case).
pub fn has_pdf_extension(name: &str) -> bool {
    name.len() >= 4
        && name.is_char_boundary(name.len() - 4)
        && name[name.len() - 4..].eq_ignore_ascii_case(".pdf")
}

/// Whether the bytes start with a PDF header.
pub fn has_pdf_header(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF-")
}

/// Look up `key` on a page, walking up `/Parent` links if the page does not
/// define it itself.
pub fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;

    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }

    None
}

/// Width and height of a page in points, from its (possibly inherited)
/// MediaBox.
pub fn page_size_points(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    inherited_attribute(doc, page_id, b"MediaBox")
        .and_then(|media_box| match media_box {
            Object::Reference(id) => doc.get_object(*id).ok(),
            other => Some(other),
        })
        .and_then(|media_box| media_box.as_array().ok())
        .and_then(|values| {
            if values.len() != 4 {
                return None;
            }
            let x0 = values[0].as_float().ok()?;
            let y0 = values[1].as_float().ok()?;
            let x1 = values[2].as_float().ok()?;
            let y1 = values[3].as_float().ok()?;
            Some(((x1 - x0).abs(), (y1 - y0).abs()))
        })
        .filter(|(width, height)| *width > 0.0 && *height > 0.0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

/// Whether an object is a node of a page tree (`/Type /Page` or `/Pages`).
pub fn is_page_tree_node(object: &Object) -> bool {
    let Ok(dict) = object.as_dict() else {
        return false;
    };
    match dict.get(b"Type").and_then(Object::as_name) {
        Ok(name) => name == b"Page" || name == b"Pages",
        Err(_) => false,
    }
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
