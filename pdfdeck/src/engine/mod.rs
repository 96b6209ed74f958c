//! PDF capabilities the ledger and export pipeline depend on.
//!
//! Two traits sit at the seam between pdfdeck's data model and the PDF
//! backend:
//!
//! - [`Rasterizer`] decodes uploaded bytes into a paginated handle and renders
//!   pages to [`Thumbnail`] rasters.
//! - [`PageComposer`] builds new documents by copying pages out of loaded
//!   sources.
//!
//! [`LopdfRasterizer`] and [`LopdfComposer`] implement them on top of
//! `lopdf`. [`ArchiveBuilder`] packs several payloads into one ZIP.

pub mod archive;
pub mod composer;
pub mod raster;

pub use archive::ArchiveBuilder;
pub use composer::{LopdfComposer, OutputDocument, PageComposer, SourceDocument};
pub use raster::{
    DecodedDocument, LopdfRasterizer, MAX_RASTER_SIDE, PageGeometry, Rasterizer, Thumbnail,
};

use crate::error::{PdfDeckError, Result};
use lopdf::Document;

/// Parse uploaded bytes with `lopdf`, classifying encryption failures.
pub(crate) fn load_document(name: &str, bytes: &[u8]) -> Result<Document> {
    let doc = Document::load_mem(bytes).map_err(|err| {
        let err_msg = err.to_string().to_lowercase();
        if err_msg.contains("encrypt") || err_msg.contains("password") {
            PdfDeckError::EncryptedPdf {
                name: name.to_string(),
            }
        } else {
            PdfDeckError::source_decode(name, err.to_string())
        }
    })?;

    if doc.trailer.get(b"Encrypt").is_ok() {
        return Err(PdfDeckError::EncryptedPdf {
            name: name.to_string(),
        });
    }

    Ok(doc)
}
