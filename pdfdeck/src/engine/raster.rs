//! Decoding uploads and rendering page thumbnails.

use image::{ImageFormat, Rgba, RgbaImage, imageops};
use std::io::Cursor;
use std::path::Path;

use crate::error::{PdfDeckError, Result};
use crate::ledger::Rotation;
use crate::utils;

const PAGE_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
const PAGE_BORDER: Rgba<u8> = Rgba([220, 220, 220, 255]);

/// Largest thumbnail side in pixels.
pub const MAX_RASTER_SIDE: u32 = 16_384;

/// A rendered page raster.
///
/// Thumbnails are replaced, never edited, when a page is rotated.
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    image: RgbaImage,
}

impl Thumbnail {
    /// Wrap an RGBA image.
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying image.
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|err| PdfDeckError::Io(std::io::Error::other(err)))?;
        Ok(bytes)
    }

    /// Write as a PNG file.
    ///
    /// # Errors
    ///
    /// Returns `FailedToWrite` if encoding or writing fails.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|err| PdfDeckError::FailedToWrite {
                path: path.to_path_buf(),
                source: std::io::Error::other(err),
            })
    }
}

/// Decode and render capability used during ingestion and rotation.
pub trait Rasterizer {
    /// Paginated handle produced by [`Rasterizer::decode`].
    type Document;

    /// Decode uploaded bytes.
    ///
    /// # Errors
    ///
    /// Returns `SourceDecode` or `EncryptedPdf` if the bytes cannot be used.
    fn decode(&self, name: &str, bytes: &[u8]) -> Result<Self::Document>;

    /// Number of pages in a decoded document.
    fn page_count(&self, document: &Self::Document) -> usize;

    /// Render a 1-based page at `rotation` and `scale`.
    fn render(
        &self,
        document: &Self::Document,
        page_number: u32,
        rotation: Rotation,
        scale: f32,
    ) -> Result<Thumbnail>;
}

/// Size and intrinsic rotation of one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Width in points.
    pub width_pt: f32,
    /// Height in points.
    pub height_pt: f32,
    /// The page's own `/Rotate`, inherited if needed.
    pub rotation: Rotation,
}

/// Document decoded by [`LopdfRasterizer`].
#[derive(Debug, Clone)]
pub struct DecodedDocument {
    pages: Vec<PageGeometry>,
}

impl DecodedDocument {
    /// Geometry of every page in page order.
    pub fn pages(&self) -> &[PageGeometry] {
        &self.pages
    }
}

/// Rasterizer backed by `lopdf`.
///
/// Pages are drawn as page-shaped placeholders: a white body with a grey
/// border, sized from the MediaBox and turned to the displayed rotation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfRasterizer;

impl LopdfRasterizer {
    /// Create a rasterizer.
    pub fn new() -> Self {
        Self
    }
}

impl Rasterizer for LopdfRasterizer {
    type Document = DecodedDocument;

    fn decode(&self, name: &str, bytes: &[u8]) -> Result<DecodedDocument> {
        let doc = super::load_document(name, bytes)?;

        let pages: Vec<PageGeometry> = doc
            .get_pages()
            .into_values()
            .map(|page_id| {
                let (width_pt, height_pt) = utils::page_size_points(&doc, page_id);
                let rotation = utils::inherited_attribute(&doc, page_id, b"Rotate")
                    .and_then(|value| value.as_i64().ok())
                    .and_then(|degrees| i32::try_from(degrees).ok())
                    .and_then(|degrees| Rotation::from_degrees(degrees).ok())
                    .unwrap_or_default();
                PageGeometry {
                    width_pt,
                    height_pt,
                    rotation,
                }
            })
            .collect();

        if pages.is_empty() {
            return Err(PdfDeckError::source_decode(name, "document has no pages"));
        }

        Ok(DecodedDocument { pages })
    }

    fn page_count(&self, document: &DecodedDocument) -> usize {
        document.pages.len()
    }

    /// A non-zero `rotation` replaces the page's own rotation, matching what
    /// an export of the same record produces.
    fn render(
        &self,
        document: &DecodedDocument,
        page_number: u32,
        rotation: Rotation,
        scale: f32,
    ) -> Result<Thumbnail> {
        let geometry = page_number
            .checked_sub(1)
            .and_then(|index| document.pages.get(index as usize))
            .ok_or(PdfDeckError::PageOutOfRange {
                page: page_number as usize,
                page_count: document.pages.len(),
            })?;

        if !(scale.is_finite() && scale > 0.0) {
            return Err(PdfDeckError::Render {
                page: page_number,
                reason: format!("invalid scale {scale}"),
            });
        }

        let width = raster_side(geometry.width_pt, scale, page_number)?;
        let height = raster_side(geometry.height_pt, scale, page_number)?;

        let mut image = RgbaImage::from_pixel(width, height, PAGE_FILL);
        if width >= 4 && height >= 4 {
            for x in 0..width {
                image.put_pixel(x, 0, PAGE_BORDER);
                image.put_pixel(x, height - 1, PAGE_BORDER);
            }
            for y in 0..height {
                image.put_pixel(0, y, PAGE_BORDER);
                image.put_pixel(width - 1, y, PAGE_BORDER);
            }
        }

        let displayed = if rotation.is_none() {
            geometry.rotation
        } else {
            rotation
        };

        let image = match displayed.as_degrees() {
            90 => imageops::rotate90(&image),
            180 => imageops::rotate180(&image),
            270 => imageops::rotate270(&image),
            _ => image,
        };

        Ok(Thumbnail::new(image))
    }
}

/// Pixel length of one page side, at least 1 and at most [`MAX_RASTER_SIDE`].
fn raster_side(points: f32, scale: f32, page: u32) -> Result<u32> {
    let pixels = (points * scale).round().max(1.0);
    if !pixels.is_finite() || pixels > MAX_RASTER_SIDE as f32 {
        return Err(PdfDeckError::Render {
            page,
            reason: format!("page of {points}pt is too large to render at scale {scale}"),
        });
    }
    Ok(pixels as u32)
}
