//! Page records and the values they carry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::engine::Thumbnail;
use crate::error::{PdfDeckError, Result};

/// Session-unique identifier of a page record.
///
/// Allocated monotonically starting at 1 and never reused, even after the
/// record is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(u64);

impl PageId {
    /// Wrap a raw id value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Page rotation, always one of 0, 90, 180 or 270 degrees clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "u16")]
pub struct Rotation(u16);

impl Rotation {
    /// No rotation.
    pub const NONE: Rotation = Rotation(0);
    /// Quarter turn clockwise.
    pub const CLOCKWISE_90: Rotation = Rotation(90);
    /// Half turn.
    pub const ROTATE_180: Rotation = Rotation(180);
    /// Quarter turn counter-clockwise.
    pub const CLOCKWISE_270: Rotation = Rotation(270);

    /// Normalize an arbitrary multiple of 90 degrees into `[0, 360)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `degrees` is not a multiple of 90.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfdeck::ledger::Rotation;
    ///
    /// assert_eq!(Rotation::from_degrees(-90).unwrap().as_degrees(), 270);
    /// assert_eq!(Rotation::from_degrees(450).unwrap().as_degrees(), 90);
    /// assert!(Rotation::from_degrees(45).is_err());
    /// ```
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        if degrees % 90 != 0 {
            return Err(PdfDeckError::invalid_argument(format!(
                "Invalid rotation: {degrees}. Must be a multiple of 90"
            )));
        }
        Ok(Self(degrees.rem_euclid(360) as u16))
    }

    /// Rotation in degrees.
    pub fn as_degrees(self) -> u16 {
        self.0
    }

    /// Add `delta` degrees, wrapping modulo 360.
    ///
    /// The delta is normalized first, so any multiple of 90 in `i32` range is
    /// accepted.
    pub fn rotated_by(self, delta: i32) -> Result<Self> {
        let delta = Self::from_degrees(delta)?;
        Ok(Self((self.0 + delta.0) % 360))
    }

    /// Whether this is the identity rotation.
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<i32> for Rotation {
    type Error = PdfDeckError;

    fn try_from(degrees: i32) -> Result<Self> {
        Self::from_degrees(degrees)
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.0
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// An uploaded PDF, kept verbatim for the lifetime of the session.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name as supplied by the user.
    pub name: String,
    /// Raw file contents.
    pub bytes: Arc<[u8]>,
}

impl SourceFile {
    /// Create a source file from a name and its contents.
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// File name without directories and without a trailing `.pdf`.
    pub fn base_name(&self) -> &str {
        crate::export::naming::base_name(&self.name)
    }
}

/// Everything needed to create a record, except its id.
#[derive(Debug, Clone)]
pub struct PageData {
    /// Index into the ledger's source files.
    pub source_file_index: usize,
    /// 1-based page number within that source.
    pub source_page_number: u32,
    /// Initial rotation.
    pub rotation: Rotation,
    /// Raster rendered at `rotation`, if rendering succeeded.
    pub thumbnail: Option<Thumbnail>,
}

impl PageData {
    /// Data for an unrotated page with no thumbnail yet.
    pub fn new(source_file_index: usize, source_page_number: u32) -> Self {
        Self {
            source_file_index,
            source_page_number,
            rotation: Rotation::NONE,
            thumbnail: None,
        }
    }

    /// Attach a thumbnail.
    pub fn with_thumbnail(mut self, thumbnail: Option<Thumbnail>) -> Self {
        self.thumbnail = thumbnail;
        self
    }
}

/// One page of the working document.
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub(crate) id: PageId,
    pub(crate) source_file_index: usize,
    pub(crate) source_page_number: u32,
    pub(crate) rotation: Rotation,
    pub(crate) selected: bool,
    pub(crate) thumbnail: Option<Thumbnail>,
}

impl PageRecord {
    pub(crate) fn new(id: PageId, data: PageData) -> Self {
        Self {
            id,
            source_file_index: data.source_file_index,
            source_page_number: data.source_page_number,
            rotation: data.rotation,
            selected: false,
            thumbnail: data.thumbnail,
        }
    }

    /// Session-unique id.
    pub fn id(&self) -> PageId {
        self.id
    }

    /// Index of the source file this page comes from.
    pub fn source_file_index(&self) -> usize {
        self.source_file_index
    }

    /// 1-based page number in the original source document.
    pub fn source_page_number(&self) -> u32 {
        self.source_page_number
    }

    /// Current rotation.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Whether the page is selected.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Cached raster at the current rotation. `None` renders as blank.
    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnail.as_ref()
    }
}
