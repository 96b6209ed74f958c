//! Configuration module for pdfdeck.
//!
//! This module turns CLI arguments into a validated configuration that drives
//! one editing session. It handles:
//! - Parsing of edit operations and page ranges
//! - Validation of argument combinations
//! - Application of defaults

use crate::error::{PdfDeckError, Result};
use std::{fmt, path::PathBuf, str::FromStr};

/// Default thumbnail scale relative to the page size in points.
pub const DEFAULT_THUMBNAIL_SCALE: f32 = 0.2;

/// Largest accepted thumbnail scale.
pub const MAX_THUMBNAIL_SCALE: f32 = 4.0;

/// Compression level for output PDFs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression, streams are written as copied.
    None,
    /// Compress uncompressed streams.
    #[default]
    Standard,
    /// Compress streams and drop unreferenced objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PdfDeckError;

    /// Parse compression level from string.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation: "none", "standard", or "maximum"
    ///
    /// # Errors
    ///
    /// Returns an error if the string doesn't match a valid compression level.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfDeckError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// How `extract` packages the chosen pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// All chosen pages in one document.
    #[default]
    Single,
    /// One document per chosen page, zipped when there is more than one.
    PerPage,
}

impl FromStr for ExtractMode {
    type Err = PdfDeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "per-page" | "perpage" => Ok(Self::PerPage),
            _ => Err(PdfDeckError::invalid_config(format!(
                "Invalid extract mode: {s}. Must be one of: single, per-page"
            ))),
        }
    }
}

/// Page range specification.
///
/// Supports individual pages and ranges:
/// - "1" - single page
/// - "1-5" - range of pages (inclusive)
/// - "1,3,5" - multiple individual pages
/// - "1-5,10-15" - combination of ranges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRange {
    ranges: Vec<PageRangeItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageRangeItem {
    Single(usize),
    Range(usize, usize),
}

impl PageRange {
    /// Parse a page range string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the string format is invalid or contains
    /// a page number below 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfdeck::config::PageRange;
    ///
    /// let range = PageRange::parse("1-5,10").unwrap();
    /// assert!(range.contains(3));
    /// assert!(range.contains(10));
    /// assert!(!range.contains(7));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let mut ranges = Vec::new();

        for part in s.split(',') {
            let part = part.trim();

            if part.contains('-') {
                let parts: Vec<&str> = part.split('-').collect();
                if parts.len() != 2 {
                    return Err(PdfDeckError::invalid_argument(format!(
                        "Invalid page range format: {part}. Expected format like '1-5'"
                    )));
                }

                let start = parse_page_number(parts[0])?;
                let end = parse_page_number(parts[1])?;

                if start > end {
                    return Err(PdfDeckError::invalid_argument(format!(
                        "Invalid range {start}-{end}: start page must be less than or equal to end page"
                    )));
                }

                ranges.push(PageRangeItem::Range(start, end));
            } else {
                ranges.push(PageRangeItem::Single(parse_page_number(part)?));
            }
        }

        Ok(Self { ranges })
    }

    /// Check if a 1-based page number is included in this range.
    pub fn contains(&self, page: usize) -> bool {
        self.ranges.iter().any(|item| match item {
            PageRangeItem::Single(p) => *p == page,
            PageRangeItem::Range(start, end) => page >= *start && page <= *end,
        })
    }

    /// Highest page number named by the range.
    pub fn max_page(&self) -> usize {
        self.ranges
            .iter()
            .map(|item| match item {
                PageRangeItem::Single(p) => *p,
                PageRangeItem::Range(_, end) => *end,
            })
            .max()
            .unwrap_or(0)
    }

    /// All page numbers in this range up to `max_pages`, sorted and unique.
    pub fn to_pages(&self, max_pages: usize) -> Vec<usize> {
        (1..=max_pages).filter(|p| self.contains(*p)).collect()
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match item {
                PageRangeItem::Single(p) => write!(f, "{p}")?,
                PageRangeItem::Range(start, end) => write!(f, "{start}-{end}")?,
            }
        }
        Ok(())
    }
}

fn parse_page_number(raw: &str) -> Result<usize> {
    let raw = raw.trim();
    let page: usize = raw
        .parse()
        .map_err(|_| PdfDeckError::invalid_argument(format!("Invalid page number: {raw}")))?;

    if page == 0 {
        return Err(PdfDeckError::invalid_argument(
            "Page numbers must be positive (1-indexed)",
        ));
    }

    Ok(page)
}

/// A single user edit, addressed by 1-based working positions.
///
/// Textual forms: `delete:P`, `rotate:P:DEG`, `move:FROM:TO`,
/// `select:RANGE`, `toggle:P`, `select-all`, `deselect-all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// Delete the page at a position.
    Delete(usize),
    /// Rotate the page at a position by a multiple of 90 degrees.
    Rotate {
        /// 1-based working position.
        position: usize,
        /// Clockwise delta, may be negative.
        degrees: i32,
    },
    /// Move a page from one position to another.
    Move {
        /// Current 1-based position.
        from: usize,
        /// Target 1-based position.
        to: usize,
    },
    /// Mark the pages in a range as selected.
    Select(PageRange),
    /// Flip the selection flag of one page.
    Toggle(usize),
    /// Select every page.
    SelectAll,
    /// Clear the selection.
    DeselectAll,
}

impl FromStr for EditOp {
    type Err = PdfDeckError;

    /// Parse an edit operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfdeck::config::EditOp;
    ///
    /// let op: EditOp = "rotate:2:-90".parse().unwrap();
    /// assert_eq!(op, EditOp::Rotate { position: 2, degrees: -90 });
    /// assert!("rotate:2:45".parse::<EditOp>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let invalid = || {
            PdfDeckError::invalid_argument(format!(
                "Invalid edit operation: {s}. Expected one of: delete:P, rotate:P:DEG, \
                 move:FROM:TO, select:RANGE, toggle:P, select-all, deselect-all"
            ))
        };

        match parts.as_slice() {
            ["delete", position] => Ok(Self::Delete(parse_page_number(position)?)),
            ["rotate", position, degrees] => {
                let degrees: i32 = degrees.trim().parse().map_err(|_| invalid())?;
                if degrees % 90 != 0 {
                    return Err(PdfDeckError::invalid_argument(format!(
                        "Invalid rotation: {degrees}. Must be a multiple of 90"
                    )));
                }
                Ok(Self::Rotate {
                    position: parse_page_number(position)?,
                    degrees,
                })
            }
            ["move", from, to] => Ok(Self::Move {
                from: parse_page_number(from)?,
                to: parse_page_number(to)?,
            }),
            ["select", range] => Ok(Self::Select(PageRange::parse(range)?)),
            ["toggle", position] => Ok(Self::Toggle(parse_page_number(position)?)),
            ["select-all"] => Ok(Self::SelectAll),
            ["deselect-all"] => Ok(Self::DeselectAll),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete(p) => write!(f, "delete:{p}"),
            Self::Rotate { position, degrees } => write!(f, "rotate:{position}:{degrees}"),
            Self::Move { from, to } => write!(f, "move:{from}:{to}"),
            Self::Select(range) => write!(f, "select:{range}"),
            Self::Toggle(p) => write!(f, "toggle:{p}"),
            Self::SelectAll => f.write_str("select-all"),
            Self::DeselectAll => f.write_str("deselect-all"),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// What the session does after applying the edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the ledger.
    List {
        /// Emit JSON instead of a table.
        json: bool,
        /// Directory to write thumbnails into.
        thumbnails: Option<PathBuf>,
    },
    /// Merge the chosen pages into one PDF.
    Merge,
    /// Extract the chosen pages.
    Extract(ExtractMode),
}

/// Complete configuration for one pdfdeck session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input PDF file paths, in ingestion order.
    pub inputs: Vec<PathBuf>,

    /// Directory that receives export artifacts.
    pub output_dir: PathBuf,

    /// Action to run after the edits.
    pub command: Command,

    /// Base name override for the exported file.
    pub name: Option<String>,

    /// Edits applied in order before the command runs.
    pub edits: Vec<EditOp>,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Thumbnail scale relative to the page size in points.
    pub thumbnail_scale: f32,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Number of files read concurrently (None = auto-detect).
    pub jobs: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output_dir: PathBuf::from("."),
            command: Command::Merge,
            name: None,
            edits: Vec::new(),
            compression: CompressionLevel::default(),
            thumbnail_scale: DEFAULT_THUMBNAIL_SCALE,
            overwrite_mode: OverwriteMode::default(),
            verbose: false,
            quiet: false,
            jobs: None,
        }
    }
}

impl Config {
    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    /// - The thumbnail scale is outside (0, 4]
    /// - The name override is empty or contains a path separator
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(PdfDeckError::invalid_config("No input files specified"));
        }

        if self.verbose && self.quiet {
            return Err(PdfDeckError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            return Err(PdfDeckError::invalid_config(
                "Number of jobs must be at least 1",
            ));
        }

        if !(self.thumbnail_scale > 0.0 && self.thumbnail_scale <= MAX_THUMBNAIL_SCALE) {
            return Err(PdfDeckError::invalid_config(format!(
                "Invalid thumbnail scale: {}. Must be greater than 0 and at most {MAX_THUMBNAIL_SCALE}",
                self.thumbnail_scale
            )));
        }

        if let Some(name) = &self.name
            && (name.trim().is_empty() || name.contains(['/', '\\']))
        {
            return Err(PdfDeckError::invalid_config(format!(
                "Invalid output name: '{name}'. Must be non-empty and contain no path separators"
            )));
        }

        Ok(())
    }

    /// Get the effective number of parallel reads.
    ///
    /// Returns the configured job count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}
