//! pdfdeck - Reorder, rotate, select and delete PDF pages, then merge or
//! extract them.
//!
//! Uploaded PDFs are split into a ledger of page records. Each record points
//! back into its source file and carries a rotation, a selection flag and a
//! cached thumbnail. Editing only touches the ledger; the source files are
//! never modified. Exports copy the chosen pages out of the sources into new
//! documents:
//!
//! - **merge**: all chosen pages into one PDF
//! - **extract**: the chosen pages as one PDF, or one PDF per page (zipped
//!   when there is more than one)
//!
//! The chosen pages are the selected ones, or every page when nothing is
//! selected.
//!
//! # Examples
//!
//! ## Editing session
//!
//! ```no_run
//! use pdfdeck::config::{CompressionLevel, ExtractMode};
//! use pdfdeck::engine::{LopdfComposer, LopdfRasterizer};
//! use pdfdeck::io::{ArtifactWriter, SourceReader};
//! use pdfdeck::session::Session;
//! use std::path::{Path, PathBuf};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = SourceReader::new();
//! let read = reader.read(&PathBuf::from("slides.pdf")).await?;
//!
//! let mut session = Session::new(
//!     LopdfRasterizer::new(),
//!     LopdfComposer::new(CompressionLevel::Standard),
//! );
//! session.ingest(vec![read.file])?;
//!
//! let first = session.id_at(1)?;
//! session.rotate(first, 90)?;
//! session.reorder(0, 2)?;
//!
//! let artifact = session.extract(None, ExtractMode::PerPage).await?;
//! ArtifactWriter::new().write(&artifact, Path::new(".")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Using the ledger directly
//!
//! ```
//! use pdfdeck::ledger::{PageData, PageLedger, SourceFile};
//!
//! let mut ledger = PageLedger::new();
//! let source = ledger.add_source_file(SourceFile::new("a.pdf", Vec::new()));
//! let id = ledger.add_page(PageData::new(source, 1)).unwrap().id();
//!
//! ledger.rotate_page(id, -90).unwrap();
//! assert_eq!(ledger.page(id).unwrap().rotation().as_degrees(), 270);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod io;
pub mod ledger;
pub mod output;
pub mod session;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::Config;
pub use error::{ErrorKind, PdfDeckError, Result};
pub use session::Session;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
