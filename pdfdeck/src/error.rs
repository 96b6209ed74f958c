//! Error types for pdfdeck.
//!
//! Every fallible operation in the crate returns [`PdfDeckError`]. Variants
//! are grouped into the categories reported by [`PdfDeckError::kind`]:
//!
//! - **Validation**: a non-PDF upload, or no pages for the requested export
//! - **Source decode**: uploaded bytes cannot be parsed
//! - **Page copy**: one page failed during export (carries the page index)
//! - **Serialization / Archive**: building the final payload failed
//! - **Invalid argument / config**: a caller or CLI contract was violated
//! - **I/O**: reading inputs or delivering outputs

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfdeck operations.
pub type Result<T> = std::result::Result<T, PdfDeckError>;

/// Broad category of a [`PdfDeckError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input rejected before any work was attempted.
    Validation,
    /// Source bytes could not be decoded.
    SourceDecode,
    /// A single page failed while building an export.
    PageCopy,
    /// The output document could not be serialized.
    Serialization,
    /// The ZIP payload could not be produced.
    Archive,
    /// A caller passed an argument outside the operation's contract.
    InvalidArgument,
    /// Configuration assembled from the command line is inconsistent.
    Config,
    /// Reading or writing files failed.
    Io,
    /// The user declined to continue.
    Cancelled,
}

/// Main error type for pdfdeck operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfDeckError {
    /// An uploaded file is not a PDF.
    #[error("Not a PDF file: {name}\n  Only PDF documents can be added")]
    NotAPdf {
        /// Name of the rejected file.
        name: String,
    },

    /// There are no pages to export.
    #[error("No pages available: add at least one PDF before exporting")]
    NoPages,

    /// An uploaded file could not be parsed as a PDF.
    #[error("Failed to decode PDF: {name}\n  Reason: {reason}")]
    SourceDecode {
        /// Name of the source file.
        name: String,
        /// Underlying parser message.
        reason: String,
    },

    /// An uploaded file is encrypted.
    #[error(
        "PDF is encrypted and cannot be processed: {name}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools"
    )]
    EncryptedPdf {
        /// Name of the source file.
        name: String,
    },

    /// A page number does not exist in its source document.
    #[error("Page {page} does not exist (document has {page_count} page(s))")]
    PageOutOfRange {
        /// Requested 1-based page number.
        page: usize,
        /// Number of pages in the document.
        page_count: usize,
    },

    /// A page failed while being copied into an export.
    #[error("Export failed on page {index}: {source}")]
    PageCopy {
        /// 1-based processing index of the failing page.
        index: usize,
        /// What went wrong.
        #[source]
        source: Box<PdfDeckError>,
    },

    /// Generic failure inside the document construction backend.
    #[error("PDF construction failed: {reason}")]
    Construct {
        /// Backend message.
        reason: String,
    },

    /// An output document could not be serialized.
    #[error("Failed to serialize PDF: {reason}")]
    Serialization {
        /// Backend message.
        reason: String,
    },

    /// The ZIP archive could not be produced.
    #[error("Failed to build archive: {reason}")]
    Archive {
        /// Archive backend message.
        reason: String,
    },

    /// A page could not be rendered to a thumbnail.
    #[error("Failed to render page {page}: {reason}")]
    Render {
        /// 1-based page number in its source document.
        page: u32,
        /// Renderer message.
        reason: String,
    },

    /// An argument violated an operation's contract.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the violation.
        message: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input file is not accessible (permission denied, etc.).
    #[error("Cannot access file: {}\n  Reason: {source}", .path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output directory",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to write an output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl PdfDeckError {
    /// Create a NotAPdf error.
    pub fn not_a_pdf(name: impl Into<String>) -> Self {
        Self::NotAPdf { name: name.into() }
    }

    /// Create a SourceDecode error.
    pub fn source_decode(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceDecode {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a failure with the 1-based processing index of the page.
    pub fn page_copy(index: usize, source: PdfDeckError) -> Self {
        Self::PageCopy {
            index,
            source: Box::new(source),
        }
    }

    /// Create a Construct error.
    pub fn construct(reason: impl Into<String>) -> Self {
        Self::Construct {
            reason: reason.into(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization {
            reason: reason.into(),
        }
    }

    /// Create an Archive error.
    pub fn archive(reason: impl Into<String>) -> Self {
        Self::Archive {
            reason: reason.into(),
        }
    }

    /// Create an InvalidArgument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAPdf { .. } | Self::NoPages => ErrorKind::Validation,
            Self::SourceDecode { .. } | Self::EncryptedPdf { .. } => ErrorKind::SourceDecode,
            Self::PageCopy { .. }
            | Self::PageOutOfRange { .. }
            | Self::Construct { .. }
            | Self::Render { .. } => ErrorKind::PageCopy,
            Self::Serialization { .. } => ErrorKind::Serialization,
            Self::Archive { .. } => ErrorKind::Archive,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::InvalidConfig { .. } => ErrorKind::Config,
            Self::FileNotFound { .. }
            | Self::FileNotAccessible { .. }
            | Self::OutputExists { .. }
            | Self::FailedToWrite { .. }
            | Self::Io(_) => ErrorKind::Io,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotAPdf { .. } => 1,
            Self::NoPages => 1,
            Self::InvalidArgument { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::FileNotFound { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::SourceDecode { .. } => 3,
            Self::EncryptedPdf { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::FailedToWrite { .. } => 5,
            Self::Io(_) => 5,
            Self::PageCopy { .. } => 6,
            Self::PageOutOfRange { .. } => 6,
            Self::Construct { .. } => 6,
            Self::Render { .. } => 6,
            Self::Serialization { .. } => 6,
            Self::Archive { .. } => 6,
            Self::Cancelled => 130, // Standard exit code for SIGINT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_not_a_pdf_display() {
        let err = PdfDeckError::not_a_pdf("notes.txt");
        let msg = format!("{err}");
        assert!(msg.contains("Not a PDF"));
        assert!(msg.contains("notes.txt"));
    }

    #[test]
    fn test_page_copy_display_names_processing_index() {
        let err = PdfDeckError::page_copy(
            3,
            PdfDeckError::PageOutOfRange {
                page: 9,
                page_count: 2,
            },
        );
        let msg = format!("{err}");
        assert!(msg.contains("failed on page 3"));
        assert!(msg.contains("Page 9 does not exist"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_encrypted_pdf_display() {
        let err = PdfDeckError::EncryptedPdf {
            name: "secret.pdf".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("encrypted"));
        assert!(msg.contains("Decrypt"));
    }

    #[test]
    fn test_output_exists_display() {
        let err = PdfDeckError::output_exists(PathBuf::from("merged.pdf"));
        let msg = format!("{err}");
        assert!(msg.contains("already exists"));
        assert!(msg.contains("--force"));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(PdfDeckError::NoPages.kind(), ErrorKind::Validation);
        assert_eq!(
            PdfDeckError::not_a_pdf("a.txt").kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            PdfDeckError::source_decode("a.pdf", "bad header").kind(),
            ErrorKind::SourceDecode
        );
        assert_eq!(
            PdfDeckError::page_copy(1, PdfDeckError::construct("x")).kind(),
            ErrorKind::PageCopy
        );
        assert_eq!(
            PdfDeckError::serialization("x").kind(),
            ErrorKind::Serialization
        );
        assert_eq!(PdfDeckError::archive("x").kind(), ErrorKind::Archive);
        assert_eq!(
            PdfDeckError::invalid_argument("x").kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(PdfDeckError::NoPages.exit_code(), 1);
        assert_eq!(
            PdfDeckError::file_not_found(PathBuf::from("x")).exit_code(),
            2
        );
        assert_eq!(PdfDeckError::source_decode("x", "y").exit_code(), 3);
        assert_eq!(
            PdfDeckError::output_exists(PathBuf::from("x")).exit_code(),
            4
        );
        assert_eq!(PdfDeckError::Cancelled.exit_code(), 130);
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "not found");
        let err: PdfDeckError = io_err.into();
        assert!(matches!(err, PdfDeckError::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
