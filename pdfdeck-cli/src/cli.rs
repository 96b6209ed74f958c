//! CLI argument parsing for pdfdeck.
//!
//! This module defines the command-line interface structure using `clap`.
//! It is also compiled by the build script to render the man page, so it
//! only depends on `clap` and the `pdfdeck` library.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use pdfdeck::config::{
    Command, CompressionLevel, Config, DEFAULT_THUMBNAIL_SCALE, EditOp, ExtractMode, OverwriteMode,
};
use pdfdeck::error::{PdfDeckError, Result};
use pdfdeck::utils::collect_paths_for_patterns;

/// Reorder, rotate, select and delete PDF pages, then merge or extract them.
///
/// Every input file is split into pages that form one working document.
/// Edits are applied in the order given, then the chosen pages (the
/// selected ones, or all pages when nothing is selected) are exported.
#[derive(Parser, Debug)]
#[command(name = "pdfdeck")]
#[command(version)]
#[command(about = "Reorder, rotate, select and delete PDF pages", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Action to run after the edits
    #[command(subcommand)]
    pub command: CliCommand,

    /// Verbose output - show per-file and per-page details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    ///
    /// Only errors and warnings will be printed.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force overwrite of existing output files without confirmation
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Never overwrite existing output files
    ///
    /// If the output file already exists, exit with an error
    /// instead of prompting or overwriting.
    #[arg(long, global = true, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Compression level for exported PDFs
    ///
    /// - none: write objects as they are
    /// - standard: compress content streams (default)
    /// - maximum: also drop unreferenced objects
    #[arg(
        short,
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "standard"
    )]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Number of input files read concurrently
    ///
    /// Defaults to the number of CPU cores.
    #[arg(short, long, global = true, value_name = "N")]
    pub jobs: Option<usize>,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print the pages of the working document
    List {
        #[command(flatten)]
        session: SessionArgs,

        /// Print the page list as JSON
        #[arg(long)]
        json: bool,

        /// Write one PNG thumbnail per page into this directory
        #[arg(long, value_name = "DIR")]
        thumbnails: Option<PathBuf>,

        /// Thumbnail scale relative to the page size in points
        #[arg(long, value_name = "SCALE", default_value_t = DEFAULT_THUMBNAIL_SCALE)]
        scale: f32,
    },

    /// Merge the chosen pages into one PDF
    Merge {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Extract the chosen pages
    ///
    /// Writes one PDF, or with --per-page one PDF per page. More than one
    /// page is then bundled into a ZIP archive.
    Extract {
        #[command(flatten)]
        session: SessionArgs,

        /// Write each page to its own PDF
        #[arg(long)]
        per_page: bool,
    },
}

/// Arguments shared by every subcommand.
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Input PDF files, in order
    ///
    /// Glob patterns are expanded.
    ///
    /// Examples:
    ///   pdfdeck merge a.pdf b.pdf
    ///   pdfdeck extract scans/*.pdf -e select:1-3 --per-page
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Edit applied before exporting (repeatable, applied in order)
    ///
    /// Positions are 1-based and refer to the working document as it is
    /// when the edit runs.
    ///
    /// Forms: delete:P, rotate:P:DEG, move:FROM:TO, select:RANGE,
    /// toggle:P, select-all, deselect-all
    #[arg(short, long = "edit", value_name = "OP")]
    pub edits: Vec<String>,

    /// Directory that receives the exported file
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output: PathBuf,

    /// Base name of the exported file
    ///
    /// Defaults to the first input's name for merge and to "extracted"
    /// for extract.
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,
}

impl CliCommand {
    fn session(&self) -> &SessionArgs {
        match self {
            Self::List { session, .. } | Self::Merge { session } | Self::Extract { session, .. } => {
                session
            }
        }
    }
}

impl Cli {
    /// Convert CLI arguments to configuration.
    ///
    /// Expands input globs and parses every edit.
    ///
    /// # Errors
    ///
    /// Returns an error if an edit or glob pattern is invalid, or if the
    /// resulting configuration fails validation.
    pub fn to_config(&self) -> Result<Config> {
        let session = self.command.session();

        let inputs = collect_paths_for_patterns(&session.inputs)?;

        let edits = session
            .edits
            .iter()
            .map(|op| EditOp::from_str(op))
            .collect::<Result<Vec<_>>>()?;

        let compression = CompressionLevel::from_str(&self.compression)?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let (command, thumbnail_scale) = match &self.command {
            CliCommand::List {
                json,
                thumbnails,
                scale,
                ..
            } => (
                Command::List {
                    json: *json,
                    thumbnails: thumbnails.clone(),
                },
                *scale,
            ),
            CliCommand::Merge { .. } => (Command::Merge, DEFAULT_THUMBNAIL_SCALE),
            CliCommand::Extract { per_page, .. } => {
                let mode = if *per_page {
                    ExtractMode::PerPage
                } else {
                    ExtractMode::Single
                };
                (Command::Extract(mode), DEFAULT_THUMBNAIL_SCALE)
            }
        };

        let config = Config {
            inputs,
            output_dir: session.output.clone(),
            command,
            name: session.name.clone(),
            edits,
            compression,
            thumbnail_scale,
            overwrite_mode,
            verbose: self.verbose,
            quiet: self.quiet,
            jobs: self.jobs,
        };

        config.validate().map_err(|e| {
            PdfDeckError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }
}
