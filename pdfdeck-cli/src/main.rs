//! pdfdeck - Reorder, rotate, select and delete PDF pages.
//!
//! Reads the input files into one working document, applies the edits given
//! on the command line, then lists, merges or extracts the result.

mod cli;

use clap::Parser;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use pdfdeck::config::{Command, Config, OverwriteMode};
use pdfdeck::engine::{LopdfComposer, LopdfRasterizer};
use pdfdeck::error::PdfDeckError;
use pdfdeck::export::ExportArtifact;
use pdfdeck::io::{ArtifactWriter, SourceReader};
use pdfdeck::output::{
    OutputFormatter, create_formatter, display_counts, display_ingest_report, display_page_table,
    display_read_statistics, display_write_statistics,
};
use pdfdeck::session::Session;

type DeckSession = Session<LopdfRasterizer, LopdfComposer>;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    // Run the application and handle errors
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Log to stderr; `RUST_LOG` wins over the verbosity flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let default = if verbose {
        "pdfdeck=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfDeckError> {
    let config = cli.to_config()?;

    // JSON goes to stdout untouched
    let json = matches!(config.command, Command::List { json: true, .. });
    let formatter = if json {
        OutputFormatter::quiet()
    } else {
        create_formatter(&config)
    };

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", pdfdeck::NAME, pdfdeck::VERSION));
    }

    let mut session = open_session(&config, &formatter).await?;

    for op in &config.edits {
        formatter.debug(&format!("Applying {op}"));
        session.apply(op)?;
    }

    display_counts(&formatter, session.counts());

    match &config.command {
        Command::List { json, thumbnails } => {
            list(&session, &formatter, *json, thumbnails.as_deref()).await
        }
        Command::Merge => {
            formatter.info("Merging pages...");
            let artifact = session.merge(config.name.as_deref()).await?;
            deliver(&config, &formatter, &artifact).await
        }
        Command::Extract(mode) => {
            formatter.info("Extracting pages...");
            let artifact = session.extract(config.name.as_deref(), *mode).await?;
            deliver(&config, &formatter, &artifact).await
        }
    }
}

/// Read every input and ingest it into a fresh session.
async fn open_session(
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<DeckSession, PdfDeckError> {
    formatter.info(&format!("Reading {} file(s)...", config.inputs().len()));

    let reader = SourceReader::new();
    let (results, stats) = reader
        .read_all(config.inputs(), config.effective_jobs())
        .await;

    display_read_statistics(formatter, &stats);

    let mut files = Vec::with_capacity(results.len());
    for result in results {
        let source = result?;
        formatter.debug(&format!(
            "{} ({})",
            source.path.display(),
            pdfdeck::utils::format_file_size(source.file_size())
        ));
        files.push(source.file);
    }

    let mut session = Session::new(
        LopdfRasterizer::new(),
        LopdfComposer::new(config.compression),
    )
    .with_thumbnail_scale(config.thumbnail_scale)?;

    let report = session.ingest(files)?;
    display_ingest_report(formatter, &report);

    Ok(session)
}

/// Print the working document, and optionally write its thumbnails.
async fn list(
    session: &DeckSession,
    formatter: &OutputFormatter,
    json: bool,
    thumbnails: Option<&Path>,
) -> Result<(), PdfDeckError> {
    let views = session.views();

    if json {
        let document = serde_json::json!({
            "counts": session.counts(),
            "pages": views,
        });
        let text = serde_json::to_string_pretty(&document)
            .map_err(|e| PdfDeckError::invalid_argument(format!("JSON output failed: {e}")))?;
        println!("{text}");
    } else {
        display_page_table(formatter, &views);
    }

    if let Some(dir) = thumbnails {
        let writer = ArtifactWriter::new();
        writer.can_write(dir).await?;

        let mut written = 0;
        for (index, page) in session.ledger().pages().iter().enumerate() {
            let Some(thumbnail) = page.thumbnail() else {
                continue;
            };
            let path = dir.join(format!("page-{}.png", index + 1));
            writer.write_bytes(thumbnail.to_png()?, &path).await?;
            written += 1;
        }
        formatter.success(&format!(
            "Wrote {written} thumbnail(s) to {}",
            dir.display()
        ));
    }

    Ok(())
}

/// Write an artifact into the output directory.
async fn deliver(
    config: &Config,
    formatter: &OutputFormatter,
    artifact: &ExportArtifact,
) -> Result<(), PdfDeckError> {
    let writer = ArtifactWriter::new();
    writer.can_write(&config.output_dir).await?;

    let path = writer.output_path(artifact, &config.output_dir);
    handle_output_overwrite(config, formatter, &path).await?;

    let stats = writer.write(artifact, &config.output_dir).await?;
    display_write_statistics(formatter, &stats);

    if formatter.is_verbose() {
        formatter.detail("Pages", &artifact.page_count.to_string());
        for entry in &artifact.entries {
            formatter.detail("Entry", entry);
        }
    }

    Ok(())
}

/// Handle output file overwrite scenarios.
async fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
    path: &Path,
) -> Result<(), PdfDeckError> {
    if !ArtifactWriter::new().exists(path).await {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(PdfDeckError::output_exists(path.to_path_buf())),
        OverwriteMode::Prompt => {
            // In quiet mode, treat as no-clobber
            if formatter.is_quiet() {
                return Err(PdfDeckError::output_exists(path.to_path_buf()));
            }

            formatter.warning(&format!("Output file already exists: {}", path.display()));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin().read_line(&mut response)?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(PdfDeckError::Cancelled)
            }
        }
    }
}
