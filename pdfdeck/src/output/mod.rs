//! User-facing output for pdfdeck.
//!
//! This module handles everything printed to the user:
//! - Formatted status messages
//! - The page table of a session
//! - Read and write summaries
//! - Quiet and verbose modes
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::config::Config;
//! use pdfdeck::output::OutputFormatter;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Reading files");
//! formatter.success("Merge complete");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::config::Config;
use crate::io::{ReadStatistics, WriteStatistics};
use crate::session::{IngestReport, PageCounts, PageView};

/// Create an output formatter from configuration.
pub fn create_formatter(config: &Config) -> OutputFormatter {
    OutputFormatter::from_config(config)
}

/// Display read statistics to the user.
pub fn display_read_statistics(formatter: &OutputFormatter, stats: &ReadStatistics) {
    if stats.failure_count > 0 {
        formatter.warning(&format!(
            "Warning: {} file(s) could not be read",
            stats.failure_count
        ));
    }

    formatter.info(&format!(
        "Read {} file(s) in {:.2}s, {}",
        stats.success_count,
        stats.total_time.as_secs_f64(),
        stats.format_total_size()
    ));
}

/// Display the outcome of an ingestion.
pub fn display_ingest_report(formatter: &OutputFormatter, report: &IngestReport) {
    formatter.info(&format!(
        "Added {} file(s), {} page(s)",
        report.files, report.pages
    ));

    if report.render_failures > 0 {
        formatter.warning(&format!(
            "{} page(s) could not be previewed and will show blank",
            report.render_failures
        ));
    }
}

/// Display the live page counts.
pub fn display_counts(formatter: &OutputFormatter, counts: PageCounts) {
    formatter.info(&format_counts(counts));
}

/// `"5 pages, 2 selected"`
pub fn format_counts(counts: PageCounts) -> String {
    let noun = if counts.total == 1 { "page" } else { "pages" };
    format!("{} {noun}, {} selected", counts.total, counts.selected)
}

/// Display the ordered page table.
pub fn display_page_table(formatter: &OutputFormatter, views: &[PageView]) {
    formatter.section("Pages");
    for view in views {
        let columns = page_columns(view);
        let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
        formatter.table_row(&columns);
    }
}

/// Table columns for one page: position, source, rotation, selection, preview.
pub fn page_columns(view: &PageView) -> [String; 5] {
    [
        format!("{:>3}", view.position),
        format!("{} p.{}", view.source_name, view.source_page),
        format!("{:>3}°", view.rotation.as_degrees()),
        if view.selected { "selected" } else { "" }.to_string(),
        match view.thumbnail {
            Some(size) => format!("{}x{}", size.width, size.height),
            None => "blank".to_string(),
        },
    ]
}

/// Display write statistics to the user.
pub fn display_write_statistics(formatter: &OutputFormatter, stats: &WriteStatistics) {
    formatter.success(&format!(
        "Wrote {} ({})",
        stats.output_path.display(),
        stats.format_file_size()
    ));
    formatter.detail("Type", stats.mime);
    formatter.detail(
        "Write time",
        &format!("{:.2}ms", stats.write_time.as_secs_f64() * 1000.0),
    );
}
