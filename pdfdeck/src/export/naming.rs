//! Output file names.

/// Base name used by `extract` when no name is given.
pub const DEFAULT_EXTRACT_NAME: &str = "extracted";

/// File name without directories and without a trailing `.pdf` (any case).
///
/// # Examples
///
/// ```
/// use pdfdeck::export::naming::base_name;
///
/// assert_eq!(base_name("reports/Q3 Report.PDF"), "Q3 Report");
/// assert_eq!(base_name("notes"), "notes");
/// ```
pub fn base_name(name: &str) -> &str {
    let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
    if crate::utils::has_pdf_extension(file) && file.len() > 4 {
        &file[..file.len() - 4]
    } else {
        file
    }
}

/// `{name}.pdf`
pub fn pdf_filename(name: &str) -> String {
    format!("{name}.pdf")
}

/// `{name}_page-{position}.pdf`, with `position` the 1-based working position.
pub fn page_filename(name: &str, position: usize) -> String {
    format!("{name}_page-{position}.pdf")
}

/// `{name}_extract.zip`
pub fn archive_filename(name: &str) -> String {
    format!("{name}_extract.zip")
}
