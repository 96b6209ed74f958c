//! Status lines for the terminal.
//!
//! Status lines go to stdout; warnings and errors go to stderr so that
//! machine-readable output on stdout stays clean.
//!
//! # Examples
//!
//! ```
//! use pdfdeck::output::formatter::{MessageLevel, OutputFormatter};
//!
//! let out = OutputFormatter::new(false, false);
//! out.info("Reading files...");
//! out.success("Merged 3 pages");
//! assert_eq!(out.format(MessageLevel::Info, "plain"), "plain");
//! ```

use crate::config::Config;
use std::io::{self, IsTerminal};

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl MessageLevel {
    fn prefix(self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "✓ ",
            Self::Warning => "⚠ ",
            Self::Error => "✗ ",
            Self::Debug => "→ ",
        }
    }

    fn ansi(self) -> Option<&'static str> {
        match self {
            Self::Info => None,
            Self::Success => Some("32"),
            Self::Warning => Some("33"),
            Self::Error => Some("31"),
            Self::Debug => Some("36"),
        }
    }

    /// Lowest verbosity at which the level is printed.
    fn threshold(self) -> Verbosity {
        match self {
            Self::Warning | Self::Error => Verbosity::Quiet,
            Self::Info | Self::Success => Verbosity::Normal,
            Self::Debug => Verbosity::Verbose,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

/// Prints session progress at the verbosity chosen on the command line.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    verbosity: Verbosity,
    colored: bool,
}

impl OutputFormatter {
    /// Create a formatter. `quiet` wins over `verbose`.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let verbosity = match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        };
        Self {
            verbosity,
            colored: io::stdout().is_terminal() && std::env::var_os("TERM").is_some(),
        }
    }

    /// Formatter for the verbosity flags of `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.quiet, config.verbose)
    }

    /// Only warnings and errors.
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Everything, including debug lines and details.
    pub fn verbose() -> Self {
        Self::new(false, true)
    }

    /// Disable ANSI colors.
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    /// Print an informational message.
    pub fn info(&self, message: &str) {
        self.emit(MessageLevel::Info, message);
    }

    /// Print a success message.
    pub fn success(&self, message: &str) {
        self.emit(MessageLevel::Success, message);
    }

    /// Print a warning, even in quiet mode.
    pub fn warning(&self, message: &str) {
        self.emit(MessageLevel::Warning, message);
    }

    /// Print an error, even in quiet mode.
    pub fn error(&self, message: &str) {
        self.emit(MessageLevel::Error, message);
    }

    /// Print a debug line (verbose only).
    pub fn debug(&self, message: &str) {
        self.emit(MessageLevel::Debug, message);
    }

    /// Render a message with its level prefix and, if enabled, color.
    pub fn format(&self, level: MessageLevel, message: &str) -> String {
        let prefix = level.prefix();
        match level.ansi() {
            Some(code) if self.colored => format!("\x1b[{code}m{prefix}{message}\x1b[0m"),
            _ => format!("{prefix}{message}"),
        }
    }

    fn emit(&self, level: MessageLevel, message: &str) {
        if self.verbosity < level.threshold() {
            return;
        }
        let line = self.format(level, message);
        match level {
            MessageLevel::Warning | MessageLevel::Error => eprintln!("{line}"),
            _ => println!("{line}"),
        }
    }

    /// Print a blank line followed by a heading.
    pub fn section(&self, title: &str) {
        if self.should_print() {
            println!("\n{title}");
        }
    }

    /// Print an indented `label: value` line (verbose only).
    pub fn detail(&self, label: &str, value: &str) {
        if self.is_verbose() {
            println!("  {label}: {value}");
        }
    }

    /// Print one row of the page table.
    pub fn table_row(&self, columns: &[&str]) {
        if self.should_print() {
            println!("  {}", columns.join(" │ "));
        }
    }

    /// Whether anything besides warnings and errors is printed.
    pub fn should_print(&self) -> bool {
        self.verbosity >= Verbosity::Normal
    }

    /// Whether debug lines and details are printed.
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Whether only warnings and errors are printed.
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}
