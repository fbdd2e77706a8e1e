//! Terminal notification sink.

use benefit_scan_core::notify::{Notifier, Severity};
use owo_colors::OwoColorize;

/// Prints notifications to stderr.
///
/// Info messages are dropped in quiet mode; warnings always print.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier {
    quiet: bool,
}

impl ConsoleNotifier {
    /// Create a sink; `quiet` suppresses info messages.
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        tracing::debug!(%severity, %message, "notification");
        match severity {
            Severity::Warning => eprintln!("{} {message}", "warning:".yellow().bold()),
            Severity::Info if !self.quiet => eprintln!("{} {message}", "info:".green()),
            Severity::Info => {}
        }
    }
}
