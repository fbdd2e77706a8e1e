//! User-facing diagnostics.
//!
//! Every recoverable failure in the pipeline (bad taxonomy, unreadable
//! source, failed report write) ends up here instead of aborting. The sink is
//! injected, so the same pipeline runs headless in tests and with colored
//! console output in the CLI.

use std::cell::RefCell;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How important a notification is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Something went wrong and a fallback was used.
    Warning,
    /// Informational (e.g. report saved).
    Info,
}

impl Severity {
    /// Returns the severity as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Notification {
    /// Severity of the message.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

/// Sink for warnings and info messages.
pub trait Notifier {
    /// Deliver one message.
    fn notify(&self, severity: Severity, message: &str);

    /// Shorthand for a warning.
    fn warn(&self, message: &str) {
        self.notify(Severity::Warning, message);
    }

    /// Shorthand for an info message.
    fn info(&self, message: &str) {
        self.notify(Severity::Info, message);
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, severity: Severity, message: &str) {
        (**self).notify(severity, message);
    }
}

/// Routes notifications into the `tracing` event stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Warning => tracing::warn!(%message, "notification"),
            Severity::Info => tracing::info!(%message, "notification"),
        }
    }
}

/// Records notifications in memory.
///
/// Used for `--json` output and in tests.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    entries: RefCell<Vec<Notification>>,
}

impl CollectingNotifier {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.entries.borrow().clone()
    }

    /// Number of recorded warnings.
    pub fn warning_count(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|n| n.severity == Severity::Warning)
            .count()
    }

    /// Consume the collector and return the recorded notifications.
    pub fn into_notifications(self) -> Vec<Notification> {
        self.entries.into_inner()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        self.entries.borrow_mut().push(Notification {
            severity,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_records_in_order() {
        let sink = CollectingNotifier::new();
        sink.warn("first");
        sink.info("second");
        let all = sink.notifications();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].severity, Severity::Warning);
        assert_eq!(all[1].message, "second");
        assert_eq!(sink.warning_count(), 1);
    }

    #[test]
    fn reference_forwards_to_inner_sink() {
        let sink = CollectingNotifier::new();
        let by_ref = &sink;
        by_ref.info("hello");
        assert_eq!(sink.into_notifications().len(), 1);
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
        assert_eq!(Severity::Info.to_string(), "info");
    }
}
