//! User-facing notifications.
//!
//! Components in this crate surface outcomes ("Order placed successfully!",
//! "Failed to update cart") through the [`Notify`] seam rather than talking
//! to any particular UI. A shell renders notices however it likes: the CLI
//! prints them, a GUI would show toasts, tests record them.

use std::sync::{Arc, Mutex};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A single user-facing notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Sink for user-facing notices.
pub trait Notify: Send + Sync {
    /// Surface a success notice.
    fn success(&self, message: &str);

    /// Surface an error notice.
    fn error(&self, message: &str);
}

/// Shared handle to a notifier.
pub type SharedNotifier = Arc<dyn Notify>;

/// Notifier that forwards notices to the tracing diagnostic channel.
///
/// The headless default: success notices at info, error notices at warn.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notify for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "pepperleaf::notify", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::warn!(target: "pepperleaf::notify", "{message}");
    }
}

/// Notifier that records notices in memory.
///
/// Useful for UI shells that poll and render pending notices, and for tests
/// asserting on exactly which notices an operation produced.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices recorded so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map_or_else(|_| Vec::new(), |n| n.clone())
    }

    /// Remove and return all recorded notices.
    pub fn drain(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map_or_else(|_| Vec::new(), |mut n| std::mem::take(&mut *n))
    }

    /// Messages of recorded success notices.
    #[must_use]
    pub fn successes(&self) -> Vec<String> {
        self.of_kind(NoticeKind::Success)
    }

    /// Messages of recorded error notices.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.of_kind(NoticeKind::Error)
    }

    fn of_kind(&self, kind: NoticeKind) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|n| n.kind == kind)
            .map(|n| n.message)
            .collect()
    }

    fn push(&self, kind: NoticeKind, message: &str) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(Notice {
                kind,
                message: message.to_string(),
            });
        }
    }
}

impl Notify for MemoryNotifier {
    fn success(&self, message: &str) {
        self.push(NoticeKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.push(NoticeKind::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_notifier_records_in_order() {
        let notifier = MemoryNotifier::new();
        notifier.success("first");
        notifier.error("second");

        let notices = notifier.notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].kind, NoticeKind::Success);
        assert_eq!(notices[1].message, "second");
    }

    #[test]
    fn test_drain_empties_the_buffer() {
        let notifier = MemoryNotifier::new();
        notifier.success("once");
        assert_eq!(notifier.drain().len(), 1);
        assert!(notifier.notices().is_empty());
    }
}
