//! User-facing notifications.
//!
//! The controller reports the result of every load and mutation as a
//! one-shot [`Notification`]. How it is shown is up to the [`Notifier`].

use std::fmt;
use std::sync::{Mutex, PoisonError};

use evallo_api::Operation;

pub const EVENTS_LOADED: &str = "Events loaded successfully";
pub const EVENTS_LOAD_FAILED: &str = "Failed to load events";

/// Returns the message reported once an operation has settled.
pub fn outcome_message(operation: Operation, succeeded: bool) -> &'static str {
    match (operation, succeeded) {
        (Operation::Create, true) => "Event created successfully",
        (Operation::Create, false) => "Failed to create event",
        (Operation::Read, true) => EVENTS_LOADED,
        (Operation::Read, false) => EVENTS_LOAD_FAILED,
        (Operation::Update, true) => "Event updated successfully",
        (Operation::Update, false) => "Failed to update event",
        (Operation::Delete, true) => "Event deleted successfully",
        (Operation::Delete, false) => "Failed to delete event",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A message shown once to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    /// Builds the notification for a settled operation.
    pub fn for_outcome(operation: Operation, succeeded: bool) -> Self {
        let message = outcome_message(operation, succeeded);
        if succeeded {
            Self::success(message)
        } else {
            Self::error(message)
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NotificationLevel::Success => write!(f, "✓ {}", self.message),
            NotificationLevel::Error => write!(f, "✗ {}", self.message),
        }
    }
}

/// Displays notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to stderr so stdout stays machine-readable.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        eprintln!("{}", notification);
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns only the message texts, in order.
    pub fn messages(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|n| n.message)
            .collect()
    }

    pub fn clear(&self) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_levels() {
        let ok = Notification::for_outcome(Operation::Delete, true);
        assert_eq!(ok.message, "Event deleted successfully");
        assert!(!ok.is_error());

        let failed = Notification::for_outcome(Operation::Update, false);
        assert_eq!(failed.message, "Failed to update event");
        assert!(failed.is_error());
    }

    #[test]
    fn display_marks_level() {
        assert_eq!(
            Notification::error(EVENTS_LOAD_FAILED).to_string(),
            "✗ Failed to load events"
        );
    }

    #[test]
    fn recording_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::success("a"));
        notifier.notify(Notification::error("b"));
        assert_eq!(notifier.messages(), vec!["a", "b"]);
        notifier.clear();
        assert!(notifier.notifications().is_empty());
    }
}
