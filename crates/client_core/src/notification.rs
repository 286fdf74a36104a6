//! Status notifications and the single-slot discipline the table controller uses.

use std::{sync::Arc, time::Duration};

pub const DEFAULT_AUTO_DISMISS: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationPolicy {
    AutoDismiss(Duration),
    /// Stays visible until dismissed explicitly.
    Persistent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub duration: DurationPolicy,
}

impl Notification {
    pub fn pending(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Info,
            duration: DurationPolicy::Persistent,
        }
    }

    pub fn success(message: impl Into<String>, after: Duration) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Success,
            duration: DurationPolicy::AutoDismiss(after),
        }
    }

    pub fn error(message: impl Into<String>, after: Duration) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Error,
            duration: DurationPolicy::AutoDismiss(after),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissTarget {
    Handle(NotificationHandle),
    Current,
}

/// Displays status messages.
///
/// Dismissing a handle that already expired or was replaced must be a no-op.
pub trait NotificationSink: Send + Sync {
    fn show(&self, notification: &Notification) -> NotificationHandle;
    fn dismiss(&self, target: DismissTarget);
}

/// Owned handle to the one notification the controller considers visible.
pub struct NotificationSlot {
    sink: Arc<dyn NotificationSink>,
    current: Option<NotificationHandle>,
}

impl NotificationSlot {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            sink,
            current: None,
        }
    }

    pub fn current(&self) -> Option<NotificationHandle> {
        self.current
    }

    /// Retires the current notification, then shows `notification`.
    pub fn show(&mut self, notification: Notification) -> NotificationHandle {
        if let Some(previous) = self.current.take() {
            self.sink.dismiss(DismissTarget::Handle(previous));
        }
        let handle = self.sink.show(&notification);
        tracing::debug!(
            handle = handle.0,
            kind = ?notification.kind,
            message = %notification.message,
            "notification shown"
        );
        self.current = Some(handle);
        handle
    }

    /// Dismisses `handle` if it is still the visible notification.
    pub fn dismiss(&mut self, handle: NotificationHandle) {
        if self.current == Some(handle) {
            self.current = None;
            self.sink.dismiss(DismissTarget::Handle(handle));
        }
    }
}

#[cfg(test)]
#[path = "tests/notification_tests.rs"]
mod tests;
