//! Status line notifications for the terminal.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Instant,
};

use client_core::{
    DismissTarget, DurationPolicy, Notification, NotificationHandle, NotificationKind,
    NotificationSink,
};

use tracing::debug;

use crate::console::Console;

struct Visible {
    handle: NotificationHandle,
    notification: Notification,
    expires_at: Option<Instant>,
}

pub struct TerminalNotifier {
    console: Arc<Console>,
    next_handle: AtomicU64,
    visible: Mutex<Option<Visible>>,
}

impl TerminalNotifier {
    pub fn new(console: Arc<Console>) -> Self {
        Self {
            console,
            next_handle: AtomicU64::new(1),
            visible: Mutex::new(None),
        }
    }

    /// The message still on screen, if it has not expired.
    pub fn status(&self) -> Option<Notification> {
        let Ok(mut visible) = self.visible.lock() else {
            return None;
        };
        let expired = visible
            .as_ref()
            .and_then(|current| current.expires_at)
            .is_some_and(|deadline| Instant::now() >= deadline);
        if expired {
            *visible = None;
        }
        visible.as_ref().map(|current| current.notification.clone())
    }
}

pub fn badge(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Info => "[..]",
        NotificationKind::Success => "[ok]",
        NotificationKind::Error => "[!!]",
    }
}

impl NotificationSink for TerminalNotifier {
    fn show(&self, notification: &Notification) -> NotificationHandle {
        let handle = NotificationHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let expires_at = match notification.duration {
            DurationPolicy::AutoDismiss(after) => {
                debug!(
                    handle = handle.0,
                    after_ms = after.as_millis() as u64,
                    "auto-dismiss scheduled"
                );
                Some(Instant::now() + after)
            }
            DurationPolicy::Persistent => None,
        };
        if let Ok(mut visible) = self.visible.lock() {
            *visible = Some(Visible {
                handle,
                notification: notification.clone(),
                expires_at,
            });
        }
        self.console.write_line(&format!(
            "{} {}",
            badge(notification.kind),
            notification.message
        ));
        handle
    }

    fn dismiss(&self, target: DismissTarget) {
        let Ok(mut visible) = self.visible.lock() else {
            return;
        };
        let matches = match (target, visible.as_ref()) {
            (_, None) => false,
            (DismissTarget::Current, Some(_)) => true,
            (DismissTarget::Handle(handle), Some(current)) => current.handle == handle,
        };
        if matches {
            *visible = None;
        }
    }
}
