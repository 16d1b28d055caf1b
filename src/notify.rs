//! Transient user-facing notifications.
//!
//! Notifications are fire-and-forget: the sender never waits for them to be
//! shown. The web layer renders queued notifications into the `#toaster`
//! region of the page.

use std::sync::Mutex;

use serde::Serialize;
use uuid::Uuid;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Error,
}

impl NotificationLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
        }
    }
}

/// A single toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Channel for showing notifications to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that buffers notifications until the response is rendered.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Mutex<Vec<Notification>>,
}

impl NotificationQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything queued so far.
    pub fn drain(&self) -> Vec<Notification> {
        self.pending
            .lock()
            .map(|mut pending| std::mem::take(&mut *pending))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.push(notification);
        }
    }
}
