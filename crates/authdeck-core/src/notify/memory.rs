//! Notifier implementations

use parking_lot::RwLock;

use super::traits::{Notification, NotificationLevel, Notifier};
use crate::logging::SharedLogger;

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notifications: RwLock<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.read().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications.read().last().copied()
    }

    /// Drain everything recorded so far
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.notifications.write())
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.read().is_empty()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.write().push(notification);
    }
}

/// Writes notifications to a logger
pub struct LoggingNotifier {
    logger: SharedLogger,
}

impl LoggingNotifier {
    pub fn new(logger: SharedLogger) -> Self {
        Self { logger }
    }
}

impl Notifier for LoggingNotifier {
    fn notify(&self, notification: Notification) {
        let line = format!("{} ({})", notification.message, notification.message.key());
        match notification.level {
            NotificationLevel::Success => self.logger.info(&line),
            NotificationLevel::Error => self.logger.error(&line),
        }
    }
}
