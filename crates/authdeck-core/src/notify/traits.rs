//! Operator notifications

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// Severity shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// What happened, as a translation key plus arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationMessage {
    /// A list or config fetch failed
    RefreshFailed,
    /// A provider list could not be persisted
    UpdateFailed,
    /// A provider list was persisted
    ConfigEnabled,
    /// An auth file status was persisted
    StatusUpdateSuccess { disabled: bool },
    /// An auth file status could not be persisted
    StatusUpdateFailed,
}

impl NotificationMessage {
    /// Translation key understood by the host's i18n layer
    pub fn key(&self) -> &'static str {
        match self {
            NotificationMessage::RefreshFailed => "notification.refresh_failed",
            NotificationMessage::UpdateFailed => "notification.update_failed",
            NotificationMessage::ConfigEnabled => "notification.config_enabled",
            NotificationMessage::StatusUpdateSuccess { .. } => "auth_files.status_update_success",
            NotificationMessage::StatusUpdateFailed => "auth_files.status_update_failed",
        }
    }
}

impl fmt::Display for NotificationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationMessage::RefreshFailed => write!(f, "Refresh failed"),
            NotificationMessage::UpdateFailed => write!(f, "Update failed"),
            NotificationMessage::ConfigEnabled => write!(f, "Configuration updated"),
            NotificationMessage::StatusUpdateSuccess { disabled: true } => write!(f, "Auth file disabled"),
            NotificationMessage::StatusUpdateSuccess { disabled: false } => write!(f, "Auth file enabled"),
            NotificationMessage::StatusUpdateFailed => write!(f, "Failed to update auth file status"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: NotificationMessage,
}

impl Notification {
    pub fn success(message: NotificationMessage) -> Self {
        Self {
            level: NotificationLevel::Success,
            message,
        }
    }

    pub fn error(message: NotificationMessage) -> Self {
        Self {
            level: NotificationLevel::Error,
            message,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Sink for user-visible notifications
///
/// Implementations:
/// - `MemoryNotifier`: Records notifications for tests and polling hosts
/// - `LoggingNotifier`: Writes them to a `Logger`
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

pub type SharedNotifier = Arc<dyn Notifier>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!(NotificationMessage::UpdateFailed.key(), "notification.update_failed");
        assert_eq!(
            NotificationMessage::StatusUpdateSuccess { disabled: true }.key(),
            "auth_files.status_update_success"
        );
    }

    #[test]
    fn test_levels() {
        assert!(Notification::error(NotificationMessage::RefreshFailed).is_error());
        assert!(!Notification::success(NotificationMessage::ConfigEnabled).is_error());
        assert_eq!(
            NotificationMessage::StatusUpdateSuccess { disabled: false }.to_string(),
            "Auth file enabled"
        );
    }
}
