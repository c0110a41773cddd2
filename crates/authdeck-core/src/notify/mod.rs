//! Notifications surfaced to the operator after fetches and toggles

mod traits;
mod memory;

pub use traits::{Notification, NotificationLevel, NotificationMessage, Notifier, SharedNotifier};
pub use memory::{LoggingNotifier, MemoryNotifier};
