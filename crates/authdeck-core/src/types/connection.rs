//! Connection status published by the host application

use serde::{Deserialize, Serialize};

/// State of the link to the remote management service
///
/// Owned outside this crate. Anything other than `Connected` means fetches and
/// toggles are skipped without reporting an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Connecting,
    #[default]
    Disconnected,
    Error,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }
}
