//! Status and error banners

use crate::controller::TxStatus;

pub const PENDING_TEXT: &str = "Syncing selection with blockchain...";
pub const SUCCESS_TEXT: &str = "Selection confirmed";

/// Progress line under the card; only shown to a connected user
pub fn status_banner(status: TxStatus, connected: bool) -> Option<String> {
    if !connected {
        return None;
    }
    match status {
        TxStatus::Pending => Some(format!("⟳ {}", PENDING_TEXT)),
        TxStatus::Success => Some(format!("✓ {}", SUCCESS_TEXT)),
        TxStatus::Idle | TxStatus::Error => None,
    }
}

/// Error box shown below the card while a message is set
pub fn error_banner(message: &str) -> Option<String> {
    if message.is_empty() {
        None
    } else {
        Some(format!("(!) {}", message))
    }
}
