//! Wallet Adapter
//!
//! Connection, address retrieval, and transaction signing. A wallet never
//! treats a user's refusal as a fault: denied access yields an empty
//! address and a rejected signature yields `None`.

mod approval;
mod keypair;

pub use approval::{ApprovalKind, ApprovalRequest, Approver, AutoApprove, ChannelApprover};
pub use keypair::KeypairWallet;

use async_trait::async_trait;
use thiserror::Error;

/// Common trait for wallet backends
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Whether a session already exists and can be resumed without prompting
    async fn is_available(&self) -> bool;

    /// Request account access; returns an empty string when denied
    async fn connect(&self) -> WalletResult<String>;

    /// Sign a base64 envelope; `None` means the user cancelled
    async fn sign(&self, envelope: &str, network_passphrase: &str)
        -> WalletResult<Option<String>>;
}

/// Errors that can occur in a wallet backend
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("No signing key configured")]
    NoKey,

    #[error("Invalid secret key: {0}")]
    InvalidKey(String),

    #[error("Signing failed: {0}")]
    Signing(#[from] crate::xdr::XdrError),
}

/// Result type for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;
