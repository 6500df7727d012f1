//! Contract error types
//!
//! The poll contract reports failures as numbered contract errors that
//! surface in simulation and submission text as `Error(Contract, #N)`.
//! [`PollErrorCode`] is the single table mapping those numbers to messages.

use thiserror::Error;

use crate::rpc::RpcError;
use crate::wallet::WalletError;
use crate::xdr::XdrError;

/// Fallback when preparation fails without a known contract code
pub const SIMULATION_FAILED: &str = "Simulation failed. Please check your connection.";

/// Fallback for faults with no usable text
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";

/// Error codes declared by the poll contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PollErrorCode {
    InvalidOption = 1,
    NotInitialized = 2,
    AlreadyInitialized = 3,
}

impl PollErrorCode {
    pub const ALL: [PollErrorCode; 3] = [
        PollErrorCode::InvalidOption,
        PollErrorCode::NotInitialized,
        PollErrorCode::AlreadyInitialized,
    ];

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| *c as u32 == code)
    }

    /// Find a known code in raw fault text
    pub fn from_fault_text(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| text.contains(&format!("Error(Contract, #{})", *c as u32)))
    }

    /// User-facing message
    pub fn message(self) -> &'static str {
        match self {
            PollErrorCode::InvalidOption => "Invalid option selected.",
            PollErrorCode::NotInitialized => "The poll has not been initialized yet.",
            PollErrorCode::AlreadyInitialized => "This poll has already been initialized.",
        }
    }
}

/// Turn raw fault text into the message shown to the user
///
/// A known contract code wins; otherwise the first line of the text.
pub fn surface_error_message(raw: &str) -> String {
    if let Some(code) = PollErrorCode::from_fault_text(raw) {
        return code.message().to_string();
    }

    match raw.lines().next().map(str::trim) {
        Some(line) if !line.is_empty() => line.to_string(),
        _ => UNEXPECTED_ERROR.to_string(),
    }
}

/// Errors from contract client operations
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Encoding error: {0}")]
    Xdr(#[from] XdrError),

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    /// A read-only simulation failed
    #[error("Simulation failed: {0}")]
    Simulation(String),

    /// The contract returned a value of an unexpected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Arguments rejected before anything was sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ContractError {
    /// Message to show the user for this fault
    pub fn user_message(&self) -> String {
        surface_error_message(&self.to_string())
    }
}

/// Result type for contract client operations
pub type ContractResult<T> = Result<T, ContractError>;
