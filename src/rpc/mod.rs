//! Soroban RPC
//!
//! The network boundary of the poll client. Every remote call goes through
//! the [`SorobanRpc`] trait so the contract client can run against a live
//! node ([`RpcClient`]) or a scripted fake in tests.

mod client;
mod types;

pub use client::{RpcClient, RpcConfig};
pub use types::{
    AccountInfo, GetTransactionResponse, LatestLedger, SendStatus, SendTransactionResponse,
    SimulateHostFunctionResult, SimulateTransactionResponse, TransactionStatus,
};

use async_trait::async_trait;
use thiserror::Error;

/// Operations the poll client needs from a Soroban RPC node
#[async_trait]
pub trait SorobanRpc: Send + Sync {
    /// Fetch the account's current sequence number
    async fn get_account(&self, address: &str) -> RpcResult<AccountInfo>;

    /// Dry-run a base64 transaction envelope
    async fn simulate_transaction(&self, envelope: &str)
        -> RpcResult<SimulateTransactionResponse>;

    /// Submit a signed base64 transaction envelope
    async fn send_transaction(&self, envelope: &str) -> RpcResult<SendTransactionResponse>;

    /// Look up a submitted transaction by hash
    async fn get_transaction(&self, hash: &str) -> RpcResult<GetTransactionResponse>;

    /// Latest ledger, used as a health check
    async fn get_latest_ledger(&self) -> RpcResult<LatestLedger>;
}

/// Errors that can occur when talking to the RPC node
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("RPC endpoint unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// JSON-RPC error object returned by the node
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Xdr(#[from] crate::xdr::XdrError),
}

/// Result type for RPC operations
pub type RpcResult<T> = Result<T, RpcError>;
