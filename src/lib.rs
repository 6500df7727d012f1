//! # Stellar Poll
//!
//! Terminal client for a single-question poll stored in a Soroban smart
//! contract on the Stellar network.
//!
//! ## Features
//!
//! - **Live results**: the poll is re-read from the contract every few seconds
//! - **Cast, change, undo**: voting for your current choice removes the vote
//! - **Local signing**: ed25519 keypair wallet with per-transaction approval
//! - **Bounded confirmation**: submitted transactions are polled until they
//!   land or a timeout expires
//!
//! ## Modules
//!
//! - [`contract`]: poll operations over the Soroban transaction protocol
//! - [`controller`]: UI state machine and its update loop
//! - [`view`]: terminal rendering
//! - [`rpc`]: Soroban JSON-RPC boundary
//! - [`wallet`]: account access and signing
//! - [`xdr`]: envelope building, encoding, and signing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stellar_poll::{AutoApprove, Config, KeypairWallet, PollClient, RpcClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (config, _) = Config::load_default()?;
//!     let rpc = Arc::new(RpcClient::new(config.rpc_config())?);
//!     let wallet = Arc::new(KeypairWallet::empty(Arc::new(AutoApprove)));
//!     let client = PollClient::new(rpc, wallet, config.client_config());
//!
//!     if let Some(poll) = client.fetch_poll_state().await {
//!         println!("{}: {} votes", poll.question, poll.total_votes());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod contract;
pub mod controller;
pub mod logging;
pub mod rpc;
pub mod view;
pub mod wallet;
pub mod xdr;

#[cfg(test)]
pub(crate) mod testing;

// Re-export top-level types for convenience
pub use config::{generate_default_config, Config, ConfigError};

pub use contract::{
    surface_error_message, ClientConfig, ContractError, ContractResult, PollClient,
    PollErrorCode, PollState, SubmitOutcome,
};

pub use controller::{Action, Controller, ControllerConfig, Event, TxStatus, UiState};

pub use rpc::{RpcClient, RpcConfig, RpcError, RpcResult, SorobanRpc};

pub use wallet::{
    ApprovalKind, ApprovalRequest, Approver, AutoApprove, ChannelApprover, KeypairWallet, Wallet,
    WalletError, WalletResult,
};

pub use view::{render_screen, PollCardView};
