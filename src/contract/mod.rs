//! Poll Contract Client
//!
//! Everything the application knows about the on-chain poll goes through
//! this module.
//!
//! ## Entry points consumed
//!
//! - `get_poll_state() -> PollState` (read, simulated only)
//! - `get_voter_choice(address) -> Option<u32>` (read, simulated only)
//! - `vote(address, option_index)` (write: cast, change, or undo)
//! - `init(question, options)` (write, once per contract)
//!
//! Reads are simulated from a placeholder account and never submitted.
//! Writes fetch the caller's sequence, simulate, get signed by the wallet,
//! and are then submitted and polled until the ledger decides.

mod client;
mod decode;
mod error;
mod types;

pub use client::{ClientConfig, PollClient};
pub use decode::{decode_poll_state, decode_voter_choice, VoteTally};
pub use error::{
    surface_error_message, ContractError, ContractResult, PollErrorCode, SIMULATION_FAILED,
    UNEXPECTED_ERROR,
};
pub use types::{PollState, SubmitOutcome};
