//! Transaction Encoding
//!
//! Builds, assembles, and signs Stellar transactions that invoke a Soroban
//! contract, and converts between native Rust values and `ScVal`.
//!
//! ## Envelope lifecycle
//!
//! 1. [`build_invoke_tx`] creates an unsigned transaction with a single
//!    `InvokeHostFunction` operation
//! 2. The RPC node simulates it; [`assemble`] applies the returned footprint,
//!    auth entries, and resource fee
//! 3. A wallet signs the [`signature_payload_hash`] and attaches the signature
//! 4. The base64 envelope is submitted
//!
//! Envelopes cross every boundary (RPC, wallet) as base64 XDR strings.

mod scval;
mod transaction;

pub use scval::{
    address_to_scval, decode_scval, encode_scval, map_get, scval_to_string, scval_to_u32,
    string_to_scval, string_vec_to_scval, u32_to_scval,
};
pub use transaction::{
    account_ledger_key, assemble, build_invoke_tx, decode_envelope, encode_envelope,
    network_id, sequence_from_ledger_entry, sign_envelope, signature_payload_hash,
    transaction_result_code, InvokeParams, PLACEHOLDER_ACCOUNT,
};

pub use stellar_xdr::curr::{ScVal, TransactionEnvelope};

use thiserror::Error;

/// Errors raised while encoding or decoding transactions
#[derive(Error, Debug)]
pub enum XdrError {
    /// XDR (de)serialization failed
    #[error("XDR error: {0}")]
    Codec(#[from] stellar_xdr::curr::Error),

    /// A strkey (G..., C..., S...) could not be parsed
    #[error("Invalid key {key}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// A value did not fit the XDR length bounds
    #[error("Value out of bounds: {0}")]
    Bounds(String),

    /// Decoded value had an unexpected shape
    #[error("Unexpected value: {0}")]
    Unexpected(String),

    /// Envelope kind is not supported (fee bumps, v0 envelopes)
    #[error("Unsupported envelope: {0}")]
    UnsupportedEnvelope(String),
}

/// Result type for transaction encoding
pub type XdrResult<T> = Result<T, XdrError>;
