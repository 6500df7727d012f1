//! Soroban RPC request/response types
//!
//! Field names follow the JSON-RPC API (camelCase on the wire).

use serde::{Deserialize, Serialize};

// ============================================
// JSON-RPC envelope
// ============================================

#[derive(Debug, Serialize)]
pub(crate) struct JsonRpcRequest<'a, P: Serialize> {
    pub jsonrpc: &'static str,
    pub id: String,
    pub method: &'a str,
    pub params: P,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcResponse<R> {
    pub result: Option<R>,
    pub error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TransactionParams<'a> {
    pub transaction: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct HashParams<'a> {
    pub hash: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct LedgerEntriesParams {
    pub keys: Vec<String>,
}

// ============================================
// Responses
// ============================================

/// Account metadata needed to build a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub address: String,
    /// Current sequence; the next transaction uses `sequence + 1`
    pub sequence: i64,
}

/// Result of `simulateTransaction`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateTransactionResponse {
    #[serde(default)]
    pub latest_ledger: u32,
    /// Simulation failure text, including any contract error code
    #[serde(default)]
    pub error: Option<String>,
    /// Stringified stroop amount
    #[serde(default)]
    pub min_resource_fee: Option<String>,
    /// Base64 `SorobanTransactionData`
    #[serde(default)]
    pub transaction_data: Option<String>,
    #[serde(default)]
    pub results: Vec<SimulateHostFunctionResult>,
}

/// Per-operation simulation output
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SimulateHostFunctionResult {
    /// Base64 `SorobanAuthorizationEntry` values
    #[serde(default)]
    pub auth: Vec<String>,
    /// Base64 `ScVal` return value
    pub xdr: String,
}

impl SimulateTransactionResponse {
    /// Whether the simulation produced a return value without error
    pub fn is_success(&self) -> bool {
        self.error.is_none() && !self.results.is_empty()
    }

    /// Base64 return value of the first operation
    pub fn return_value(&self) -> Option<&str> {
        self.results.first().map(|r| r.xdr.as_str())
    }

    pub fn min_resource_fee(&self) -> u64 {
        self.min_resource_fee
            .as_deref()
            .and_then(|f| f.parse().ok())
            .unwrap_or(0)
    }
}

/// Status returned by `sendTransaction`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendStatus {
    Pending,
    Duplicate,
    TryAgainLater,
    Error,
}

/// Result of `sendTransaction`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionResponse {
    pub status: SendStatus,
    pub hash: String,
    #[serde(default)]
    pub latest_ledger: u32,
    #[serde(default)]
    pub error_result_xdr: Option<String>,
}

/// Status returned by `getTransaction`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Success,
    NotFound,
    Failed,
    /// Some gateways report in-flight transactions this way
    Pending,
}

impl TransactionStatus {
    /// Whether the ledger has not reached a verdict yet
    pub fn is_pending(self) -> bool {
        matches!(self, TransactionStatus::NotFound | TransactionStatus::Pending)
    }
}

/// Result of `getTransaction`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionResponse {
    pub status: TransactionStatus,
    #[serde(default)]
    pub latest_ledger: u32,
    /// Ledger that included the transaction
    #[serde(default)]
    pub ledger: Option<u32>,
    #[serde(default)]
    pub result_xdr: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LedgerEntriesResponse {
    #[serde(default)]
    pub entries: Option<Vec<LedgerEntryResult>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LedgerEntryResult {
    /// Base64 `LedgerEntryData`
    pub xdr: String,
}

/// Result of `getLatestLedger`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestLedger {
    pub id: String,
    pub protocol_version: u32,
    pub sequence: u32,
}
