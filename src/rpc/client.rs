//! Soroban JSON-RPC Client
//!
//! HTTP client for a Soroban RPC endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::*;
use super::{RpcError, RpcResult, SorobanRpc};
use crate::xdr;

/// Soroban JSON-RPC client
pub struct RpcClient {
    client: Client,
    config: RpcConfig,
}

/// Configuration for the RPC client
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// Endpoint URL (e.g., "https://soroban-testnet.stellar.org")
    pub url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "https://soroban-testnet.stellar.org".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

impl RpcClient {
    /// Create a new RPC client with the given configuration
    pub fn new(config: RpcConfig) -> RpcResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Issue one JSON-RPC call and unwrap its result
    async fn call<P, R>(&self, method: &str, params: P) -> RpcResult<R>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: uuid::Uuid::new_v4().to_string(),
            method,
            params,
        };

        tracing::trace!(method, id = %request.id, "Sending RPC request");

        let response = self
            .client
            .post(&self.config.url)
            .json(&request)
            .send()
            .await
            .map_err(classify)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(RpcError::Http {
                status: status.as_u16(),
                message: text,
            });
        }

        let body: JsonRpcResponse<R> = response.json().await.map_err(RpcError::Request)?;

        if let Some(error) = body.error {
            let message = match error.data {
                Some(serde_json::Value::String(data)) => format!("{}: {}", error.message, data),
                _ => error.message,
            };
            return Err(RpcError::Rpc {
                code: error.code,
                message,
            });
        }

        body.result
            .ok_or_else(|| RpcError::Malformed(format!("{} returned no result", method)))
    }
}

#[async_trait]
impl SorobanRpc for RpcClient {
    async fn get_account(&self, address: &str) -> RpcResult<AccountInfo> {
        let key = xdr::account_ledger_key(address)?;
        let response: LedgerEntriesResponse = self
            .call("getLedgerEntries", LedgerEntriesParams { keys: vec![key] })
            .await?;

        let entry = response
            .entries
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| RpcError::AccountNotFound(address.to_string()))?;

        Ok(AccountInfo {
            address: address.to_string(),
            sequence: xdr::sequence_from_ledger_entry(&entry.xdr)?,
        })
    }

    async fn simulate_transaction(
        &self,
        envelope: &str,
    ) -> RpcResult<SimulateTransactionResponse> {
        self.call(
            "simulateTransaction",
            TransactionParams {
                transaction: envelope,
            },
        )
        .await
    }

    async fn send_transaction(&self, envelope: &str) -> RpcResult<SendTransactionResponse> {
        self.call(
            "sendTransaction",
            TransactionParams {
                transaction: envelope,
            },
        )
        .await
    }

    async fn get_transaction(&self, hash: &str) -> RpcResult<GetTransactionResponse> {
        self.call("getTransaction", HashParams { hash }).await
    }

    async fn get_latest_ledger(&self) -> RpcResult<LatestLedger> {
        self.call("getLatestLedger", serde_json::Value::Null).await
    }
}

fn classify(e: reqwest::Error) -> RpcError {
    if e.is_timeout() {
        RpcError::Timeout
    } else if e.is_connect() {
        RpcError::Unavailable
    } else {
        RpcError::Request(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RpcConfig::default();
        assert_eq!(config.url, "https://soroban-testnet.stellar.org");
        assert_eq!(config.request_timeout_ms, 30_000);
    }

    #[test]
    fn test_request_shape() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: "1".to_string(),
            method: "getTransaction",
            params: HashParams { hash: "abc" },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["method"], "getTransaction");
        assert_eq!(json["params"]["hash"], "abc");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let client = RpcClient::new(RpcConfig {
            url: "http://127.0.0.1:1".to_string(),
            request_timeout_ms: 1000,
        })
        .unwrap();

        let result = client.get_latest_ledger().await;
        assert!(matches!(
            result,
            Err(RpcError::Unavailable) | Err(RpcError::Timeout) | Err(RpcError::Request(_))
        ));
    }
}
