//! Poll Contract Client
//!
//! Translates the poll operations into Soroban's
//! build -> simulate -> sign -> submit -> confirm protocol.

use std::sync::Arc;
use std::time::Duration;

use stellar_xdr::curr::{ScVal, TransactionEnvelope};

use super::decode::{decode_poll_state, decode_voter_choice};
use super::error::SIMULATION_FAILED;
use super::{ContractError, ContractResult, PollErrorCode, PollState, SubmitOutcome};
use crate::rpc::{SendStatus, SorobanRpc, TransactionStatus};
use crate::wallet::Wallet;
use crate::xdr::{self, InvokeParams, PLACEHOLDER_ACCOUNT};

/// Configuration for the poll client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Poll contract address (`C...`)
    pub contract_id: String,
    pub network_passphrase: String,
    /// Inclusion fee for read-only simulations, in stroops
    pub read_fee: u32,
    /// Inclusion fee for submitted transactions, in stroops
    pub write_fee: u32,
    /// Validity window of submitted transactions, in seconds
    pub tx_timeout_secs: u64,
    /// Delay between confirmation checks
    pub poll_interval: Duration,
    /// How long to wait for confirmation before giving up
    pub confirm_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            contract_id: "CCFYHPXEHMQKWXJLJXZHUL72VB523UKUZBFYFHG6H74F24AETYO6HAA3".to_string(),
            network_passphrase: "Test SDF Network ; September 2015".to_string(),
            read_fee: 100,
            write_fee: 100_000,
            tx_timeout_secs: 30,
            poll_interval: Duration::from_secs(2),
            confirm_timeout: Duration::from_secs(120),
        }
    }
}

/// Client for the poll contract
pub struct PollClient {
    rpc: Arc<dyn SorobanRpc>,
    wallet: Arc<dyn Wallet>,
    config: ClientConfig,
}

impl PollClient {
    pub fn new(rpc: Arc<dyn SorobanRpc>, wallet: Arc<dyn Wallet>, config: ClientConfig) -> Self {
        Self {
            rpc,
            wallet,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn wallet(&self) -> &Arc<dyn Wallet> {
        &self.wallet
    }

    /// Check that the RPC endpoint answers
    pub async fn health_check(&self) -> ContractResult<u32> {
        Ok(self.rpc.get_latest_ledger().await?.sequence)
    }

    /// Read the current poll state; `None` on any failure
    pub async fn fetch_poll_state(&self) -> Option<PollState> {
        match self.try_fetch_poll_state().await {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::error!(error = %e, "Error fetching poll state");
                None
            }
        }
    }

    /// Read the current poll state, reporting why it failed
    pub async fn try_fetch_poll_state(&self) -> ContractResult<PollState> {
        let value = self.simulate_read("get_poll_state", Vec::new()).await?;
        tracing::debug!(raw = ?value, "Poll raw state");

        let state = decode_poll_state(&value)?;
        tracing::debug!(votes = ?state.votes, "Parsed votes");
        Ok(state)
    }

    /// The option `address` currently has selected; `None` when it has not
    /// voted or the lookup failed
    pub async fn fetch_voter_choice(&self, address: &str) -> Option<u32> {
        match self.try_fetch_voter_choice(address).await {
            Ok(choice) => choice,
            Err(e) => {
                tracing::warn!(error = %e, "Error getting voter choice");
                None
            }
        }
    }

    /// The option `address` currently has selected
    ///
    /// `Ok(None)` only when the contract has no stored choice for it.
    pub async fn try_fetch_voter_choice(&self, address: &str) -> ContractResult<Option<u32>> {
        let args = vec![xdr::address_to_scval(address)?];
        let value = self.simulate_read("get_voter_choice", args).await?;
        Ok(decode_voter_choice(&value))
    }

    /// Whether `address` has a stored vote
    pub async fn has_voted(&self, address: &str) -> ContractResult<bool> {
        Ok(self.try_fetch_voter_choice(address).await?.is_some())
    }

    /// Cast, change, or undo a vote
    ///
    /// Voting for the option already chosen removes the vote; voting for a
    /// different option moves it.
    pub async fn submit_vote(
        &self,
        option_index: u32,
        address: &str,
    ) -> ContractResult<SubmitOutcome> {
        tracing::info!(option_index, address, "Submitting vote");

        let args = vec![
            xdr::address_to_scval(address)?,
            xdr::u32_to_scval(option_index),
        ];
        self.invoke("vote", args, address).await
    }

    /// Set the question and options on an uninitialized poll contract
    pub async fn initialize_poll(
        &self,
        question: &str,
        options: &[String],
        address: &str,
    ) -> ContractResult<SubmitOutcome> {
        if options.len() < 2 {
            return Err(ContractError::InvalidInput(
                "At least 2 options required".to_string(),
            ));
        }

        tracing::info!(question, options = options.len(), "Initializing poll");

        let args = vec![
            xdr::string_to_scval(question)?,
            xdr::string_vec_to_scval(options)?,
        ];
        self.invoke("init", args, address).await
    }

    /// Simulate a read-only call from the placeholder account
    async fn simulate_read(&self, function: &str, args: Vec<ScVal>) -> ContractResult<ScVal> {
        let envelope = xdr::build_invoke_tx(InvokeParams {
            source: PLACEHOLDER_ACCOUNT,
            sequence: 1,
            fee: self.config.read_fee,
            contract_id: &self.config.contract_id,
            function,
            args,
            timeout_secs: 0,
        })?;

        let simulated = self
            .rpc
            .simulate_transaction(&xdr::encode_envelope(&envelope)?)
            .await?;

        if let Some(error) = simulated.error {
            return Err(ContractError::Simulation(error));
        }

        let encoded = simulated
            .results
            .first()
            .map(|r| r.xdr.as_str())
            .ok_or_else(|| ContractError::Simulation(format!("{} returned no result", function)))?;

        Ok(xdr::decode_scval(encoded)?)
    }

    /// Full write path for one contract call
    async fn invoke(
        &self,
        function: &str,
        args: Vec<ScVal>,
        address: &str,
    ) -> ContractResult<SubmitOutcome> {
        let account = self.rpc.get_account(address).await?;

        let envelope = xdr::build_invoke_tx(InvokeParams {
            source: address,
            sequence: account.sequence + 1,
            fee: self.config.write_fee,
            contract_id: &self.config.contract_id,
            function,
            args,
            timeout_secs: self.config.tx_timeout_secs,
        })?;

        tracing::info!(function, "Preparing transaction");
        let prepared = match self.prepare(envelope).await {
            Ok(prepared) => prepared,
            Err(rejected) => return Ok(rejected),
        };

        let signed = match self
            .wallet
            .sign(
                &xdr::encode_envelope(&prepared)?,
                &self.config.network_passphrase,
            )
            .await?
        {
            Some(signed) => signed,
            None => {
                tracing::info!("Transaction cancelled by user");
                return Ok(SubmitOutcome::Cancelled);
            }
        };

        let sent = self.rpc.send_transaction(&signed).await?;
        tracing::info!(hash = %sent.hash, status = ?sent.status, "Transaction submitted");

        match sent.status {
            SendStatus::Pending | SendStatus::Duplicate => self.await_confirmation(&sent.hash).await,
            SendStatus::TryAgainLater => Ok(SubmitOutcome::Failed {
                hash: sent.hash,
                reason: "The network is busy. Please try again later.".to_string(),
            }),
            SendStatus::Error => {
                let reason = submit_error_reason(sent.error_result_xdr.as_deref());
                tracing::warn!(hash = %sent.hash, reason = %reason, "Transaction rejected on submit");
                Ok(SubmitOutcome::Failed {
                    hash: sent.hash,
                    reason: format!("Transaction failed to submit: {}", reason),
                })
            }
        }
    }

    /// Simulate and assemble a transaction for signing
    ///
    /// A failure here is local: the returned outcome is `Rejected` and
    /// nothing has been submitted.
    async fn prepare(
        &self,
        envelope: TransactionEnvelope,
    ) -> Result<TransactionEnvelope, SubmitOutcome> {
        let rejected = |text: &str| {
            let code = PollErrorCode::from_fault_text(text);
            SubmitOutcome::Rejected {
                code,
                message: code
                    .map(|c| c.message().to_string())
                    .unwrap_or_else(|| SIMULATION_FAILED.to_string()),
            }
        };

        let encoded = xdr::encode_envelope(&envelope).map_err(|e| rejected(&e.to_string()))?;

        let simulated = match self.rpc.simulate_transaction(&encoded).await {
            Ok(simulated) => simulated,
            Err(e) => {
                tracing::warn!(error = %e, "Soroban simulation failed");
                return Err(rejected(&e.to_string()));
            }
        };

        if let Some(error) = simulated.error.as_deref() {
            tracing::warn!(error, "Soroban simulation failed");
            return Err(rejected(error));
        }

        let Some(transaction_data) = simulated.transaction_data.as_deref() else {
            tracing::warn!("Simulation returned no transaction data");
            return Err(rejected(""));
        };

        let auth = simulated
            .results
            .first()
            .map(|r| r.auth.clone())
            .unwrap_or_default();

        xdr::assemble(
            envelope,
            transaction_data,
            &auth,
            simulated.min_resource_fee(),
        )
        .map_err(|e| {
            tracing::warn!(error = %e, "Failed to assemble transaction");
            rejected(&e.to_string())
        })
    }

    /// Poll `getTransaction` until the ledger decides or time runs out
    async fn await_confirmation(&self, hash: &str) -> ContractResult<SubmitOutcome> {
        let deadline = tokio::time::Instant::now() + self.config.confirm_timeout;

        loop {
            tokio::time::sleep(self.config.poll_interval).await;

            match self.rpc.get_transaction(hash).await {
                Ok(response) if response.status.is_pending() => {
                    tracing::debug!(hash, "Transaction still pending");
                }
                Ok(response) => {
                    return Ok(match response.status {
                        TransactionStatus::Success => SubmitOutcome::Confirmed {
                            hash: hash.to_string(),
                            ledger: response.ledger,
                        },
                        _ => SubmitOutcome::Failed {
                            hash: hash.to_string(),
                            reason: "Transaction failed on the ledger.".to_string(),
                        },
                    });
                }
                Err(e) => {
                    // Status lookups are idempotent; keep polling until the deadline
                    tracing::warn!(hash, error = %e, "Failed to fetch transaction status");
                }
            }

            if tokio::time::Instant::now() >= deadline {
                tracing::warn!(hash, "Gave up waiting for transaction confirmation");
                return Ok(SubmitOutcome::TimedOut {
                    hash: hash.to_string(),
                });
            }
        }
    }
}

/// Readable reason for a send rejected with `ERROR`
fn submit_error_reason(error_result_xdr: Option<&str>) -> String {
    let code = match error_result_xdr.map(xdr::transaction_result_code) {
        Some(Ok(code)) => code,
        Some(Err(e)) => {
            tracing::debug!(error = %e, "Undecodable transaction result");
            return "Transaction rejected by the network.".to_string();
        }
        None => return "Transaction rejected by the network.".to_string(),
    };

    match code {
        "TxBadSeq" => "Account sequence is out of date. Please try again.".to_string(),
        "TxInsufficientFee" => "Fee too low for current network load.".to_string(),
        "TxInsufficientBalance" => "Not enough XLM to pay the fee.".to_string(),
        "TxTooLate" => "Transaction expired before it was submitted.".to_string(),
        other => other.to_string(),
    }
}
