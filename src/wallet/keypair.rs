//! Local keypair wallet
//!
//! Holds an ed25519 secret seed and signs on the user's behalf after asking
//! its [`Approver`].

use async_trait::async_trait;
use ed25519_dalek::SigningKey;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use stellar_xdr::curr::{HostFunction, OperationBody, TransactionEnvelope};

use super::{ApprovalKind, Approver, Wallet, WalletError, WalletResult};
use crate::xdr;

/// Wallet backed by a secret seed (`S...`)
pub struct KeypairWallet {
    key: Option<SigningKey>,
    address: String,
    approver: Arc<dyn Approver>,
    /// Access already granted for this session
    allowed: AtomicBool,
}

impl KeypairWallet {
    /// Load a wallet from a strkey secret seed
    ///
    /// With `pre_authorized` set the account is shared without an access
    /// prompt, which also makes the session resumable on start-up.
    pub fn from_secret(
        secret: &str,
        approver: Arc<dyn Approver>,
        pre_authorized: bool,
    ) -> WalletResult<Self> {
        let seed = stellar_strkey::ed25519::PrivateKey::from_string(secret.trim())
            .map_err(|e| WalletError::InvalidKey(e.to_string()))?;
        let key = SigningKey::from_bytes(&seed.0);
        let address =
            stellar_strkey::ed25519::PublicKey(key.verifying_key().to_bytes()).to_string();

        Ok(Self {
            key: Some(key),
            address,
            approver,
            allowed: AtomicBool::new(pre_authorized),
        })
    }

    /// A wallet with no key; it can never connect or sign
    pub fn empty(approver: Arc<dyn Approver>) -> Self {
        Self {
            key: None,
            address: String::new(),
            approver,
            allowed: AtomicBool::new(false),
        }
    }

    /// Account address, if a key is loaded
    pub fn address(&self) -> Option<&str> {
        self.key.as_ref().map(|_| self.address.as_str())
    }
}

#[async_trait]
impl Wallet for KeypairWallet {
    async fn is_available(&self) -> bool {
        self.key.is_some() && self.allowed.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> WalletResult<String> {
        if self.key.is_none() {
            return Err(WalletError::NoKey);
        }

        if self.allowed.load(Ordering::SeqCst) {
            return Ok(self.address.clone());
        }

        let granted = self
            .approver
            .approve(ApprovalKind::Access {
                address: self.address.clone(),
            })
            .await;

        if granted {
            self.allowed.store(true, Ordering::SeqCst);
            tracing::info!(address = %self.address, "Wallet access granted");
            Ok(self.address.clone())
        } else {
            tracing::info!("Wallet access denied");
            Ok(String::new())
        }
    }

    async fn sign(
        &self,
        envelope: &str,
        network_passphrase: &str,
    ) -> WalletResult<Option<String>> {
        let key = self.key.as_ref().ok_or(WalletError::NoKey)?;
        let decoded = xdr::decode_envelope(envelope)?;

        let approved = self
            .approver
            .approve(ApprovalKind::Sign {
                summary: describe(&decoded),
            })
            .await;
        if !approved {
            return Ok(None);
        }

        let signed = xdr::sign_envelope(decoded, key, network_passphrase)?;
        Ok(Some(xdr::encode_envelope(&signed)?))
    }
}

/// Short human description of the contract call in an envelope
fn describe(envelope: &TransactionEnvelope) -> String {
    let TransactionEnvelope::Tx(v1) = envelope else {
        return "unsupported transaction".to_string();
    };

    let calls: Vec<String> = v1
        .tx
        .operations
        .iter()
        .filter_map(|op| match &op.body {
            OperationBody::InvokeHostFunction(invoke) => match &invoke.host_function {
                HostFunction::InvokeContract(args) => Some(format!(
                    "{}({} args)",
                    String::from_utf8_lossy(args.function_name.0.as_slice()),
                    args.args.len()
                )),
                _ => None,
            },
            _ => None,
        })
        .collect();

    if calls.is_empty() {
        format!("{} operation(s)", v1.tx.operations.len())
    } else {
        format!("{}, fee {} stroops", calls.join(", "), v1.tx.fee)
    }
}
