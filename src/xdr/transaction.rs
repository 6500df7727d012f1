//! Transaction building and signing

use ed25519_dalek::{Signer, SigningKey};
use sha2::{Digest, Sha256};
use stellar_xdr::curr::{
    AccountId, BytesM, DecoratedSignature, Hash, HostFunction, InvokeContractArgs,
    InvokeHostFunctionOp, LedgerEntryData, LedgerKey, LedgerKeyAccount, Limits, Memo,
    MuxedAccount, Operation, OperationBody, Preconditions, PublicKey, ReadXdr, ScAddress,
    ScSymbol, ScVal, SequenceNumber, Signature, SignatureHint, SorobanAuthorizationEntry,
    SorobanTransactionData, TimeBounds, TimePoint, Transaction, TransactionEnvelope,
    TransactionExt, TransactionResult, TransactionSignaturePayload, TransactionSignaturePayloadTaggedTransaction,
    TransactionV1Envelope, Uint256, VecM, WriteXdr,
};

use super::{XdrError, XdrResult};

/// All-zero account used as the source of read-only simulations
pub const PLACEHOLDER_ACCOUNT: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";

/// Parameters for a single contract invocation
#[derive(Debug, Clone)]
pub struct InvokeParams<'a> {
    /// Source account (`G...`)
    pub source: &'a str,
    /// Sequence number the transaction will consume (account sequence + 1)
    pub sequence: i64,
    /// Inclusion fee in stroops
    pub fee: u32,
    /// Contract address (`C...`)
    pub contract_id: &'a str,
    /// Entry point name
    pub function: &'a str,
    pub args: Vec<ScVal>,
    /// Validity window from now; 0 leaves the upper time bound open
    pub timeout_secs: u64,
}

/// Build an unsigned transaction invoking one contract function
pub fn build_invoke_tx(params: InvokeParams<'_>) -> XdrResult<TransactionEnvelope> {
    let source = parse_account(params.source)?;
    let contract = stellar_strkey::Contract::from_string(params.contract_id).map_err(|e| {
        XdrError::InvalidKey {
            key: params.contract_id.to_string(),
            reason: e.to_string(),
        }
    })?;

    let function_name: ScSymbol = ScSymbol(
        params
            .function
            .try_into()
            .map_err(|_| XdrError::Bounds(format!("function name {}", params.function)))?,
    );
    let args: VecM<ScVal> = params
        .args
        .try_into()
        .map_err(|_| XdrError::Bounds("too many arguments".to_string()))?;

    let operation = Operation {
        source_account: None,
        body: OperationBody::InvokeHostFunction(InvokeHostFunctionOp {
            host_function: HostFunction::InvokeContract(InvokeContractArgs {
                contract_address: ScAddress::Contract(Hash(contract.0)),
                function_name,
                args,
            }),
            auth: VecM::default(),
        }),
    };

    let max_time = if params.timeout_secs == 0 {
        0
    } else {
        chrono::Utc::now().timestamp().max(0) as u64 + params.timeout_secs
    };

    let tx = Transaction {
        source_account: MuxedAccount::Ed25519(Uint256(source)),
        fee: params.fee,
        seq_num: SequenceNumber(params.sequence),
        cond: Preconditions::Time(TimeBounds {
            min_time: TimePoint(0),
            max_time: TimePoint(max_time),
        }),
        memo: Memo::None,
        operations: vec![operation]
            .try_into()
            .map_err(|_| XdrError::Bounds("operations".to_string()))?,
        ext: TransactionExt::V0,
    };

    Ok(TransactionEnvelope::Tx(TransactionV1Envelope {
        tx,
        signatures: VecM::default(),
    }))
}

/// Apply simulation results to a transaction so it can be signed
///
/// Sets the soroban data (footprint and resources), copies the simulated
/// authorization entries onto the invoke operation when it carries none,
/// and raises the fee by the minimum resource fee.
pub fn assemble(
    envelope: TransactionEnvelope,
    transaction_data: &str,
    auth: &[String],
    min_resource_fee: u64,
) -> XdrResult<TransactionEnvelope> {
    let mut v1 = into_v1(envelope)?;

    let data = SorobanTransactionData::from_xdr_base64(transaction_data, Limits::none())?;
    v1.tx.ext = TransactionExt::V1(data);

    let fee = u64::from(v1.tx.fee).saturating_add(min_resource_fee);
    v1.tx.fee = u32::try_from(fee).unwrap_or(u32::MAX);

    if !auth.is_empty() {
        let entries = auth
            .iter()
            .map(|a| SorobanAuthorizationEntry::from_xdr_base64(a, Limits::none()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut operations = v1.tx.operations.to_vec();
        for op in operations.iter_mut() {
            if let OperationBody::InvokeHostFunction(invoke) = &mut op.body {
                if invoke.auth.is_empty() {
                    invoke.auth = entries
                        .clone()
                        .try_into()
                        .map_err(|_| XdrError::Bounds("auth entries".to_string()))?;
                }
            }
        }
        v1.tx.operations = operations
            .try_into()
            .map_err(|_| XdrError::Bounds("operations".to_string()))?;
    }

    Ok(TransactionEnvelope::Tx(v1))
}

/// SHA-256 of the network passphrase
pub fn network_id(passphrase: &str) -> [u8; 32] {
    Sha256::digest(passphrase.as_bytes()).into()
}

/// Hash that signers sign for a v1 transaction envelope
pub fn signature_payload_hash(
    envelope: &TransactionEnvelope,
    passphrase: &str,
) -> XdrResult<[u8; 32]> {
    let tx = match envelope {
        TransactionEnvelope::Tx(v1) => v1.tx.clone(),
        TransactionEnvelope::TxV0(_) => {
            return Err(XdrError::UnsupportedEnvelope("v0".to_string()))
        }
        TransactionEnvelope::TxFeeBump(_) => {
            return Err(XdrError::UnsupportedEnvelope("fee bump".to_string()))
        }
    };

    let payload = TransactionSignaturePayload {
        network_id: Hash(network_id(passphrase)),
        tagged_transaction: TransactionSignaturePayloadTaggedTransaction::Tx(tx),
    };

    let bytes = payload.to_xdr(Limits::none())?;
    Ok(Sha256::digest(&bytes).into())
}

/// Sign a v1 envelope and append the decorated signature
pub fn sign_envelope(
    envelope: TransactionEnvelope,
    key: &SigningKey,
    passphrase: &str,
) -> XdrResult<TransactionEnvelope> {
    let hash = signature_payload_hash(&envelope, passphrase)?;
    let signature = key.sign(&hash);

    let public = key.verifying_key().to_bytes();
    let mut hint = [0u8; 4];
    hint.copy_from_slice(&public[28..]);

    let bytes: BytesM<64> = signature
        .to_bytes()
        .to_vec()
        .try_into()
        .map_err(|_| XdrError::Bounds("signature".to_string()))?;

    let mut v1 = into_v1(envelope)?;
    let mut signatures = v1.signatures.to_vec();
    signatures.push(DecoratedSignature {
        hint: SignatureHint(hint),
        signature: Signature(bytes),
    });
    v1.signatures = signatures
        .try_into()
        .map_err(|_| XdrError::Bounds("too many signatures".to_string()))?;

    Ok(TransactionEnvelope::Tx(v1))
}

pub fn encode_envelope(envelope: &TransactionEnvelope) -> XdrResult<String> {
    Ok(envelope.to_xdr_base64(Limits::none())?)
}

pub fn decode_envelope(encoded: &str) -> XdrResult<TransactionEnvelope> {
    Ok(TransactionEnvelope::from_xdr_base64(encoded, Limits::none())?)
}

/// Base64 ledger key for an account, as used by `getLedgerEntries`
pub fn account_ledger_key(address: &str) -> XdrResult<String> {
    let key = LedgerKey::Account(LedgerKeyAccount {
        account_id: AccountId(PublicKey::PublicKeyTypeEd25519(Uint256(parse_account(
            address,
        )?))),
    });
    Ok(key.to_xdr_base64(Limits::none())?)
}

/// Extract the sequence number from a base64 account `LedgerEntryData`
pub fn sequence_from_ledger_entry(encoded: &str) -> XdrResult<i64> {
    match LedgerEntryData::from_xdr_base64(encoded, Limits::none())? {
        LedgerEntryData::Account(account) => Ok(account.seq_num.0),
        other => Err(XdrError::Unexpected(format!(
            "expected account entry, got {}",
            other.name()
        ))),
    }
}

/// Result code name of a base64 `TransactionResult`, e.g. `TxBadSeq`
pub fn transaction_result_code(encoded: &str) -> XdrResult<&'static str> {
    let result = TransactionResult::from_xdr_base64(encoded, Limits::none())?;
    Ok(result.result.name())
}

fn parse_account(address: &str) -> XdrResult<[u8; 32]> {
    stellar_strkey::ed25519::PublicKey::from_string(address)
        .map(|k| k.0)
        .map_err(|e| XdrError::InvalidKey {
            key: address.to_string(),
            reason: e.to_string(),
        })
}

fn into_v1(envelope: TransactionEnvelope) -> XdrResult<TransactionV1Envelope> {
    match envelope {
        TransactionEnvelope::Tx(v1) => Ok(v1),
        TransactionEnvelope::TxV0(_) => Err(XdrError::UnsupportedEnvelope("v0".to_string())),
        TransactionEnvelope::TxFeeBump(_) => {
            Err(XdrError::UnsupportedEnvelope("fee bump".to_string()))
        }
    }
}
