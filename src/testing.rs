//! Test doubles for the RPC node and the wallet
//!
//! [`FakeRpc`] behaves like a node hosting the poll contract: reads are
//! answered from an in-memory poll, and a submitted vote updates it with the
//! contract's cast/change/undo rules.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use stellar_xdr::curr::{
    AccountId, HostFunction, OperationBody, PublicKey, ScAddress, ScMap, ScMapEntry, ScSymbol,
    ScVal, TransactionEnvelope, Uint256,
};

use crate::contract::PollState;
use crate::rpc::{
    AccountInfo, GetTransactionResponse, LatestLedger, RpcError, RpcResult, SendStatus,
    SendTransactionResponse, SimulateHostFunctionResult, SimulateTransactionResponse,
    SorobanRpc, TransactionStatus,
};
use crate::wallet::{Wallet, WalletResult};
use crate::xdr;

pub(crate) const VOTER: &str = "GAAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQDZ7H";

/// Empty footprint `SorobanTransactionData`
const EMPTY_TX_DATA: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

/// Build a `get_poll_state` return value in the struct-map encoding
pub(crate) fn poll_state_scval(question: &str, options: &[&str], votes: &[(u32, u32)]) -> ScVal {
    let options: Vec<String> = options.iter().map(|s| s.to_string()).collect();
    let votes = ScVal::Map(Some(ScMap(
        votes
            .iter()
            .map(|&(k, v)| ScMapEntry {
                key: ScVal::U32(k),
                val: ScVal::U32(v),
            })
            .collect::<Vec<_>>()
            .try_into()
            .unwrap(),
    )));

    ScVal::Map(Some(ScMap(
        vec![
            ScMapEntry {
                key: ScVal::Symbol(ScSymbol("options".try_into().unwrap())),
                val: xdr::string_vec_to_scval(&options).unwrap(),
            },
            ScMapEntry {
                key: ScVal::Symbol(ScSymbol("question".try_into().unwrap())),
                val: xdr::string_to_scval(question).unwrap(),
            },
            ScMapEntry {
                key: ScVal::Symbol(ScSymbol("votes".try_into().unwrap())),
                val: votes,
            },
        ]
        .try_into()
        .unwrap(),
    )))
}

fn encode_poll(poll: &PollState) -> ScVal {
    let options: Vec<&str> = poll.options.iter().map(String::as_str).collect();
    let votes: Vec<(u32, u32)> = poll
        .votes
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as u32, v))
        .collect();
    poll_state_scval(&poll.question, &options, &votes)
}

fn address_of(value: &ScVal) -> Option<String> {
    match value {
        ScVal::Address(ScAddress::Account(AccountId(PublicKey::PublicKeyTypeEd25519(
            Uint256(bytes),
        )))) => Some(stellar_strkey::ed25519::PublicKey(*bytes).to_string()),
        _ => None,
    }
}

fn invocation(envelope: &str) -> (String, Vec<ScVal>) {
    let decoded = xdr::decode_envelope(envelope).expect("fake rpc received a bad envelope");
    let TransactionEnvelope::Tx(v1) = decoded else {
        panic!("fake rpc expects v1 envelopes");
    };
    match &v1.tx.operations[0].body {
        OperationBody::InvokeHostFunction(op) => match &op.host_function {
            HostFunction::InvokeContract(args) => (
                String::from_utf8_lossy(args.function_name.0.as_slice()).into_owned(),
                args.args.to_vec(),
            ),
            other => panic!("unexpected host function {:?}", other),
        },
        other => panic!("unexpected operation {:?}", other),
    }
}

struct FakeState {
    poll: PollState,
    raw_poll: Option<ScVal>,
    choices: HashMap<String, u32>,
    read_error: Option<String>,
    write_error: Option<String>,
    send_status: SendStatus,
    send_error_result: Option<String>,
    last_simulated: Option<TransactionEnvelope>,
    statuses: VecDeque<TransactionStatus>,
    always_pending: bool,
    account_exists: bool,
    pending_write: Option<(String, Vec<ScVal>)>,
    last_write_function: Option<String>,
    calls: HashMap<&'static str, usize>,
}

/// In-memory stand-in for a Soroban RPC node
pub(crate) struct FakeRpc {
    state: Mutex<FakeState>,
}

impl FakeRpc {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                poll: PollState {
                    question: "Favorite color?".to_string(),
                    options: vec!["Red".to_string(), "Blue".to_string()],
                    votes: vec![0, 0],
                },
                raw_poll: None,
                choices: HashMap::new(),
                read_error: None,
                write_error: None,
                send_status: SendStatus::Pending,
                send_error_result: None,
                last_simulated: None,
                statuses: VecDeque::new(),
                always_pending: false,
                account_exists: true,
                pending_write: None,
                last_write_function: None,
                calls: HashMap::new(),
            }),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn set_poll(&self, poll: PollState) {
        self.with(|s| {
            s.poll = poll;
            s.raw_poll = None;
        });
    }

    pub fn set_poll_state(&self, raw: ScVal) {
        self.with(|s| s.raw_poll = Some(raw));
    }

    pub fn poll(&self) -> PollState {
        self.with(|s| s.poll.clone())
    }

    pub fn set_choice(&self, address: &str, choice: Option<u32>) {
        self.with(|s| match choice {
            Some(c) => {
                s.choices.insert(address.to_string(), c);
            }
            None => {
                s.choices.remove(address);
            }
        });
    }

    pub fn choice_of(&self, address: &str) -> Option<u32> {
        self.with(|s| s.choices.get(address).copied())
    }

    pub fn fail_reads(&self, error: &str) {
        self.with(|s| s.read_error = Some(error.to_string()));
    }

    pub fn fail_writes(&self, error: &str) {
        self.with(|s| s.write_error = Some(error.to_string()));
    }

    pub fn set_send_status(&self, status: SendStatus) {
        self.with(|s| s.send_status = status);
    }

    /// Base64 `TransactionResult` returned with an `ERROR` send status
    pub fn set_send_error_result(&self, result: &str) {
        self.with(|s| s.send_error_result = Some(result.to_string()));
    }

    pub fn last_simulated(&self) -> Option<TransactionEnvelope> {
        self.with(|s| s.last_simulated.clone())
    }

    pub fn push_transaction_status(&self, status: TransactionStatus) {
        self.with(|s| s.statuses.push_back(status));
    }

    pub fn always_pending(&self) {
        self.with(|s| s.always_pending = true);
    }

    pub fn remove_account(&self) {
        self.with(|s| s.account_exists = false);
    }

    pub fn calls(&self, name: &str) -> usize {
        self.with(|s| s.calls.get(name).copied().unwrap_or(0))
    }

    /// Total network operations of any kind
    pub fn total_calls(&self) -> usize {
        self.with(|s| s.calls.values().sum())
    }

    pub fn last_write_function(&self) -> Option<String> {
        self.with(|s| s.last_write_function.clone())
    }

    fn record(&self, name: &'static str) {
        self.with(|s| *s.calls.entry(name).or_insert(0) += 1);
    }
}

impl FakeState {
    /// Apply the contract's vote rules for `voter` choosing `index`
    fn apply_vote(&mut self, voter: String, index: u32) {
        let i = index as usize;
        match self.choices.get(&voter).copied() {
            Some(old) if old == index => {
                self.poll.votes[i] = self.poll.votes[i].saturating_sub(1);
                self.choices.remove(&voter);
            }
            Some(old) => {
                let o = old as usize;
                self.poll.votes[o] = self.poll.votes[o].saturating_sub(1);
                self.poll.votes[i] += 1;
                self.choices.insert(voter, index);
            }
            None => {
                self.poll.votes[i] += 1;
                self.choices.insert(voter, index);
            }
        }
    }
}

#[async_trait]
impl SorobanRpc for FakeRpc {
    async fn get_account(&self, address: &str) -> RpcResult<AccountInfo> {
        self.record("get_account");
        if !self.with(|s| s.account_exists) {
            return Err(RpcError::AccountNotFound(address.to_string()));
        }
        Ok(AccountInfo {
            address: address.to_string(),
            sequence: 41,
        })
    }

    async fn simulate_transaction(
        &self,
        envelope: &str,
    ) -> RpcResult<SimulateTransactionResponse> {
        self.record("simulate");
        let (function, args) = invocation(envelope);
        let decoded = xdr::decode_envelope(envelope).ok();
        self.with(|s| s.last_simulated = decoded);

        let respond = |value: ScVal| SimulateTransactionResponse {
            latest_ledger: 100,
            results: vec![SimulateHostFunctionResult {
                auth: Vec::new(),
                xdr: xdr::encode_scval(&value).unwrap(),
            }],
            ..Default::default()
        };
        let failed = |error: String| SimulateTransactionResponse {
            latest_ledger: 100,
            error: Some(error),
            ..Default::default()
        };

        self.with(|s| match function.as_str() {
            "get_poll_state" => Ok(match &s.read_error {
                Some(e) => failed(e.clone()),
                None => respond(s.raw_poll.clone().unwrap_or_else(|| encode_poll(&s.poll))),
            }),
            "get_voter_choice" => Ok(match &s.read_error {
                Some(e) => failed(e.clone()),
                None => {
                    let voter = address_of(&args[0]).unwrap_or_default();
                    respond(match s.choices.get(&voter) {
                        Some(&c) => ScVal::U32(c),
                        None => ScVal::Void,
                    })
                }
            }),
            _ => Ok(match &s.write_error {
                Some(e) => failed(e.clone()),
                None => {
                    s.pending_write = Some((function.clone(), args.clone()));
                    s.last_write_function = Some(function.clone());
                    SimulateTransactionResponse {
                        min_resource_fee: Some("1000".to_string()),
                        transaction_data: Some(EMPTY_TX_DATA.to_string()),
                        ..respond(ScVal::Void)
                    }
                }
            }),
        })
    }

    async fn send_transaction(&self, envelope: &str) -> RpcResult<SendTransactionResponse> {
        self.record("send");
        xdr::decode_envelope(envelope).expect("fake rpc received a bad envelope");

        self.with(|s| {
            if s.send_status == SendStatus::Pending {
                if let Some((function, args)) = s.pending_write.take() {
                    if function == "vote" {
                        let voter = address_of(&args[0]).unwrap_or_default();
                        let index = xdr::scval_to_u32(&args[1]).unwrap_or(0);
                        s.apply_vote(voter, index);
                    }
                }
            }

            Ok(SendTransactionResponse {
                status: s.send_status,
                hash: "f00dfeedcafe0123456789".to_string(),
                latest_ledger: 100,
                error_result_xdr: s.send_error_result.clone(),
            })
        })
    }

    async fn get_transaction(&self, _hash: &str) -> RpcResult<GetTransactionResponse> {
        self.record("get_transaction");
        let status = self.with(|s| {
            s.statuses.pop_front().unwrap_or(if s.always_pending {
                TransactionStatus::NotFound
            } else {
                TransactionStatus::Success
            })
        });

        Ok(GetTransactionResponse {
            status,
            latest_ledger: 101,
            ledger: (status == TransactionStatus::Success).then_some(101),
            result_xdr: None,
        })
    }

    async fn get_latest_ledger(&self) -> RpcResult<LatestLedger> {
        self.record("get_latest_ledger");
        Ok(LatestLedger {
            id: "abc".to_string(),
            protocol_version: 22,
            sequence: 101,
        })
    }
}

/// Wallet with a fixed address and a fixed answer to every prompt
pub(crate) struct ScriptedWallet {
    address: String,
    approve: bool,
    available: bool,
    connects: AtomicUsize,
    signs: AtomicUsize,
}

impl ScriptedWallet {
    pub fn approving() -> Self {
        Self {
            address: VOTER.to_string(),
            approve: true,
            available: false,
            connects: AtomicUsize::new(0),
            signs: AtomicUsize::new(0),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            approve: false,
            ..Self::approving()
        }
    }

    /// A wallet with an existing session
    pub fn resumable() -> Self {
        Self {
            available: true,
            ..Self::approving()
        }
    }

    pub fn sign_requests(&self) -> usize {
        self.signs.load(Ordering::SeqCst)
    }

    pub fn connect_requests(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Wallet for ScriptedWallet {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn connect(&self) -> WalletResult<String> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(if self.approve {
            self.address.clone()
        } else {
            String::new()
        })
    }

    async fn sign(
        &self,
        envelope: &str,
        _network_passphrase: &str,
    ) -> WalletResult<Option<String>> {
        self.signs.fetch_add(1, Ordering::SeqCst);
        Ok(self.approve.then(|| envelope.to_string()))
    }
}
