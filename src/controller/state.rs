//! UI state and its transitions
//!
//! Every mutation of [`UiState`] is one of the named methods below; the
//! controller loop is the only caller.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::contract::PollState;

/// Progress of the current vote attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

/// Everything the views render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiState {
    /// Connected account; empty when not connected
    pub wallet_address: String,
    /// Latest poll snapshot; `None` until the first successful fetch
    pub poll: Option<PollState>,
    /// True until the first fetch attempt completes
    pub loading: bool,
    pub tx_status: TxStatus,
    /// Shown in the error banner; empty when there is nothing to show
    pub error_message: String,
    /// Option the connected account has selected, per the contract
    pub user_choice: Option<u32>,
    /// A vote task is running
    pub voting: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_tx_hash: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            wallet_address: String::new(),
            poll: None,
            loading: true,
            tx_status: TxStatus::Idle,
            error_message: String::new(),
            user_choice: None,
            voting: false,
            last_updated: None,
            last_tx_hash: None,
        }
    }
}

impl UiState {
    pub fn is_connected(&self) -> bool {
        !self.wallet_address.is_empty()
    }

    /// Whether a vote request would be accepted right now
    pub fn can_vote(&self) -> bool {
        self.is_connected() && !self.voting && self.tx_status != TxStatus::Pending
    }

    /// A poll fetch finished; failures keep the previous snapshot
    pub fn poll_fetched(&mut self, poll: Option<PollState>) {
        if let Some(poll) = poll {
            self.poll = Some(poll);
            self.last_updated = Some(Utc::now());
        }
        self.loading = false;
    }

    pub fn wallet_connected(&mut self, address: String) {
        self.wallet_address = address;
    }

    pub fn choice_fetched(&mut self, choice: Option<u32>) {
        self.user_choice = choice;
    }

    /// Enter PENDING if a vote may start; returns false when it is refused
    pub fn begin_vote(&mut self) -> bool {
        if !self.can_vote() {
            return false;
        }
        self.voting = true;
        self.tx_status = TxStatus::Pending;
        self.error_message.clear();
        true
    }

    pub fn vote_succeeded(&mut self, hash: Option<String>) {
        self.voting = false;
        self.tx_status = TxStatus::Success;
        self.last_tx_hash = hash;
    }

    pub fn vote_failed(&mut self, message: String) {
        self.voting = false;
        self.tx_status = TxStatus::Error;
        self.error_message = message;
    }

    /// The signer declined; nothing to report
    pub fn vote_cancelled(&mut self) {
        self.voting = false;
        self.tx_status = TxStatus::Idle;
    }

    /// Delayed SUCCESS -> IDLE; leaves any newer attempt alone
    pub fn reset_status(&mut self) {
        if self.tx_status == TxStatus::Success {
            self.tx_status = TxStatus::Idle;
        }
    }
}
