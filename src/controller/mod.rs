//! Root Controller
//!
//! Owns the [`UiState`] and drives it from one update loop. Network work
//! runs in spawned tasks that report back as [`Event`]s, so a slow vote never
//! blocks the periodic refresh or user input.
//!
//! ## Lifetime
//!
//! The loop runs until [`Action::Quit`] arrives or the action channel
//! closes. Every spawned task lives in a `JoinSet` that is aborted on the
//! way out, so no request outlives the session.

mod state;

pub use state::{TxStatus, UiState};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;

use crate::contract::{ContractResult, PollClient, PollState, SubmitOutcome};

/// User intents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Connect,
    Vote(u32),
    Refresh,
    Quit,
}

/// Results reported by background tasks
#[derive(Debug)]
pub enum Event {
    /// Periodic or manual refresh finished
    Refreshed {
        poll: Option<PollState>,
        /// Address the choice was fetched for, with the lookup result
        choice: Option<(String, ContractResult<Option<u32>>)>,
    },
    /// Wallet connected and its choice fetched
    Connected {
        address: String,
        choice: ContractResult<Option<u32>>,
    },
    /// A vote attempt ended; on success the follow-up reads are included
    VoteFinished {
        outcome: ContractResult<SubmitOutcome>,
        choice: ContractResult<Option<u32>>,
        poll: Option<PollState>,
    },
    /// Delayed SUCCESS -> IDLE
    ResetStatus,
}

/// Timing for the controller loop
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub refresh_interval: Duration,
    pub status_reset_delay: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(5),
            status_reset_delay: Duration::from_secs(5),
        }
    }
}

/// Drives UI state from user actions and contract reads
pub struct Controller {
    client: Arc<PollClient>,
    config: ControllerConfig,
    state: UiState,
    snapshots: watch::Sender<UiState>,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    tasks: JoinSet<()>,
}

impl Controller {
    /// Create a controller and a receiver that sees every state change
    pub fn new(client: Arc<PollClient>, config: ControllerConfig) -> (Self, watch::Receiver<UiState>) {
        let state = UiState::default();
        let (snapshots, rx) = watch::channel(state.clone());
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let controller = Self {
            client,
            config,
            state,
            snapshots,
            events_tx,
            events_rx,
            tasks: JoinSet::new(),
        };

        (controller, rx)
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Run until quit, then cancel everything still in flight
    pub async fn run(mut self, mut actions: mpsc::Receiver<Action>) {
        tracing::info!(
            refresh_ms = self.config.refresh_interval.as_millis() as u64,
            "Starting poll controller"
        );

        self.start();

        let mut ticker = tokio::time::interval(self.config.refresh_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        // Skip the first immediate tick; start() already refreshed
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => self.spawn_refresh(),
                action = actions.recv() => match action {
                    None | Some(Action::Quit) => break,
                    Some(action) => {
                        self.handle_action(action);
                    }
                },
                Some(event) = self.events_rx.recv() => self.handle_event(event),
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    if let Err(e) = joined {
                        if e.is_panic() {
                            tracing::error!(error = %e, "Controller task panicked");
                        }
                    }
                }
            }
        }

        self.shutdown().await;
        tracing::info!("Poll controller stopped");
    }

    /// Resume an existing wallet session and load the poll
    pub fn start(&mut self) {
        let client = Arc::clone(&self.client);
        let events = self.events_tx.clone();

        self.tasks.spawn(async move {
            if !client.wallet().is_available().await {
                return;
            }
            match client.wallet().connect().await {
                Ok(address) if !address.is_empty() => {
                    let choice = client.try_fetch_voter_choice(&address).await;
                    let _ = events.send(Event::Connected { address, choice });
                }
                Ok(_) => tracing::info!("Existing wallet session declined"),
                Err(e) => tracing::error!(error = %e, "Auto-connect failed"),
            }
        });

        self.spawn_refresh();
    }

    /// Apply a user action; returns false when it was ignored
    pub fn handle_action(&mut self, action: Action) -> bool {
        let accepted = match action {
            Action::Connect => {
                self.spawn_connect();
                true
            }
            Action::Vote(index) => self.start_vote(index),
            Action::Refresh => {
                self.spawn_refresh();
                true
            }
            Action::Quit => false,
        };
        self.publish();
        accepted
    }

    /// Apply a task result to the state
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Refreshed { poll, choice } => {
                self.state.poll_fetched(poll);
                if let Some((address, choice)) = choice {
                    if address == self.state.wallet_address {
                        self.apply_choice(choice);
                    }
                }
            }
            Event::Connected { address, choice } => {
                tracing::info!(address = %address, "Wallet connected");
                if address != self.state.wallet_address {
                    self.state.choice_fetched(None);
                }
                self.state.wallet_connected(address);
                self.apply_choice(choice);
            }
            Event::VoteFinished {
                outcome,
                choice,
                poll,
            } => {
                self.apply_choice(choice);
                self.finish_vote(outcome, poll);
            }
            Event::ResetStatus => self.state.reset_status(),
        }
        self.publish();
    }

    /// Wait for the next task result and apply it
    ///
    /// Returns false when no task can produce one.
    pub async fn process_next(&mut self) -> bool {
        loop {
            if let Ok(event) = self.events_rx.try_recv() {
                self.handle_event(event);
                return true;
            }
            if self.tasks.join_next().await.is_none() {
                return match self.events_rx.try_recv() {
                    Ok(event) => {
                        self.handle_event(event);
                        true
                    }
                    Err(_) => false,
                };
            }
        }
    }

    /// Run every outstanding task to completion and apply the results
    pub async fn settle(&mut self) {
        while self.process_next().await {}
    }

    /// Abort all in-flight work
    pub async fn shutdown(&mut self) {
        self.tasks.shutdown().await;
    }

    /// A failed lookup keeps the last known choice
    fn apply_choice(&mut self, choice: ContractResult<Option<u32>>) {
        match choice {
            Ok(choice) => self.state.choice_fetched(choice),
            Err(e) => tracing::warn!(error = %e, "Error getting voter choice"),
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.clone());
    }

    fn spawn_refresh(&mut self) {
        let client = Arc::clone(&self.client);
        let events = self.events_tx.clone();
        let address = self.state.wallet_address.clone();

        self.tasks.spawn(async move {
            let poll = client.fetch_poll_state().await;
            let choice = if address.is_empty() {
                None
            } else {
                let choice = client.try_fetch_voter_choice(&address).await;
                Some((address, choice))
            };
            let _ = events.send(Event::Refreshed { poll, choice });
        });
    }

    fn spawn_connect(&mut self) {
        let client = Arc::clone(&self.client);
        let events = self.events_tx.clone();

        self.tasks.spawn(async move {
            match client.wallet().connect().await {
                Ok(address) if !address.is_empty() => {
                    let choice = client.try_fetch_voter_choice(&address).await;
                    let _ = events.send(Event::Connected { address, choice });
                }
                Ok(_) => tracing::info!("Wallet access was not granted"),
                Err(e) => tracing::error!(error = %e, "Connection failed"),
            }
        });
    }

    fn start_vote(&mut self, index: u32) -> bool {
        if !self.state.begin_vote() {
            tracing::debug!(
                index,
                connected = self.state.is_connected(),
                status = ?self.state.tx_status,
                "Ignoring vote request"
            );
            return false;
        }

        let client = Arc::clone(&self.client);
        let events = self.events_tx.clone();
        let address = self.state.wallet_address.clone();

        tracing::info!(index, address = %address, "Attempting to vote");

        self.tasks.spawn(async move {
            let outcome = client.submit_vote(index, &address).await;

            // The contract is the source of truth for the user's choice
            let choice = client.try_fetch_voter_choice(&address).await;
            let poll = match &outcome {
                Ok(SubmitOutcome::Confirmed { .. }) => client.fetch_poll_state().await,
                _ => None,
            };

            let _ = events.send(Event::VoteFinished {
                outcome,
                choice,
                poll,
            });
        });

        true
    }

    fn finish_vote(&mut self, outcome: ContractResult<SubmitOutcome>, poll: Option<PollState>) {
        match outcome {
            Ok(SubmitOutcome::Confirmed { hash, ledger }) => {
                tracing::info!(hash = %hash, ?ledger, "Vote confirmed");
                self.state.vote_succeeded(Some(hash));
                if poll.is_some() {
                    self.state.poll_fetched(poll);
                }
                self.schedule_status_reset();
            }
            Ok(SubmitOutcome::Cancelled) => {
                tracing::info!("Vote cancelled in wallet");
                self.state.vote_cancelled();
            }
            Ok(other) => {
                let message = other
                    .error_message()
                    .unwrap_or_else(|| "Transaction failed to submit.".to_string());
                tracing::warn!(outcome = ?other, "Vote did not go through");
                self.state.last_tx_hash = other.hash().map(str::to_string);
                self.state.vote_failed(message);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Vote error");
                self.state.vote_failed(e.user_message());
            }
        }
    }

    fn schedule_status_reset(&mut self) {
        let events = self.events_tx.clone();
        let delay = self.config.status_reset_delay;

        self.tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(Event::ResetStatus);
        });
    }
}
