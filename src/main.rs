//! Stellar Poll
//!
//! Interactive terminal front end. Renders the poll card on stdout, reads
//! commands from stdin, and answers wallet prompts.
//!
//! Commands: `connect`, `vote N` (or just `N`), `refresh`, `quit`.
//! While a wallet prompt is showing, `y` approves and anything else declines.

use std::collections::VecDeque;
use std::sync::Arc;

use stellar_poll::view::{self, SCREEN_WIDTH};
use stellar_poll::{
    Action, ApprovalRequest, Approver, AutoApprove, ChannelApprover, Config, Controller,
    KeypairWallet, PollClient, RpcClient, UiState,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const HELP: &str = "Commands: connect | vote N | refresh | quit";

/// One line of user input
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Action(Action),
    Answer(bool),
    Invalid(String),
    Empty,
}

/// Interpret a line; options are numbered from 1 on screen
fn parse_input(line: &str, awaiting_answer: bool) -> Input {
    let line = line.trim();
    if awaiting_answer {
        let yes = matches!(line.to_ascii_lowercase().as_str(), "y" | "yes");
        return Input::Answer(yes);
    }

    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Input::Empty;
    };

    let number = match command.to_ascii_lowercase().as_str() {
        "connect" | "c" => return Input::Action(Action::Connect),
        "refresh" | "r" => return Input::Action(Action::Refresh),
        "quit" | "q" | "exit" => return Input::Action(Action::Quit),
        "vote" | "v" => words.next(),
        _ => Some(command),
    };

    match number.map(str::parse::<u32>) {
        Some(Ok(n)) if n >= 1 => Input::Action(Action::Vote(n - 1)),
        Some(_) => Input::Invalid(format!("Not an option number: {}", line)),
        None => Input::Invalid("Usage: vote N".to_string()),
    }
}

fn draw(state: &UiState, prompt: Option<&ApprovalRequest>, notice: Option<&str>) {
    // Clear the screen and home the cursor
    print!("\x1B[2J\x1B[H");
    println!("{}", view::render_screen(state, SCREEN_WIDTH));
    if let Some(notice) = notice {
        println!("{}", notice);
    }
    match prompt {
        Some(request) => println!("{}", request.kind.prompt()),
        None => println!("{}", HELP),
    }
}

async fn next_approval(
    approvals: &mut Option<mpsc::Receiver<ApprovalRequest>>,
) -> Option<ApprovalRequest> {
    match approvals {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, source) = Config::load_default()?;
    stellar_poll::logging::init(&config.logging);

    tracing::info!("Stellar Poll v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }
    tracing::info!(
        rpc = %config.network.rpc_url,
        contract = %config.network.contract_id,
        "Using network"
    );

    let (approver, mut approvals): (Arc<dyn Approver>, _) = if config.wallet.auto_approve {
        (Arc::new(AutoApprove), None)
    } else {
        let (approver, rx) = ChannelApprover::channel(4);
        (Arc::new(approver), Some(rx))
    };

    let wallet = match config.wallet.secret_key.as_deref() {
        Some(secret) => KeypairWallet::from_secret(secret, approver, config.wallet.auto_approve)?,
        None => {
            tracing::warn!("No secret key configured; connecting will fail");
            KeypairWallet::empty(approver)
        }
    };

    let rpc = Arc::new(RpcClient::new(config.rpc_config())?);
    let client = Arc::new(PollClient::new(rpc, Arc::new(wallet), config.client_config()));

    let (controller, mut snapshots) = Controller::new(client, config.controller_config());
    let (actions, actions_rx) = mpsc::channel(16);
    let mut controller_task = tokio::spawn(controller.run(actions_rx));
    let mut controller_done = false;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut prompts: VecDeque<ApprovalRequest> = VecDeque::new();
    let mut notice: Option<String> = None;

    draw(&snapshots.borrow_and_update(), None, None);

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            Some(request) = next_approval(&mut approvals) => {
                prompts.push_back(request);
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                notice = None;
                match parse_input(&line, !prompts.is_empty()) {
                    Input::Answer(yes) => {
                        if let Some(request) = prompts.pop_front() {
                            let _ = request.respond.send(yes);
                        }
                    }
                    Input::Action(Action::Quit) => break,
                    Input::Action(action) => {
                        if actions.send(action).await.is_err() {
                            break;
                        }
                    }
                    Input::Invalid(message) => notice = Some(message),
                    Input::Empty => {}
                }
            }
            _ = &mut controller_task => {
                controller_done = true;
                break;
            }
        }

        let state = snapshots.borrow_and_update().clone();
        draw(&state, prompts.front(), notice.as_deref());
    }

    // Declining outstanding prompts unblocks any waiting wallet call
    for request in prompts.drain(..) {
        let _ = request.respond.send(false);
    }

    tracing::info!("Shutting down...");
    let _ = actions.send(Action::Quit).await;
    if !controller_done {
        controller_task.await?;
    }

    Ok(())
}
