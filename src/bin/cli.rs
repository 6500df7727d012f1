//! Stellar Poll CLI
//!
//! One-shot commands against the poll contract:
//! - Show the poll and its results
//! - Look up an account's choice
//! - Vote or initialize the poll
//! - Generate a config file

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use stellar_poll::view::short_address;
use stellar_poll::{
    ApprovalKind, Approver, AutoApprove, Config, KeypairWallet, PollClient, PollState,
    RpcClient, SubmitOutcome, Wallet,
};

#[derive(Parser)]
#[command(name = "stellar-poll-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Command-line access to the Soroban poll contract")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Sign without asking
    #[arg(short, long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the poll question and current results
    State,

    /// Show which option an account has selected
    Choice {
        /// Account address (G...)
        address: String,
    },

    /// Cast, change, or undo a vote with the configured key
    Vote {
        /// Option index as stored by the contract (0-based)
        index: u32,
    },

    /// Set the question and options of an uninitialized poll
    Init {
        #[arg(short, long)]
        question: String,
        /// Repeat for each option (at least two)
        #[arg(short, long = "option", required = true)]
        options: Vec<String>,
    },

    /// Check that the RPC endpoint answers
    Health,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Asks on the terminal before every wallet request
struct PromptApprover;

#[async_trait]
impl Approver for PromptApprover {
    async fn approve(&self, kind: ApprovalKind) -> bool {
        let prompt = kind.prompt();
        let answer = tokio::task::spawn_blocking(move || {
            eprint!("{} ", prompt);
            let _ = std::io::stderr().flush();
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).map(|_| line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Config generation does not read the current config
    if let Commands::Config { output } = &cli.command {
        let content = stellar_poll::generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let (config, source) = match &cli.config {
        Some(path) => (Config::load_with_env(path)?, Some(path.clone())),
        None => Config::load_default()?,
    };
    stellar_poll::logging::init(&config.logging);
    if let Some(path) = &source {
        tracing::debug!("Loaded config from {:?}", path);
    }

    let approver: Arc<dyn Approver> = if cli.yes || config.wallet.auto_approve {
        Arc::new(AutoApprove)
    } else {
        Arc::new(PromptApprover)
    };

    // Running a command with a configured key counts as granting access
    let wallet = match config.wallet.secret_key.as_deref() {
        Some(secret) => Arc::new(KeypairWallet::from_secret(secret, approver, true)?),
        None => Arc::new(KeypairWallet::empty(approver)),
    };

    let rpc = Arc::new(RpcClient::new(config.rpc_config())?);
    let client = PollClient::new(rpc, wallet.clone(), config.client_config());

    match cli.command {
        Commands::State => {
            let state = match client.try_fetch_poll_state().await {
                Ok(state) => state,
                Err(e) => {
                    eprintln!("Failed to read poll: {}", e.user_message());
                    std::process::exit(1);
                }
            };

            match cli.format.as_str() {
                "json" => {
                    let body = serde_json::json!({
                        "question": state.question,
                        "options": state.options,
                        "votes": state.votes,
                        "total_votes": state.total_votes(),
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                _ => print_state(&state),
            }
        }

        Commands::Choice { address } => {
            let choice = match client.try_fetch_voter_choice(&address).await {
                Ok(choice) => choice,
                Err(e) => {
                    eprintln!("Failed to read choice: {}", e.user_message());
                    std::process::exit(1);
                }
            };
            match cli.format.as_str() {
                "json" => {
                    let body = serde_json::json!({ "address": address, "choice": choice });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                _ => match choice {
                    Some(index) => {
                        let label = client
                            .fetch_poll_state()
                            .await
                            .and_then(|s| s.options.get(index as usize).cloned())
                            .unwrap_or_else(|| "-".to_string());
                        println!(
                            "{} voted for option {} ({})",
                            short_address(&address),
                            index,
                            label
                        );
                    }
                    None => println!("{} has not voted", short_address(&address)),
                },
            }
        }

        Commands::Vote { index } => {
            let address = connect(wallet.as_ref()).await;
            let outcome = client.submit_vote(index, &address).await;
            report(outcome, &cli.format)?;
        }

        Commands::Init { question, options } => {
            let address = connect(wallet.as_ref()).await;
            let outcome = client.initialize_poll(&question, &options, &address).await;
            report(outcome, &cli.format)?;
        }

        Commands::Health => match client.health_check().await {
            Ok(ledger) => {
                println!("RPC: {}", config.network.rpc_url);
                println!("Latest ledger: {}", ledger);
            }
            Err(e) => {
                eprintln!("Cannot reach RPC at {}", config.network.rpc_url);
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Config { .. } => {}
    }

    Ok(())
}

async fn connect(wallet: &dyn Wallet) -> String {
    match wallet.connect().await {
        Ok(address) if !address.is_empty() => address,
        Ok(_) => {
            eprintln!("Wallet access was not granted");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Wallet error: {}", e);
            eprintln!();
            eprintln!("Set a secret key in the config file or STELLAR_POLL_SECRET_KEY");
            std::process::exit(1);
        }
    }
}

fn report(
    outcome: stellar_poll::ContractResult<SubmitOutcome>,
    format: &str,
) -> anyhow::Result<()> {
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    };

    if format == "json" {
        let body = serde_json::json!({
            "confirmed": outcome.is_confirmed(),
            "cancelled": outcome == SubmitOutcome::Cancelled,
            "hash": outcome.hash(),
            "error": outcome.error_message(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        match &outcome {
            SubmitOutcome::Confirmed { hash, ledger } => {
                println!("Confirmed: {}", hash);
                if let Some(ledger) = ledger {
                    println!("Ledger: {}", ledger);
                }
            }
            SubmitOutcome::Cancelled => println!("Cancelled"),
            other => {
                if let Some(message) = other.error_message() {
                    eprintln!("{}", message);
                }
            }
        }
    }

    if !outcome.is_confirmed() && outcome != SubmitOutcome::Cancelled {
        std::process::exit(1);
    }
    Ok(())
}

fn print_state(state: &PollState) {
    println!("{}", state.question);
    println!();
    println!("{:<4} {:<30} {:>8} {:>8}", "#", "Option", "Votes", "Share");
    println!("{}", "-".repeat(53));

    for (i, option) in state.options.iter().enumerate() {
        println!(
            "{:<4} {:<30} {:>8} {:>7.1}%",
            i,
            option,
            state.votes_for(i),
            state.percentage(i)
        );
    }

    println!();
    println!("Total votes: {}", state.total_votes());
}
