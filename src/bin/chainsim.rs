//! chainsim: drive a local chain simulator from the shell
//!
//! ## Example Usage
//!
//! ```bash
//! # Where is the chain?
//! chainsim status
//!
//! # Move time forward
//! chainsim generate-blocks 5
//! chainsim advance-epoch 7
//!
//! # Fund an account and send from a PEM wallet
//! chainsim set-balance erd1... 100000000000000000000
//! chainsim transfer --pem alice.pem --to erd1... --amount 1000000000000000000
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chainsim_harness::config::HarnessConfig;
use chainsim_harness::validator_key::load_validator_keys_dir;
use chainsim_harness::{Address, Harness, Wallet};
use chainsim_types::encoding::parse_decimal;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "chainsim",
    author,
    version,
    about = "Chain simulator test harness",
    long_about = "Produce blocks, advance epochs, inspect accounts and send transactions \
                  against a locally running chain simulator."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Proxy URL (default: CHAINSIM_PROXY_URL or http://localhost:8085)
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Chain id put into built transactions
    #[arg(long, global = true)]
    chain_id: Option<String>,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (debug logs)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show epoch and round of the metachain
    Status,

    /// Produce a number of blocks
    GenerateBlocks { count: u64 },

    /// Produce blocks until the given epoch is reached
    AdvanceEpoch { epoch: u32 },

    /// Finish the current epoch
    EndEpoch,

    /// Account nonce
    Nonce { address: String },

    /// Account balance in atomic units
    Balance { address: String },

    /// Overwrite an account balance (atomic units)
    SetBalance { address: String, amount: String },

    /// Processing status of a transaction
    TxStatus {
        hash: String,

        /// Produce up to this many blocks waiting for a terminal status
        #[arg(long)]
        max_blocks: Option<u64>,
    },

    /// Register every validator PEM found in a directory
    AddKeys { dir: PathBuf },

    /// Sign and send a value transfer, then wait for its outcome
    Transfer {
        /// Wallet PEM file of the sender
        #[arg(long)]
        pem: PathBuf,

        /// Receiver address (bech32)
        #[arg(long)]
        to: String,

        /// Amount in atomic units
        #[arg(long)]
        amount: String,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Status => "status",
            Commands::GenerateBlocks { .. } => "generate-blocks",
            Commands::AdvanceEpoch { .. } => "advance-epoch",
            Commands::EndEpoch => "end-epoch",
            Commands::Nonce { .. } => "nonce",
            Commands::Balance { .. } => "balance",
            Commands::SetBalance { .. } => "set-balance",
            Commands::TxStatus { .. } => "tx-status",
            Commands::AddKeys { .. } => "add-keys",
            Commands::Transfer { .. } => "transfer",
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_address(raw: &str) -> Result<Address> {
    Address::from_bech32(raw).with_context(|| format!("invalid address '{}'", raw))
}

fn emit(json_output: bool, value: serde_json::Value, human: String) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", human);
    }
    Ok(())
}

fn main() -> Result<()> {
    let Cli {
        command,
        proxy,
        chain_id,
        json,
        verbose,
    } = Cli::parse();
    init_tracing(verbose);

    let mut config = HarnessConfig::from_env();
    if let Some(url) = proxy {
        config = config.with_proxy_url(url);
    }
    if let Some(id) = chain_id {
        config = config.with_chain_id(id);
    }
    let harness = Harness::connect(config);
    let command_name = command.name();

    run(&harness, command, json).with_context(|| format!("chainsim {} failed", command_name))
}

fn run(harness: &Harness, command: Commands, json_output: bool) -> Result<()> {
    match command {
        Commands::Status => {
            let status = harness.blocks().network_status()?;
            emit(
                json_output,
                serde_json::to_value(&status)?,
                format!(
                    "epoch {} round {} ({} of {} rounds in epoch)",
                    status.erd_epoch_number,
                    status.erd_current_round,
                    status.erd_rounds_passed_in_current_epoch,
                    status.erd_rounds_per_epoch
                ),
            )
        }
        Commands::GenerateBlocks { count } => {
            harness.blocks().produce_blocks(count)?;
            emit(json_output, json!({ "produced": count }), format!("produced {} blocks", count))
        }
        Commands::AdvanceEpoch { epoch } => {
            let reached = harness.blocks().advance_to_epoch(epoch)?;
            emit(json_output, json!({ "epoch": reached }), format!("epoch {}", reached))
        }
        Commands::EndEpoch => {
            let reached = harness.blocks().advance_to_end_of_epoch()?;
            emit(json_output, json!({ "epoch": reached }), format!("epoch {}", reached))
        }
        Commands::Nonce { address } => {
            let address = parse_address(&address)?;
            let nonce = harness.node().nonce(&address)?;
            emit(
                json_output,
                json!({ "address": address.to_bech32(), "nonce": nonce }),
                nonce.to_string(),
            )
        }
        Commands::Balance { address } => {
            let address = parse_address(&address)?;
            let balance = harness.node().balance(&address)?;
            emit(
                json_output,
                json!({ "address": address.to_bech32(), "balance": balance.to_string() }),
                balance.to_string(),
            )
        }
        Commands::SetBalance { address, amount } => {
            let address = parse_address(&address)?;
            let amount = parse_decimal(&amount, "amount")?;
            chainsim_harness::wallet::set_balance(harness.node(), &address, &amount)?;
            harness.blocks().produce_blocks(1)?;
            emit(
                json_output,
                json!({ "address": address.to_bech32(), "balance": amount.to_string() }),
                format!("{} -> {}", address, amount),
            )
        }
        Commands::TxStatus { hash, max_blocks } => {
            let submitter = harness.submitter();
            let status = match max_blocks {
                Some(max_blocks) => submitter.await_terminal_within(&hash, max_blocks)?,
                None => submitter.status(&hash)?,
            };
            emit(
                json_output,
                json!({ "hash": hash, "status": status.as_str() }),
                status.to_string(),
            )
        }
        Commands::AddKeys { dir } => {
            let keys = load_validator_keys_dir(&dir)?;
            harness.add_keys(&keys)?;
            let bls: Vec<&str> = keys.iter().map(|k| k.bls_public_key.as_str()).collect();
            emit(
                json_output,
                json!({ "added": bls }),
                format!("added {} validator keys", keys.len()),
            )
        }
        Commands::Transfer { pem, to, amount } => {
            let mut wallet = Wallet::from_pem_file(&pem)?;
            let receiver = parse_address(&to)?;
            let amount = parse_decimal(&amount, "amount")?;
            let nonce = wallet.next_nonce(harness.node())?;
            let tx = harness
                .builder()
                .transfer(&wallet.address(), &receiver, nonce, amount);
            let outcome = harness.execute(&wallet, tx)?;
            emit(
                json_output,
                json!({
                    "hash": outcome.hash,
                    "status": outcome.status.as_str(),
                    "error": outcome.error,
                }),
                match &outcome.error {
                    Some(err) => format!("{} ({})", outcome.status, err),
                    None => format!(
                        "{} {}",
                        outcome.status,
                        outcome.hash.as_deref().unwrap_or_default()
                    ),
                },
            )
        }
    }
}
