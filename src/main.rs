//! lobotomy bot runner (default binary).
//!
//! Connects to a lobotomy server and plays a single game. Settings come from
//! `LOBOTOMY_*` environment variables (see `lobotomy_client::config`) and can be
//! overridden on the command line; the positional argument is the player name.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lobotomy_bot::client::{run_client, ClientConfig};
use lobotomy_bot::core::StrategyKind;

#[derive(Debug, Parser)]
#[command(name = "lobotomy-bot", version, about = "Reference bot for the lobotomy game server")]
struct Args {
    /// Player name (default: generated `Henk_<n>`)
    name: Option<String>,

    /// Server host
    #[arg(long)]
    host: Option<String>,

    /// Server port
    #[arg(long)]
    port: Option<u16>,

    /// Seed for the generated name and the strategy
    #[arg(long)]
    seed: Option<u32>,

    /// Leave the game after this many played turns
    #[arg(long)]
    max_turns: Option<u64>,

    /// Strategy to play: `random` or `idle`
    #[arg(long, value_parser = parse_strategy)]
    strategy: Option<StrategyKind>,

    /// Append a JSONL transcript of the connection to this file
    #[arg(long)]
    wire_log: Option<String>,
}

fn parse_strategy(s: &str) -> Result<StrategyKind, String> {
    StrategyKind::from_str(s).ok_or_else(|| format!("unknown strategy `{}`", s))
}

impl Args {
    /// Command line wins over the environment.
    fn apply(self, mut config: ClientConfig) -> ClientConfig {
        if let Some(name) = self.name {
            config.name = Some(name);
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(max_turns) = self.max_turns {
            config.max_turns = Some(max_turns).filter(|n| *n > 0);
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(path) = self.wire_log {
            config.wire_log = Some(path);
        }
        config
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Args::parse().apply(ClientConfig::from_env());

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &ClientConfig) -> Result<()> {
    // One sequential session; no worker threads needed.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let summary = rt
        .block_on(run_client(config))
        .with_context(|| format!("session with {}:{} failed", config.host, config.port))?;

    info!(
        turns_played = summary.turns_played,
        last_turn = summary.last_turn,
        deaths = summary.deaths,
        closed_by_server = summary.closed_by_server,
        "game over"
    );
    Ok(())
}
