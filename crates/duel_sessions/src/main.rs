//! Duel - command-line driver for grid game sessions.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use duel_games::{GameKind, Hand};
use duel_sessions::{
    Action, ArenaConfig, Mode, Outcome, OutcomeRecorder, Participant, Phase, PlayerId,
    SessionRegistry, TableView,
};
use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Config { config } => print_config(config),
        Command::SelfPlay {
            game,
            rounds,
            seed,
            config,
        } => run_self_play(game, rounds, seed, config).await,
    }
}

fn load_config(path: Option<PathBuf>) -> Result<ArenaConfig> {
    match path {
        Some(path) => ArenaConfig::from_file(&path)
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(ArenaConfig::default()),
    }
}

/// Print the effective configuration
fn print_config(path: Option<PathBuf>) -> Result<()> {
    let config = load_config(path)?;
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Results per participant, shared with the supervisor task.
#[derive(Debug, Clone, Default)]
struct Tally(Arc<Mutex<BTreeMap<String, Record>>>);

#[derive(Debug, Clone, Copy, Default, Serialize)]
struct Record {
    wins: u32,
    losses: u32,
    draws: u32,
}

impl OutcomeRecorder for Tally {
    fn record_outcome(
        &mut self,
        participant: &Participant,
        _kind: GameKind,
        outcome: Outcome,
        _vs_ai: bool,
    ) {
        let Ok(mut records) = self.0.lock() else {
            warn!("Tally lock poisoned, outcome dropped");
            return;
        };
        let record = records.entry(participant.to_string()).or_default();
        match outcome {
            Outcome::Win => record.wins += 1,
            Outcome::Loss => record.losses += 1,
            Outcome::Draw => record.draws += 1,
        }
    }
}

/// Play `rounds` rounds of `game` between a random player and the AI
#[instrument(skip(config_path))]
async fn run_self_play(
    game: GameKind,
    rounds: u32,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(seed) = seed {
        config = config.with_rng_seed(seed);
    }
    let mut player_rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_os_rng(),
    };

    let tally = Tally::default();
    let registry = SessionRegistry::new(&config).with_recorder(tally.clone());
    let (handle, task) = duel_sessions::spawn(registry);

    let player = PlayerId::new("random-player");
    let mut id = handle.create(game, player.clone(), Mode::VsAi).await?;
    info!(%id, %game, rounds, "Self-play started");

    let ledger = loop {
        let snapshot = handle.snapshot(id).await?;
        match snapshot.phase {
            Phase::Active => {
                let action = match snapshot.table {
                    TableView::Grid { board } => {
                        let moves = board.legal_moves();
                        let pick = *moves
                            .choose(&mut player_rng)
                            .context("active round with no legal move")?;
                        Action::Move(pick)
                    }
                    TableView::Throws { .. } => Action::Throw(Hand::random(&mut player_rng)),
                };
                let report = handle.submit(id, player.clone(), action).await?;
                if let Some(outcome) = report.resolution {
                    info!(round = report.snapshot.round, %outcome, "Round finished");
                }
                id = report.id;
            }
            Phase::RematchPending if snapshot.round < rounds => {
                id = handle.submit(id, player.clone(), Action::RematchVote).await?.id;
            }
            Phase::RematchPending => {
                handle.submit(id, player.clone(), Action::Cancel).await?;
                break snapshot.ledger;
            }
            phase => anyhow::bail!("session {} stopped in unexpected phase {}", id, phase),
        }
    };

    handle.shutdown().await?;
    task.await?;

    let records = tally
        .0
        .lock()
        .map_err(|_| anyhow::anyhow!("tally lock poisoned"))?
        .clone();
    println!("{}", serde_json::to_string_pretty(&ledger)?);
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
