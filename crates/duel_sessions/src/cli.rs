//! Command-line interface for the duel binary.

use clap::{Parser, Subcommand};
use duel_games::GameKind;
use std::path::PathBuf;

/// Duel - two-player game sessions
#[derive(Parser, Debug)]
#[command(name = "duel")]
#[command(about = "Two-player game sessions with an AI opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the effective configuration as TOML
    Config {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Play a lineage of rounds between a random player and the AI
    SelfPlay {
        /// Game to play (tictactoe, connect-four, or rock-paper-scissors)
        #[arg(short, long, default_value = "tictactoe")]
        game: GameKind,

        /// Number of rounds in the lineage
        #[arg(short, long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..))]
        rounds: u32,

        /// Seed for the player's and the AI's randomness
        #[arg(long)]
        seed: Option<u64>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
