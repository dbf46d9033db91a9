use crate::ai::AiLevel;
use crate::chess::Color;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "knightfall")]
#[command(about = "Play chess against a graded computer opponent in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play an interactive game against the AI
    ///
    /// Moves are entered in coordinate form (e2e4, e7e8q) or as O-O / O-O-O.
    /// Type `help` during the game for the list of commands.
    ///
    /// Examples:
    ///   knightfall play
    ///   knightfall play --level 1600 --color white
    ///   knightfall play --level master --ascii --no-delay
    Play {
        /// AI level by rating or name (400, 800, ..., 2500). Defaults to the config file
        #[arg(short, long)]
        level: Option<AiLevel>,
        /// The side YOU play: 'white' or 'black'. Defaults to the config file
        #[arg(short, long)]
        color: Option<Color>,
        /// Use letters instead of Unicode chess glyphs
        #[arg(long)]
        ascii: bool,
        /// Skip the simulated thinking delay
        #[arg(long)]
        no_delay: bool,
        /// Start from a FEN position instead of the initial one
        #[arg(long)]
        fen: Option<String>,
    },

    /// Let two AI levels play each other and print the game
    ///
    /// Examples:
    ///   knightfall selfplay --white 400 --black 2500
    ///   knightfall selfplay --white 1200 --black 1200 --seed 7 --json
    Selfplay {
        #[arg(short, long, default_value = "1200")]
        white: AiLevel,
        #[arg(short, long, default_value = "1200")]
        black: AiLevel,
        /// Stop after this many plies even if the game is not over
        #[arg(long, default_value_t = 300)]
        max_plies: u32,
        /// Seed for reproducible games
        #[arg(long)]
        seed: Option<u64>,
        /// Print the moves as JSON instead of PGN
        #[arg(long)]
        json: bool,
    },

    /// List the AI levels
    Levels,

    /// Configuration file management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the config file path
    Path,
    /// Print the current configuration
    Show,
    /// Overwrite the config file with defaults
    Reset,
}
