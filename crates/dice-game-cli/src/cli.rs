//! Command-line arguments.

use clap::{Parser, Subcommand, ValueEnum};
use dice_game_core::{parser::DEFAULT_FACE_COUNT, HmacSha256, HmacSha3_256, MacAlgorithm};

#[derive(Debug, Parser)]
#[command(name = "dice-game")]
#[command(about = "Non-transitive dice with provably fair rolls", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Number of faces every die must have
    #[arg(short, long, global = true, default_value_t = DEFAULT_FACE_COUNT)]
    pub faces: usize,

    /// Keyed digest used for commitments
    #[arg(long, global = true, value_enum, default_value_t = MacChoice::HmacSha3_256)]
    pub mac: MacChoice,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Play against the computer
    Play {
        /// Dice as comma-separated faces, e.g. "2,2,4,4,9,9"
        #[arg(required = true, num_args = 1..)]
        dice: Vec<String>,
    },

    /// Print the win-probability table and exit
    Odds {
        /// Dice as comma-separated faces, e.g. "2,2,4,4,9,9"
        #[arg(required = true, num_args = 1..)]
        dice: Vec<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check a revealed key and secret against a published digest
    Verify {
        /// Published digest (hex)
        #[arg(long)]
        digest: String,

        /// Revealed key (hex)
        #[arg(long)]
        key: String,

        /// Revealed secret number
        #[arg(long)]
        secret: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MacChoice {
    #[value(name = "hmac-sha3-256")]
    HmacSha3_256,
    #[value(name = "hmac-sha256")]
    HmacSha256,
}

impl MacChoice {
    pub fn algorithm(&self) -> Box<dyn MacAlgorithm> {
        match self {
            MacChoice::HmacSha3_256 => Box::new(HmacSha3_256),
            MacChoice::HmacSha256 => Box::new(HmacSha256),
        }
    }
}
