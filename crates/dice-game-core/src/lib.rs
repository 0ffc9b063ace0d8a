//! Dice Game Core Library
//!
//! This crate provides the provably fair random-value protocol, the pairwise
//! win-probability engine, and the turn-flow state machine for a two-party
//! game played with non-transitive dice.

pub mod console;
pub mod crypto;
pub mod dice;
pub mod engine;
pub mod error;
pub mod fairness;
pub mod parser;
pub mod probability;
pub mod render;

pub use console::{Console, ScriptedConsole, StdConsole};
pub use crypto::{
    EntropySource, HmacSha256, HmacSha3_256, MacAlgorithm, MacDigest, ScriptedEntropy, SecretKey,
    SystemEntropy,
};
pub use dice::{validate_dice_set, Die, MIN_DICE};
pub use engine::{GameEngine, Phase, RoundReport, RoundResult, Scoreboard, SessionState, Side};
pub use error::{GameError, Result};
pub use fairness::{verify, ExchangeId, FairExchange, Reveal};
pub use parser::DiceParser;
pub use probability::{pair_odds, win_probabilities, PairOdds, ProbabilityMatrix};
pub use render::{ProbabilityRenderer, TableRenderer};
