//! Turn-flow state machine for a game session.

mod flow;
mod prompt;
mod state;

pub use flow::GameEngine;
pub use prompt::{parse_choice, Choice};
pub use state::{Phase, RoundReport, RoundResult, Scoreboard, SessionState, Side};
