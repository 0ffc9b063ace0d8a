//! Error taxonomy shared by every module of the game.

use thiserror::Error;

/// Errors from dice, protocol, and session operations
#[derive(Debug, Error)]
pub enum GameError {
    /// Bad user or configuration input. Reprompt mid-session, abort before it.
    #[error("{0}")]
    InputValidation(String),

    /// Counterpart value outside `[0, range)`
    #[error("Value {value} is out of range: expected a number in [0, {range})")]
    Range { value: u32, range: u32 },

    /// Protocol steps invoked out of order
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Revealed key and secret do not reproduce the published digest
    #[error("Trust violation: published digest {published} does not match recomputed {recomputed}")]
    TrustViolation {
        published: String,
        recomputed: String,
    },

    #[error("Invalid MAC key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GameError {
    /// Shorthand for an input validation error
    pub fn invalid(message: impl Into<String>) -> Self {
        GameError::InputValidation(message.into())
    }

    /// Can the user simply be asked again?
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GameError::InputValidation(_) | GameError::Range { .. })
    }

    /// Must the session stop immediately?
    pub fn is_fatal(&self) -> bool {
        matches!(self, GameError::TrustViolation { .. } | GameError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
