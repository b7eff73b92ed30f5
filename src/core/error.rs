//! Engine error type.
//!
//! Every rejected operation surfaces as a [`GameError`]. All variants are
//! illegal actions: they are raised synchronously, carry a human-readable
//! reason for the acting player, and never leave partial mutations behind
//! (see `Game`'s transactional operations).
//!
//! A spell fizzling is *not* an error; it is a successful resolution with
//! no effect.

use thiserror::Error;

use super::PlayerId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Illegal action: {0}")]
    IllegalAction(String),

    #[error("{0} does not have priority")]
    NotYourPriority(PlayerId),

    #[error("Not awaiting {got} (awaiting {expected})")]
    WrongInteraction { expected: String, got: String },

    #[error("Invalid choice: {0}")]
    InvalidChoice(String),

    #[error("Not enough mana")]
    InsufficientMana,

    #[error("Game is not running")]
    GameNotRunning,

    #[error("Unknown card: {0}")]
    UnknownCard(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GameError {
    /// Shorthand for [`GameError::IllegalAction`].
    pub fn illegal(reason: impl Into<String>) -> Self {
        Self::IllegalAction(reason.into())
    }

    /// Shorthand for [`GameError::InvalidChoice`].
    pub fn invalid_choice(reason: impl Into<String>) -> Self {
        Self::InvalidChoice(reason.into())
    }

    /// Every variant is a rejected player action; none is fatal.
    #[must_use]
    pub fn is_illegal_action(&self) -> bool {
        true
    }

    /// The reason string shown to the acting player.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::IllegalAction(reason) | Self::InvalidChoice(reason) => reason.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
