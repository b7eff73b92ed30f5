//! Core engine types: entities, players, state, actions, RNG, configuration.
//!
//! Everything else in the crate is built on these: the `GameData`
//! aggregate owns all match state, and the id newtypes name the objects
//! inside it.

pub mod action;
pub mod config;
pub mod entity;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, ActionRecord};
pub use config::GameConfig;
pub use entity::{EntityAllocator, EntityId};
pub use error::{GameError, Result};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{GameData, GameStatus, PlayerState};
