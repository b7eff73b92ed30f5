//! # mtg-rules-engine
//!
//! A server-authoritative Magic: The Gathering rules engine.
//!
//! ## Design Principles
//!
//! 1. **Cards Are Data**: Card behavior is a list of effect descriptors in
//!    named slots. The engine calls an `EffectResolver` at each hook point
//!    and never interprets a card by name.
//!
//! 2. **Never Corrupt State**: Every inbound operation runs on an O(1)
//!    clone of the match (`im-rs`) and is committed only on success. A
//!    rejected action leaves the game exactly as it was.
//!
//! 3. **Suspend, Don't Block**: A decision a player must make is recorded
//!    as an `Interaction` and the operation returns. The answer arrives as
//!    a separate operation and the engine resumes where it stopped.
//!
//! ## Modules
//!
//! - `core`: ids, players, `GameData`, actions, errors, RNG, configuration
//! - `mana`: colors, costs and mana pools
//! - `cards`: card templates, the registry, card objects and permanents
//! - `zones`: zone transfers between library, hand, battlefield,
//!   graveyard and exile
//! - `effects`: effect descriptors, targeting, resolution, static queries
//! - `interaction`: pending decisions and parked continuations
//! - `stack`: spells and abilities waiting to resolve, and priority
//! - `combat`: attackers, blockers and combat damage
//! - `triggers`: triggered abilities at each hook point
//! - `rules`: steps, turns, casting, state-based actions and the `Game`
//!   facade

pub mod cards;
pub mod combat;
pub mod core;
pub mod effects;
pub mod interaction;
pub mod mana;
pub mod rules;
pub mod stack;
pub mod triggers;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, EntityId, GameConfig, GameData, GameError, GameRng, GameStatus,
    PlayerId, PlayerMap, PlayerState, Result,
};

pub use crate::mana::{Color, ManaCost, ManaPool};

pub use crate::cards::{ActivatedAbility, Card, CardId, CardInstance, CardRegistry, Permanent};

pub use crate::zones::{Zone, ZonePosition};

pub use crate::effects::{
    Effect, EffectResolver, EffectSlot, ResolverContext, StandardResolver, Target, TargetSpec,
};

pub use crate::interaction::{AwaitingInput, Interaction, InteractionKind};

pub use crate::stack::{StackEntry, StackEntryId, StackEntryType};

pub use crate::rules::{Game, GameBuilder, Step};
