//! Effect system: descriptors, targeting, and resolution.
//!
//! - `Effect`: a data descriptor attached to an `EffectSlot` of a card
//! - `TargetSpec`: what a spell or ability may target
//! - `EffectResolver`: executes descriptors on game state
//!
//! ## Design Philosophy
//!
//! Cards are data. The engine knows hook points (cast, enter the
//! battlefield, upkeep, combat damage, death) and hands the descriptors of
//! the matching slot to a resolver. Adding a card never touches engine
//! code; adding a new kind of effect adds one descriptor variant and one
//! match arm in [`StandardResolver`].
//!
//! Continuous effects are not executed. Components query them through the
//! static-effect helpers on `GameData` (power and toughness, evasion,
//! untap restrictions, damage redirection).

mod damage;
mod dispatch;
mod effect;
mod resolver;
mod statics;
mod targeting;

pub use damage::DamageSource;
pub use dispatch::{run_effects, RunResult};
pub use effect::{Amount, Effect, EffectSlot, Recipient};
pub(crate) use resolver::put_on_bottom;
pub use resolver::{EffectResolver, Outcome, ResolverContext, StandardResolver};
pub use targeting::{
    can_be_targeted_by, is_legal_target, legal_targets, permanent_matches, validate_targets,
    Target, TargetCount, TargetFilter, TargetSource, TargetSpec, TargetType,
};
