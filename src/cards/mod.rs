//! Card system: definitions, instances, and registry.
//!
//! ## Key Types
//!
//! - `CardId`: identifier for a card definition
//! - `Card`: immutable card data (cost, types, stats, keywords, effects)
//! - `CardInstance`: one physical card object in a library, hand,
//!   graveyard or exile
//! - `Permanent`: a card object on the battlefield with its runtime state
//! - `CardRegistry`: definition lookup by id or name
//!
//! Definitions are shared behind `Arc`; instances only carry ids and
//! mutable runtime state.

pub mod attributes;
pub mod catalog;
pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{ActivatedAbility, Card, CardId};
pub use instance::{CardInstance, Permanent};
pub use registry::CardRegistry;
