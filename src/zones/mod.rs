//! Zones and card movement.
//!
//! ## Key Types
//!
//! - `Zone`: library, hand, battlefield, graveyard, exile, stack
//! - `ZonePosition`: where a card is inserted into a library
//!
//! Zone contents live on `PlayerState`; the movement operations are
//! methods on `GameData` (see `manager`).

pub mod manager;
pub mod zone;

pub use zone::{Zone, ZonePosition};
