//! Object identity.
//!
//! Every card object the engine tracks (a card in a hand, library or
//! graveyard, a permanent, a spell on the stack) carries an `EntityId`.
//! A card that changes zones keeps its card-object id; a permanent gets a
//! fresh id each time it enters the battlefield, so stale references
//! (targets, attachments) stop matching once the object leaves.
//!
//! Ids are handed out by [`EntityAllocator`], which lives inside the game
//! state so that snapshots and rollbacks stay consistent.
//!
//! ```
//! use mtg_rules_engine::core::{EntityAllocator, EntityId};
//!
//! let mut ids = EntityAllocator::default();
//! let first = ids.next_id();
//! let second = ids.next_id();
//! assert_eq!(first, EntityId(1));
//! assert_ne!(first, second);
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card object or permanent within one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Monotonic id source. Id 0 is never handed out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityAllocator {
    last: u32,
}

impl EntityAllocator {
    pub fn next_id(&mut self) -> EntityId {
        self.last += 1;
        EntityId(self.last)
    }

    /// Raw counter, shared with the stack-entry id space.
    pub fn next_raw(&mut self) -> u32 {
        self.last += 1;
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", EntityId(42)), "Entity(42)");
    }

    #[test]
    fn test_allocator_is_monotonic() {
        let mut ids = EntityAllocator::default();
        let a = ids.next_id();
        let b = ids.next_raw();
        let c = ids.next_id();
        assert_eq!(a.raw(), 1);
        assert_eq!(b, 2);
        assert_eq!(c.raw(), 3);
    }

    #[test]
    fn test_serialization() {
        let id = EntityId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
