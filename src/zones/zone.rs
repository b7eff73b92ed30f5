use serde::{Deserialize, Serialize};

/// The places a card object can be.
///
/// Every zone except the stack is owned per player; the stack is shared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Library,
    Hand,
    Battlefield,
    Graveyard,
    Exile,
    Stack,
}

impl Zone {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Zone::Library => "library",
            Zone::Hand => "hand",
            Zone::Battlefield => "battlefield",
            Zone::Graveyard => "graveyard",
            Zone::Exile => "exile",
            Zone::Stack => "stack",
        }
    }

    /// Cards in this zone are visible to every player.
    #[must_use]
    pub const fn is_public(self) -> bool {
        !matches!(self, Zone::Library | Zone::Hand)
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Position for inserting a card into a library.
///
/// Libraries are stored top-first: index 0 is the next card drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    Top,
    Bottom,
    /// Insert at a specific depth (0 = top).
    Index(usize),
}

impl ZonePosition {
    /// Resolve to a concrete insertion index for a zone of `len` cards.
    #[must_use]
    pub fn index_in(self, len: usize) -> usize {
        match self {
            ZonePosition::Top => 0,
            ZonePosition::Bottom => len,
            ZonePosition::Index(i) => i.min(len),
        }
    }
}
