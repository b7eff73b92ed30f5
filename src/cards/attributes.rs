//! Typed card attributes: card types, supertypes and keywords.

use serde::{Deserialize, Serialize};

use crate::mana::Color;

/// Printed card type. Determines how a card is played and where it goes
/// when it resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    /// Basic land: played without the stack, once per turn.
    BasicLand,
    Creature,
    Artifact,
    Enchantment,
    Instant,
    Sorcery,
}

impl CardType {
    /// Resolves onto the battlefield rather than into the graveyard.
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        !matches!(self, CardType::Instant | CardType::Sorcery)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CardType::BasicLand => "Basic Land",
            CardType::Creature => "Creature",
            CardType::Artifact => "Artifact",
            CardType::Enchantment => "Enchantment",
            CardType::Instant => "Instant",
            CardType::Sorcery => "Sorcery",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Supertype {
    Basic,
    Legendary,
}

/// Keyword abilities the engine understands natively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Flying,
    Reach,
    FirstStrike,
    DoubleStrike,
    Trample,
    Vigilance,
    Haste,
    Lifelink,
    Menace,
    Fear,
    Intimidate,
    Indestructible,
    Shroud,
    Defender,
    Flash,
    Plainswalk,
    Islandwalk,
    Swampwalk,
    Mountainwalk,
    Forestwalk,
    ProtectionFrom(Color),
}

impl Keyword {
    /// Land subtype that a landwalk keyword keys on.
    #[must_use]
    pub const fn landwalk_subtype(self) -> Option<&'static str> {
        match self {
            Keyword::Plainswalk => Some("Plains"),
            Keyword::Islandwalk => Some("Island"),
            Keyword::Swampwalk => Some("Swamp"),
            Keyword::Mountainwalk => Some("Mountain"),
            Keyword::Forestwalk => Some("Forest"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permanent_types() {
        assert!(CardType::Creature.is_permanent());
        assert!(CardType::BasicLand.is_permanent());
        assert!(!CardType::Instant.is_permanent());
        assert!(!CardType::Sorcery.is_permanent());
    }

    #[test]
    fn test_landwalk() {
        assert_eq!(Keyword::Swampwalk.landwalk_subtype(), Some("Swamp"));
        assert_eq!(Keyword::Flying.landwalk_subtype(), None);
    }
}
