//! Card objects in a game.
//!
//! - [`CardInstance`]: a card in a library, hand, graveyard or exile. It
//!   keeps its id as it moves between those zones.
//! - [`Permanent`]: a card on the battlefield, with the mutable state the
//!   rules track there (tapped, combat status, damage, modifiers,
//!   attachment). A permanent's controller's battlefield list is the only
//!   place it exists.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::attributes::Keyword;
use super::definition::Card;
use crate::core::{EntityId, PlayerId};
use crate::mana::Color;

/// A card object outside the battlefield.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    pub id: EntityId,
    pub card: Arc<Card>,
    pub owner: PlayerId,
}

impl CardInstance {
    #[must_use]
    pub fn new(id: EntityId, card: Arc<Card>, owner: PlayerId) -> Self {
        Self { id, card, owner }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.card.name
    }
}

/// A card on the battlefield.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permanent {
    /// Fresh on every entry to the battlefield.
    pub id: EntityId,
    /// Id of the card object, restored when the permanent leaves.
    pub card_object: EntityId,
    pub card: Arc<Card>,
    pub owner: PlayerId,

    pub tapped: bool,
    pub summoning_sick: bool,

    pub attacking: bool,
    /// Blockers were declared for this attacker. Stays set if they leave.
    pub blocked: bool,
    /// Attackers this permanent is blocking.
    pub blocking: Vec<EntityId>,

    /// Until-end-of-turn modifiers.
    pub power_modifier: i32,
    pub toughness_modifier: i32,
    pub granted_keywords: Vec<Keyword>,

    /// Marked damage, removed at cleanup.
    pub damage: i32,
    pub prevention_shield: i32,
    pub regeneration_shields: u32,

    /// The permanent this Aura enchants or this Equipment equips.
    pub attached_to: Option<EntityId>,
    pub chosen_color: Option<Color>,
    /// Control goes back to this player at cleanup.
    pub control_reverts_to: Option<PlayerId>,
}

impl Permanent {
    /// A fresh permanent for `card`. It enters untapped and summoning sick.
    #[must_use]
    pub fn new(id: EntityId, card: CardInstance) -> Self {
        Self {
            id,
            card_object: card.id,
            card: card.card,
            owner: card.owner,
            tapped: false,
            summoning_sick: true,
            attacking: false,
            blocked: false,
            blocking: Vec::new(),
            power_modifier: 0,
            toughness_modifier: 0,
            granted_keywords: Vec::new(),
            damage: 0,
            prevention_shield: 0,
            regeneration_shields: 0,
            attached_to: None,
            chosen_color: None,
            control_reverts_to: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.card.name
    }

    #[must_use]
    pub fn is_blocking(&self) -> bool {
        !self.blocking.is_empty()
    }

    pub fn tap(&mut self) {
        self.tapped = true;
    }

    pub fn untap(&mut self) {
        self.tapped = false;
    }

    /// Clear attacking and blocking status.
    pub fn remove_from_combat(&mut self) {
        self.attacking = false;
        self.blocked = false;
        self.blocking.clear();
    }

    /// End-of-turn cleanup: damage wears off and "until end of turn"
    /// effects end.
    pub fn reset_modifiers(&mut self) {
        self.power_modifier = 0;
        self.toughness_modifier = 0;
        self.granted_keywords.clear();
        self.damage = 0;
        self.prevention_shield = 0;
        self.regeneration_shields = 0;
    }

    /// The card object this permanent becomes when it leaves the
    /// battlefield.
    #[must_use]
    pub fn into_card(self) -> CardInstance {
        CardInstance {
            id: self.card_object,
            card: self.card,
            owner: self.owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::attributes::CardType;
    use crate::cards::definition::CardId;

    fn bears() -> CardInstance {
        let card = Card::new(CardId::new(1), "Grizzly Bears", CardType::Creature).with_pt(2, 2);
        CardInstance::new(EntityId(5), Arc::new(card), PlayerId::new(0))
    }

    #[test]
    fn test_permanent_enters_sick() {
        let permanent = Permanent::new(EntityId(9), bears());
        assert!(permanent.summoning_sick);
        assert!(!permanent.tapped);
        assert_eq!(permanent.card_object, EntityId(5));
        assert_eq!(permanent.name(), "Grizzly Bears");
    }

    #[test]
    fn test_reset_modifiers() {
        let mut permanent = Permanent::new(EntityId(9), bears());
        permanent.power_modifier = 3;
        permanent.damage = 1;
        permanent.granted_keywords.push(Keyword::Flying);
        permanent.regeneration_shields = 1;

        permanent.reset_modifiers();
        assert_eq!(permanent.power_modifier, 0);
        assert_eq!(permanent.damage, 0);
        assert!(permanent.granted_keywords.is_empty());
        assert_eq!(permanent.regeneration_shields, 0);
    }

    #[test]
    fn test_into_card_restores_object_id() {
        let mut permanent = Permanent::new(EntityId(9), bears());
        permanent.tapped = true;
        let card = permanent.into_card();
        assert_eq!(card.id, EntityId(5));
        assert_eq!(card.owner, PlayerId::new(0));
    }
}
