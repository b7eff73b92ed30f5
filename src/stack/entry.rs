//! Stack entries.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::attributes::CardType;
use crate::cards::Card;
use crate::core::{EntityId, PlayerId};
use crate::effects::{Effect, Target, TargetSpec};

/// Unique identifier for a stack entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackEntryId(pub u32);

impl StackEntryId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for StackEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StackEntry({})", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StackEntryType {
    CreatureSpell,
    ArtifactSpell,
    EnchantmentSpell,
    InstantSpell,
    SorcerySpell,
    ActivatedAbility,
    TriggeredAbility,
}

impl StackEntryType {
    /// The entry type for casting a card of `card_type`. Lands are never
    /// cast.
    #[must_use]
    pub const fn for_spell(card_type: CardType) -> Option<Self> {
        match card_type {
            CardType::Creature => Some(StackEntryType::CreatureSpell),
            CardType::Artifact => Some(StackEntryType::ArtifactSpell),
            CardType::Enchantment => Some(StackEntryType::EnchantmentSpell),
            CardType::Instant => Some(StackEntryType::InstantSpell),
            CardType::Sorcery => Some(StackEntryType::SorcerySpell),
            CardType::BasicLand => None,
        }
    }

    #[must_use]
    pub const fn is_spell(self) -> bool {
        !matches!(
            self,
            StackEntryType::ActivatedAbility | StackEntryType::TriggeredAbility
        )
    }

    /// Resolves into a permanent on the battlefield.
    #[must_use]
    pub const fn is_permanent_spell(self) -> bool {
        matches!(
            self,
            StackEntryType::CreatureSpell
                | StackEntryType::ArtifactSpell
                | StackEntryType::EnchantmentSpell
        )
    }
}

/// One pending spell or ability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StackEntry {
    pub id: StackEntryId,
    pub entry_type: StackEntryType,
    /// The spell's card, or the card the ability comes from.
    pub card: Arc<Card>,
    /// Card object of a spell, restored when it changes zones.
    pub card_object: Option<EntityId>,
    pub owner: PlayerId,
    pub controller: PlayerId,
    /// Permanent an ability comes from.
    pub source_permanent: Option<EntityId>,
    /// Shown in "<description> resolves." log lines.
    pub description: String,
    pub targets: SmallVec<[Target; 2]>,
    /// Rechecked against `targets` on resolution.
    pub target_spec: Option<TargetSpec>,
    pub x_value: u32,
    /// Per-target damage for divided-damage spells.
    pub damage_assignments: Vec<(Target, i32)>,
    /// Run in order on resolution.
    pub effects: Vec<Effect>,
    /// Copies are never put into a zone after resolving.
    pub is_copy: bool,
}

impl StackEntry {
    /// A new entry with no targets, owned and controlled by `controller`.
    #[must_use]
    pub fn new(
        id: StackEntryId,
        entry_type: StackEntryType,
        card: Arc<Card>,
        controller: PlayerId,
        effects: Vec<Effect>,
    ) -> Self {
        let description = card.name.clone();
        Self {
            id,
            entry_type,
            card,
            card_object: None,
            owner: controller,
            controller,
            source_permanent: None,
            description,
            targets: SmallVec::new(),
            target_spec: None,
            x_value: 0,
            damage_assignments: Vec::new(),
            effects,
            is_copy: false,
        }
    }

    #[must_use]
    pub fn with_targets(mut self, targets: impl IntoIterator<Item = Target>) -> Self {
        self.targets = targets.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_target_spec(mut self, spec: Option<TargetSpec>) -> Self {
        self.target_spec = spec;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_source(mut self, permanent: EntityId) -> Self {
        self.source_permanent = Some(permanent);
        self
    }

    /// A copy of this entry under a new id. The copy has no card object.
    #[must_use]
    pub fn copy_as(&self, id: StackEntryId, controller: PlayerId) -> Self {
        Self {
            id,
            controller,
            card_object: None,
            is_copy: true,
            description: format!("Copy of {}", self.description),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;

    fn bolt() -> Arc<Card> {
        Arc::new(Card::new(CardId::new(1), "Lightning Bolt", CardType::Instant))
    }

    #[test]
    fn test_stack_entry_id() {
        let id = StackEntryId::new(5);
        assert_eq!(id.raw(), 5);
        assert_eq!(format!("{}", id), "StackEntry(5)");
    }

    #[test]
    fn test_entry_types() {
        assert_eq!(
            StackEntryType::for_spell(CardType::Instant),
            Some(StackEntryType::InstantSpell)
        );
        assert_eq!(StackEntryType::for_spell(CardType::BasicLand), None);
        assert!(StackEntryType::CreatureSpell.is_permanent_spell());
        assert!(!StackEntryType::TriggeredAbility.is_spell());
    }

    #[test]
    fn test_copy_keeps_targets() {
        let entry = StackEntry::new(
            StackEntryId::new(1),
            StackEntryType::InstantSpell,
            bolt(),
            PlayerId::new(0),
            Vec::new(),
        )
        .with_targets([Target::Player(PlayerId::new(1))]);

        let copy = entry.copy_as(StackEntryId::new(2), PlayerId::new(1));
        assert!(copy.is_copy);
        assert_eq!(copy.owner, PlayerId::new(0));
        assert_eq!(copy.controller, PlayerId::new(1));
        assert_eq!(copy.targets, entry.targets);
        assert_eq!(copy.description, "Copy of Lightning Bolt");
    }
}
