//! Player actions.
//!
//! Every inbound operation on a [`Game`](crate::rules::Game) has a
//! serializable [`Action`] counterpart, so the networking layer can
//! forward decoded messages through a single entry point
//! (`Game::apply`), and the engine can keep an ordered history of what
//! each player did.
//!
//! Indices refer to the acting player's own zones at the moment the
//! action is applied: `hand_index` into their hand, `permanent_index`
//! into their battlefield.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::EntityId;
use super::player::PlayerId;
use crate::effects::Target;
use crate::mana::Color;
use crate::rules::Step;

/// One player action.
///
/// ## Example
///
/// ```
/// use mtg_rules_engine::core::Action;
///
/// let pass = Action::PassPriority;
/// assert!(!pass.is_interaction_response());
///
/// let attack = Action::DeclareAttackers(vec![0, 2]);
/// assert_eq!(attack.name(), "DeclareAttackers");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    // === Lifecycle ===
    KeepHand,
    Mulligan,
    BottomCards(Vec<usize>),

    // === Priority and casting ===
    PlayCard {
        hand_index: usize,
        x_value: u32,
        targets: SmallVec<[Target; 2]>,
        damage_assignments: Vec<(Target, i32)>,
    },
    ActivateAbility {
        permanent_index: usize,
        ability_index: usize,
        x_value: u32,
        targets: SmallVec<[Target; 2]>,
    },
    TapPermanent {
        permanent_index: usize,
    },
    PassPriority,
    SetAutoStops(Vec<Step>),

    // === Combat ===
    DeclareAttackers(Vec<usize>),
    /// `(blocker_index, attacker_index)` pairs.
    DeclareBlockers(Vec<(usize, usize)>),
    AssignCombatDamage {
        attacker_index: usize,
        assignments: Vec<(Target, i32)>,
    },

    // === Interaction responses ===
    ChooseColor(Color),
    ChooseCard(usize),
    ChoosePermanent(EntityId),
    ChoosePermanents(Vec<EntityId>),
    ChooseGraveyardCard(usize),
    /// A permutation of the revealed cards, new top first.
    ReorderLibrary(Vec<usize>),
    SearchLibrary(Option<usize>),
    ChooseRevealedCard(usize),
    ChooseMay(bool),
}

impl Action {
    /// Variant name, for logs and history views.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::KeepHand => "KeepHand",
            Action::Mulligan => "Mulligan",
            Action::BottomCards(_) => "BottomCards",
            Action::PlayCard { .. } => "PlayCard",
            Action::ActivateAbility { .. } => "ActivateAbility",
            Action::TapPermanent { .. } => "TapPermanent",
            Action::PassPriority => "PassPriority",
            Action::SetAutoStops(_) => "SetAutoStops",
            Action::DeclareAttackers(_) => "DeclareAttackers",
            Action::DeclareBlockers(_) => "DeclareBlockers",
            Action::AssignCombatDamage { .. } => "AssignCombatDamage",
            Action::ChooseColor(_) => "ChooseColor",
            Action::ChooseCard(_) => "ChooseCard",
            Action::ChoosePermanent(_) => "ChoosePermanent",
            Action::ChoosePermanents(_) => "ChoosePermanents",
            Action::ChooseGraveyardCard(_) => "ChooseGraveyardCard",
            Action::ReorderLibrary(_) => "ReorderLibrary",
            Action::SearchLibrary(_) => "SearchLibrary",
            Action::ChooseRevealedCard(_) => "ChooseRevealedCard",
            Action::ChooseMay(_) => "ChooseMay",
        }
    }

    /// Answers a pending interaction rather than acting with priority.
    #[must_use]
    pub fn is_interaction_response(&self) -> bool {
        matches!(
            self,
            Action::ChooseColor(_)
                | Action::ChooseCard(_)
                | Action::ChoosePermanent(_)
                | Action::ChoosePermanents(_)
                | Action::ChooseGraveyardCard(_)
                | Action::ReorderLibrary(_)
                | Action::SearchLibrary(_)
                | Action::ChooseRevealedCard(_)
                | Action::ChooseMay(_)
        )
    }
}

/// A recorded action with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: PlayerId,
    pub action: Action,
    pub turn: u32,
    pub step: Step,
    /// Position in the game's history.
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32, step: Step, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            step,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_responses() {
        assert!(Action::ChooseMay(true).is_interaction_response());
        assert!(Action::ChoosePermanent(EntityId(3)).is_interaction_response());
        assert!(!Action::PassPriority.is_interaction_response());
        assert!(!Action::DeclareBlockers(vec![(0, 0)]).is_interaction_response());
    }

    #[test]
    fn test_action_serialization() {
        let action = Action::PlayCard {
            hand_index: 2,
            x_value: 3,
            targets: SmallVec::from_slice(&[Target::Player(PlayerId::new(1))]),
            damage_assignments: Vec::new(),
        };
        let json = serde_json::to_string(&action).unwrap();
        let deserialized: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(action, deserialized);
    }

    #[test]
    fn test_record() {
        let record = ActionRecord::new(
            PlayerId::new(0),
            Action::PassPriority,
            3,
            Step::Upkeep,
            11,
        );
        assert_eq!(record.turn, 3);
        assert_eq!(record.sequence, 11);
        assert_eq!(record.action.name(), "PassPriority");
    }
}
