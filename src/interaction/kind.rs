//! Interaction kinds.
//!
//! Each kind carries exactly what is needed to validate the response
//! (the legal choice set) and to apply it (the purpose or origin).

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, PlayerId};
use crate::effects::Effect;
use crate::stack::StackEntryId;
use crate::triggers::PendingTrigger;

/// What a single pending interaction is waiting for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AwaitingInput {
    AttackerDeclaration,
    BlockerDeclaration,
    CardChoice,
    PermanentChoice,
    MultiPermanentChoice,
    GraveyardChoice,
    ColorChoice,
    MayAbility,
    LibraryReorder,
    LibrarySearch,
    RevealedHandChoice,
    CombatDamageAssignment,
}

impl AwaitingInput {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            AwaitingInput::AttackerDeclaration => "attacker declaration",
            AwaitingInput::BlockerDeclaration => "blocker declaration",
            AwaitingInput::CardChoice => "card choice",
            AwaitingInput::PermanentChoice => "permanent choice",
            AwaitingInput::MultiPermanentChoice => "multiple permanent choice",
            AwaitingInput::GraveyardChoice => "graveyard choice",
            AwaitingInput::ColorChoice => "color choice",
            AwaitingInput::MayAbility => "may ability choice",
            AwaitingInput::LibraryReorder => "library reorder",
            AwaitingInput::LibrarySearch => "library search",
            AwaitingInput::RevealedHandChoice => "revealed hand choice",
            AwaitingInput::CombatDamageAssignment => "combat damage assignment",
        }
    }
}

impl std::fmt::Display for AwaitingInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a hand card is being chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardChoicePurpose {
    /// A discard effect; `remaining` includes this choice.
    Discard { remaining: u32 },
    /// Discarding down to maximum hand size.
    CleanupDiscard { remaining: u32 },
}

/// Why a permanent is being chosen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermanentChoicePurpose {
    /// Keep one legendary permanent with this name; the rest go to the
    /// graveyard.
    LegendRule { name: String },
    ReturnToHand,
    Sacrifice,
    /// Attach `aura` to the chosen permanent.
    AuraDestination { aura: EntityId },
    /// The chosen permanent becomes the only target of `entry`.
    NewSpellTarget { entry: StackEntryId },
}

/// Where an optional ("you may") effect came from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MayOrigin {
    /// Accepting puts the trigger on the stack.
    Trigger(PendingTrigger),
    /// Accepting runs `effects` as part of the suspended resolution.
    Resolution { effects: Vec<Effect> },
    /// The controller of `entry` may pay `amount` to keep it.
    CounterUnlessPays { entry: StackEntryId, amount: u32 },
}

/// Lethal damage still needed by one blocker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockerLethal {
    pub blocker: EntityId,
    pub lethal: i32,
}

/// The payload of an interaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InteractionKind {
    DeclareAttackers {
        /// Battlefield indices of creatures able to attack.
        attackable: Vec<usize>,
        /// Indices that must be included.
        must_attack: Vec<usize>,
    },
    DeclareBlockers {
        /// Defender's battlefield indices able to block something.
        blockable: Vec<usize>,
        /// Active player's battlefield indices of attacking creatures.
        attackers: Vec<usize>,
    },
    CardChoice {
        valid_indices: Vec<usize>,
        purpose: CardChoicePurpose,
    },
    PermanentChoice {
        valid: Vec<EntityId>,
        purpose: PermanentChoicePurpose,
    },
    /// Up to `max` distinct permanents, returned to their owners' hands.
    MultiPermanentChoice {
        valid: Vec<EntityId>,
        max: usize,
    },
    /// A card from the chooser's graveyard, returned to hand.
    GraveyardChoice {
        valid_indices: Vec<usize>,
    },
    ColorChoice {
        permanent: EntityId,
    },
    MayAbility {
        prompt: String,
        origin: MayOrigin,
    },
    /// Put `cards` (top first) back in any order.
    LibraryReorder {
        cards: Vec<EntityId>,
        to_bottom: bool,
    },
    /// Pick a matching library card, or none. With `looked_at` empty the
    /// whole library was searched and is shuffled afterwards; otherwise
    /// only those top cards were seen and the rest go to the bottom.
    LibrarySearch {
        valid_indices: Vec<usize>,
        looked_at: Vec<EntityId>,
    },
    /// Pick a card from `owner`'s revealed hand to be discarded.
    RevealedHandChoice {
        owner: PlayerId,
        valid_indices: Vec<usize>,
    },
    CombatDamageAssignment {
        attacker: EntityId,
        attacker_index: usize,
        power: i32,
        /// Blockers in damage assignment order.
        blockers: Vec<BlockerLethal>,
        defender: PlayerId,
        trample: bool,
        as_though_unblocked: bool,
    },
}

impl InteractionKind {
    #[must_use]
    pub fn awaiting(&self) -> AwaitingInput {
        match self {
            InteractionKind::DeclareAttackers { .. } => AwaitingInput::AttackerDeclaration,
            InteractionKind::DeclareBlockers { .. } => AwaitingInput::BlockerDeclaration,
            InteractionKind::CardChoice { .. } => AwaitingInput::CardChoice,
            InteractionKind::PermanentChoice { .. } => AwaitingInput::PermanentChoice,
            InteractionKind::MultiPermanentChoice { .. } => AwaitingInput::MultiPermanentChoice,
            InteractionKind::GraveyardChoice { .. } => AwaitingInput::GraveyardChoice,
            InteractionKind::ColorChoice { .. } => AwaitingInput::ColorChoice,
            InteractionKind::MayAbility { .. } => AwaitingInput::MayAbility,
            InteractionKind::LibraryReorder { .. } => AwaitingInput::LibraryReorder,
            InteractionKind::LibrarySearch { .. } => AwaitingInput::LibrarySearch,
            InteractionKind::RevealedHandChoice { .. } => AwaitingInput::RevealedHandChoice,
            InteractionKind::CombatDamageAssignment { .. } => AwaitingInput::CombatDamageAssignment,
        }
    }
}

/// One pending decision: who must answer, and what they are answering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub player: PlayerId,
    pub kind: InteractionKind,
}

impl Interaction {
    #[must_use]
    pub fn new(player: PlayerId, kind: InteractionKind) -> Self {
        Self { player, kind }
    }

    #[must_use]
    pub fn awaiting(&self) -> AwaitingInput {
        self.kind.awaiting()
    }
}
