//! Effect descriptors.
//!
//! A card is pure data: attributes plus lists of `Effect` descriptors
//! attached to named [`EffectSlot`]s. The engine never interprets a card by
//! name; it collects the descriptors of the relevant slot at each hook
//! point and hands them, one at a time, to an [`EffectResolver`].
//!
//! Descriptors fall into three groups:
//!
//! - **Costs**: paid when the spell or ability is announced, before it is
//!   placed on the stack (`SacrificeSelf`, `PayLife`).
//! - **One-shot effects**: executed in list order on resolution.
//! - **Static effects**: never executed; other components query them
//!   continuously (see `GameData::has_static`).
//!
//! [`EffectResolver`]: crate::effects::EffectResolver

use serde::{Deserialize, Serialize};

use super::targeting::TargetFilter;
use crate::cards::attributes::Keyword;
use crate::mana::Color;

/// Named hook points on a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectSlot {
    /// Instants and sorceries: runs on resolution.
    Spell,
    OnEnterBattlefield,
    /// Tapping the permanent for mana.
    OnTap,
    /// Continuous effects, queried rather than executed.
    Static,
    UpkeepTriggered,
    EndStepTriggered,
    OnCombatDamageToPlayer,
    OnDeath,
}

/// A number that is either printed on the card or chosen as X on casting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Amount {
    Fixed(i32),
    X,
}

impl Amount {
    #[must_use]
    pub fn resolve(self, x_value: u32) -> i32 {
        match self {
            Amount::Fixed(n) => n,
            Amount::X => x_value as i32,
        }
    }
}

/// Who an effect applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recipient {
    /// The chosen target (a player or a permanent).
    Target,
    /// The controller of the spell or ability.
    Controller,
    /// The permanent the ability came from.
    Source,
    EachOpponent,
    EachPlayer,
}

/// An effect descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    // === Costs ===
    SacrificeSelf,
    PayLife(i32),

    // === Damage and life ===
    DealDamage { amount: Amount, to: Recipient },
    /// Damage split across targets as announced on casting.
    DealDividedDamage,
    GainLife { amount: Amount, to: Recipient },
    LoseLife { amount: Amount, to: Recipient },
    PreventDamage { amount: i32, to: Recipient },

    // === Permanents ===
    Destroy { can_regenerate: bool },
    Exile,
    ReturnToHand,
    Tap,
    Untap,
    Boost { power: i32, toughness: i32, to: Recipient },
    GrantKeyword { keyword: Keyword, to: Recipient },
    Regenerate { to: Recipient },
    Sacrifice { filters: Vec<TargetFilter>, to: Recipient },
    EachPlayerReturnsPermanent { filters: Vec<TargetFilter> },
    /// Return up to `count` matching permanents, chosen on resolution.
    ReturnUpTo { count: usize, filters: Vec<TargetFilter> },
    /// Move the target Aura onto another permanent it could enchant.
    MoveAura,
    /// Attach the source Equipment to the target creature.
    Equip,
    /// The controller gains control of the target. A temporary change
    /// ends at cleanup.
    GainControl { until_end_of_turn: bool },
    ChooseColor,

    // === Stack ===
    CounterSpell,
    CounterUnlessPays(u32),
    CopySpell { choose_new_target: bool },
    /// Pick a new target for a spell with a single permanent target.
    ChangeTarget,

    // === Cards and zones ===
    DrawCards { count: Amount, to: Recipient },
    Discard { count: u32, to: Recipient },
    SearchLibrary { filters: Vec<TargetFilter> },
    LookAtTopAndReorder { count: usize },
    /// Look at the top `count` cards, take up to one matching card, and put
    /// the rest on the bottom in any order.
    LookAtTopTakeOneRestOnBottom { count: usize, filters: Vec<TargetFilter> },
    ReturnFromGraveyard { filters: Vec<TargetFilter> },
    RevealHandChooseDiscard { filters: Vec<TargetFilter> },

    // === Mana ===
    AddMana { color: Color, amount: u32 },

    // === Control ===
    /// Ask the controller first; run `effects` only on "yes".
    May { prompt: String, effects: Vec<Effect> },

    // === Static ===
    CantAttack,
    CantBlock,
    MustAttack,
    CantBeBlocked,
    CantBeBlockedBySubtype(String),
    CanBlockAdditional(u32),
    CanBlockOnlyFlyers,
    CantBeBlockedByMoreThan(u32),
    AssignDamageAsThoughUnblocked,
    DoesntUntap,
    ManaDoesntEmpty,
    NoMaximumHandSize,
    RedirectPlayerDamageToEnchanted,
    BoostEnchanted { power: i32, toughness: i32 },
    GrantKeywordToEnchanted(Keyword),
    EnchantedCantAttackOrBlock,
    EnchantedDoesntUntap,
    BoostOtherCreaturesYouControl { power: i32, toughness: i32 },
    BoostCreaturesOfChosenColor { power: i32, toughness: i32 },
}

impl Effect {
    /// Deal a fixed amount of damage to the target.
    #[must_use]
    pub fn damage(amount: i32) -> Self {
        Self::DealDamage {
            amount: Amount::Fixed(amount),
            to: Recipient::Target,
        }
    }

    /// The controller draws `count` cards.
    #[must_use]
    pub fn draw(count: i32) -> Self {
        Self::DrawCards {
            count: Amount::Fixed(count),
            to: Recipient::Controller,
        }
    }

    /// The target gets +power/+toughness until end of turn.
    #[must_use]
    pub fn boost(power: i32, toughness: i32) -> Self {
        Self::Boost {
            power,
            toughness,
            to: Recipient::Target,
        }
    }

    #[must_use]
    pub fn add_mana(color: Color) -> Self {
        Self::AddMana { color, amount: 1 }
    }

    /// Wrap effects in a yes/no choice.
    #[must_use]
    pub fn may(prompt: impl Into<String>, effects: impl IntoIterator<Item = Effect>) -> Self {
        Self::May {
            prompt: prompt.into(),
            effects: effects.into_iter().collect(),
        }
    }

    /// Paid on announcement rather than executed on resolution.
    #[must_use]
    pub fn is_cost(&self) -> bool {
        matches!(self, Effect::SacrificeSelf | Effect::PayLife(_))
    }

    /// Produces mana without using the stack.
    #[must_use]
    pub fn is_mana(&self) -> bool {
        matches!(self, Effect::AddMana { .. })
    }

    /// A continuous effect queried by other components.
    #[must_use]
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            Effect::CantAttack
                | Effect::CantBlock
                | Effect::MustAttack
                | Effect::CantBeBlocked
                | Effect::CantBeBlockedBySubtype(_)
                | Effect::CanBlockAdditional(_)
                | Effect::CanBlockOnlyFlyers
                | Effect::CantBeBlockedByMoreThan(_)
                | Effect::AssignDamageAsThoughUnblocked
                | Effect::DoesntUntap
                | Effect::ManaDoesntEmpty
                | Effect::NoMaximumHandSize
                | Effect::RedirectPlayerDamageToEnchanted
                | Effect::BoostEnchanted { .. }
                | Effect::GrantKeywordToEnchanted(_)
                | Effect::EnchantedCantAttackOrBlock
                | Effect::EnchantedDoesntUntap
                | Effect::BoostOtherCreaturesYouControl { .. }
                | Effect::BoostCreaturesOfChosenColor { .. }
        )
    }

    /// Applies to the enchanted permanent rather than the source itself.
    #[must_use]
    pub fn affects_enchanted(&self) -> bool {
        matches!(
            self,
            Effect::RedirectPlayerDamageToEnchanted
                | Effect::BoostEnchanted { .. }
                | Effect::GrantKeywordToEnchanted(_)
                | Effect::EnchantedCantAttackOrBlock
                | Effect::EnchantedDoesntUntap
        )
    }
}
