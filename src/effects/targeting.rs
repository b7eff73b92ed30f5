//! Targets and targeting legality.
//!
//! - `Target`: a chosen target (a player, a permanent, a spell, or a card
//!   in some zone)
//! - `TargetSpec`: what a spell or ability may target and how many
//! - `TargetFilter`: criteria a candidate must meet
//!
//! Legality is checked twice: when the spell or ability is announced and
//! again immediately before it resolves. A player is a legal target while
//! still in the game. A permanent is a legal target
//! while it is on the battlefield, matches every filter, has no shroud, and
//! has no protection from the source's color.

use serde::{Deserialize, Serialize};

use crate::cards::attributes::{CardType, Keyword, Supertype};
use crate::cards::definition::Card;
use crate::cards::instance::Permanent;
use crate::core::{EntityId, GameData, GameError, PlayerId, Result};
use crate::mana::Color;
use crate::stack::StackEntryId;
use crate::zones::Zone;

/// A chosen target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Player(PlayerId),
    Permanent(EntityId),
    Spell(StackEntryId),
    /// A card object in a non-battlefield zone.
    Card { id: EntityId, zone: Zone },
}

impl Target {
    #[must_use]
    pub fn as_permanent(&self) -> Option<EntityId> {
        match self {
            Target::Permanent(id) => Some(*id),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_player(&self) -> Option<PlayerId> {
        match self {
            Target::Player(player) => Some(*player),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_spell(&self) -> Option<StackEntryId> {
        match self {
            Target::Spell(id) => Some(*id),
            _ => None,
        }
    }
}

/// The kind of object that can be targeted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetType {
    Player,
    Permanent,
    /// "Any target": a permanent or a player.
    PermanentOrPlayer,
    Spell,
    GraveyardCard,
}

/// Number of targets to select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetCount {
    Exactly(usize),
    /// Between one and N targets.
    UpTo(usize),
}

impl TargetCount {
    #[must_use]
    pub fn min(self) -> usize {
        match self {
            TargetCount::Exactly(n) => n,
            TargetCount::UpTo(_) => 1,
        }
    }

    #[must_use]
    pub fn max(self) -> usize {
        match self {
            TargetCount::Exactly(n) | TargetCount::UpTo(n) => n,
        }
    }
}

/// A criterion a candidate must meet. A spec's filters must all match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetFilter {
    /// A player other than the acting player, or a permanent one controls.
    Opponent,
    /// A permanent the acting player controls.
    YouControl,
    CardType(CardType),
    /// Any one of the listed types.
    OneOf(Vec<CardType>),
    NotCardType(CardType),
    Subtype(String),
    Color(Color),
    NotColor(Color),
    Basic,
    Attacking,
    Tapped,
    /// Not the permanent the ability comes from.
    NotSource,
}

impl TargetFilter {
    /// Card-level check. Filters that depend on board state (`Opponent`,
    /// `YouControl`, `Attacking`, `Tapped`, `NotSource`) pass here and are
    /// checked by [`permanent_matches`].
    #[must_use]
    pub fn matches_card(&self, card: &Card) -> bool {
        match self {
            TargetFilter::CardType(card_type) => card.card_type == *card_type,
            TargetFilter::OneOf(types) => types.contains(&card.card_type),
            TargetFilter::NotCardType(card_type) => card.card_type != *card_type,
            TargetFilter::Subtype(subtype) => card.has_subtype(subtype),
            TargetFilter::Color(color) => card.color == Some(*color),
            TargetFilter::NotColor(color) => card.color != Some(*color),
            TargetFilter::Basic => card.supertypes.contains(&Supertype::Basic),
            TargetFilter::Opponent
            | TargetFilter::YouControl
            | TargetFilter::Attacking
            | TargetFilter::Tapped
            | TargetFilter::NotSource => true,
        }
    }
}

/// What a spell or ability may target.
///
/// ```
/// use mtg_rules_engine::cards::attributes::CardType;
/// use mtg_rules_engine::effects::{TargetCount, TargetFilter, TargetSpec, TargetType};
///
/// let spec = TargetSpec::creature().with_filter(TargetFilter::Attacking);
/// assert_eq!(spec.target_type, TargetType::Permanent);
/// assert_eq!(spec.filters.len(), 2);
/// assert_eq!(spec.count, TargetCount::Exactly(1));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub target_type: TargetType,
    pub filters: Vec<TargetFilter>,
    pub count: TargetCount,
}

impl TargetSpec {
    #[must_use]
    pub fn new(target_type: TargetType) -> Self {
        Self {
            target_type,
            filters: Vec::new(),
            count: TargetCount::Exactly(1),
        }
    }

    #[must_use]
    pub fn player() -> Self {
        Self::new(TargetType::Player)
    }

    #[must_use]
    pub fn opponent() -> Self {
        Self::player().with_filter(TargetFilter::Opponent)
    }

    #[must_use]
    pub fn permanent() -> Self {
        Self::new(TargetType::Permanent)
    }

    #[must_use]
    pub fn creature() -> Self {
        Self::permanent().with_filter(TargetFilter::CardType(CardType::Creature))
    }

    /// A creature or a player.
    #[must_use]
    pub fn any_target() -> Self {
        Self::new(TargetType::PermanentOrPlayer)
    }

    #[must_use]
    pub fn spell() -> Self {
        Self::new(TargetType::Spell)
    }

    #[must_use]
    pub fn graveyard_card() -> Self {
        Self::new(TargetType::GraveyardCard)
    }

    #[must_use]
    pub fn with_filter(mut self, filter: TargetFilter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: TargetCount) -> Self {
        self.count = count;
        self
    }
}

/// The object doing the targeting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetSource {
    pub controller: PlayerId,
    pub color: Option<Color>,
    pub permanent: Option<EntityId>,
}

/// Board-aware filter check for a permanent controlled by `controller`.
#[must_use]
pub fn permanent_matches(
    filters: &[TargetFilter],
    permanent: &Permanent,
    controller: PlayerId,
    source: &TargetSource,
) -> bool {
    filters.iter().all(|filter| match filter {
        TargetFilter::Opponent => controller != source.controller,
        TargetFilter::YouControl => controller == source.controller,
        TargetFilter::Attacking => permanent.attacking,
        TargetFilter::Tapped => permanent.tapped,
        TargetFilter::NotSource => source.permanent != Some(permanent.id),
        other => other.matches_card(&permanent.card),
    })
}

/// Whether `target` is currently a legal choice for `spec`.
#[must_use]
pub fn is_legal_target(
    data: &GameData,
    spec: &TargetSpec,
    target: &Target,
    source: &TargetSource,
) -> bool {
    match (spec.target_type, target) {
        (TargetType::Player | TargetType::PermanentOrPlayer, Target::Player(player)) => {
            data.players.contains(*player)
                && !data.players[*player].has_lost
                && spec.filters.iter().all(|filter| match filter {
                    TargetFilter::Opponent => *player != source.controller,
                    _ => true,
                })
        }
        (TargetType::Permanent | TargetType::PermanentOrPlayer, Target::Permanent(id)) => {
            let Some((controller, index)) = data.find_permanent(*id) else {
                return false;
            };
            let permanent = &data.players[controller].battlefield[index];
            let filters_ok = if spec.target_type == TargetType::PermanentOrPlayer {
                // "Any target" means creatures among permanents.
                permanent.card.is_creature()
                    && permanent_matches(&spec.filters, permanent, controller, source)
            } else {
                permanent_matches(&spec.filters, permanent, controller, source)
            };
            filters_ok && can_be_targeted_by(data, *id, source.color)
        }
        (TargetType::Spell, Target::Spell(entry_id)) => data
            .stack
            .iter()
            .find(|entry| entry.id == *entry_id)
            .is_some_and(|entry| {
                entry.entry_type.is_spell()
                    && spec.filters.iter().all(|filter| match filter {
                        TargetFilter::Opponent => entry.controller != source.controller,
                        TargetFilter::YouControl => entry.controller == source.controller,
                        other => other.matches_card(&entry.card),
                    })
            }),
        (TargetType::GraveyardCard, Target::Card { id, zone: Zone::Graveyard }) => {
            data.find_card(*id).is_some_and(|(owner, zone, index)| {
                zone == Zone::Graveyard
                    && spec.filters.iter().all(|filter| match filter {
                        TargetFilter::Opponent => owner != source.controller,
                        TargetFilter::YouControl => owner == source.controller,
                        other => other.matches_card(&data.players[owner].graveyard[index].card),
                    })
            })
        }
        _ => false,
    }
}

/// Shroud and protection checks for a permanent.
#[must_use]
pub fn can_be_targeted_by(data: &GameData, id: EntityId, source_color: Option<Color>) -> bool {
    if data.has_keyword(id, Keyword::Shroud) {
        return false;
    }
    match source_color {
        Some(color) => !data.has_keyword(id, Keyword::ProtectionFrom(color)),
        None => true,
    }
}

/// Every currently legal target for `spec`, players first, then
/// permanents in seat and battlefield order, then spells top-down.
#[must_use]
pub fn legal_targets(data: &GameData, spec: &TargetSpec, source: &TargetSource) -> Vec<Target> {
    let mut candidates = Vec::new();

    if matches!(spec.target_type, TargetType::Player | TargetType::PermanentOrPlayer) {
        candidates.extend(data.players.player_ids().map(Target::Player));
    }
    if matches!(spec.target_type, TargetType::Permanent | TargetType::PermanentOrPlayer) {
        for (_, player) in data.players.iter() {
            candidates.extend(player.battlefield.iter().map(|p| Target::Permanent(p.id)));
        }
    }
    if spec.target_type == TargetType::Spell {
        candidates.extend(data.stack.iter().rev().map(|entry| Target::Spell(entry.id)));
    }
    if spec.target_type == TargetType::GraveyardCard {
        for (_, player) in data.players.iter() {
            candidates.extend(player.graveyard.iter().map(|card| Target::Card {
                id: card.id,
                zone: Zone::Graveyard,
            }));
        }
    }

    candidates.retain(|target| is_legal_target(data, spec, target, source));
    candidates
}

/// Validate an announced target list: count, duplicates, and legality of
/// every entry.
pub fn validate_targets(
    data: &GameData,
    spec: &TargetSpec,
    targets: &[Target],
    source: &TargetSource,
) -> Result<()> {
    if targets.len() < spec.count.min() || targets.len() > spec.count.max() {
        return Err(GameError::illegal(format!(
            "Expected {} target(s), got {}",
            match spec.count {
                TargetCount::Exactly(n) => n.to_string(),
                TargetCount::UpTo(n) => format!("1 to {n}"),
            },
            targets.len()
        )));
    }
    for (i, target) in targets.iter().enumerate() {
        if targets[..i].contains(target) {
            return Err(GameError::illegal("The same target was chosen twice"));
        }
        if !is_legal_target(data, spec, target, source) {
            return Err(GameError::illegal("Invalid target"));
        }
    }
    Ok(())
}
