//! Effect resolution: executing effect descriptors on game state.
//!
//! The engine never interprets descriptors itself. At each hook point it
//! builds a [`ResolverContext`] and hands every descriptor to an
//! [`EffectResolver`]. [`StandardResolver`] covers the whole descriptor
//! set with one exhaustive match.
//!
//! An effect that needs a player decision requests an interaction and
//! returns. Dispatch notices the pending interaction and parks the rest of
//! the effect list until it is answered.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{EntityId, GameData, PlayerId, Result};
use crate::interaction::{
    CardChoicePurpose, Interaction, InteractionKind, MayOrigin, PermanentChoicePurpose,
};
use crate::mana::Color;
use crate::stack::{StackEntry, StackEntryId};
use crate::zones::Zone;

use super::damage::DamageSource;
use super::effect::{Effect, Recipient};
use super::targeting::{legal_targets, permanent_matches, Target, TargetFilter, TargetSource, TargetType};

/// Everything an effect needs to know about where it came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverContext {
    pub controller: PlayerId,
    pub source_name: String,
    pub source_color: Option<Color>,
    pub source_permanent: Option<EntityId>,
    pub entry: Option<StackEntryId>,
    pub targets: SmallVec<[Target; 2]>,
    pub x_value: u32,
    pub damage_assignments: Vec<(Target, i32)>,
}

impl ResolverContext {
    /// A context with no targets, for `controller`'s object `source_name`.
    #[must_use]
    pub fn new(controller: PlayerId, source_name: impl Into<String>) -> Self {
        Self {
            controller,
            source_name: source_name.into(),
            source_color: None,
            source_permanent: None,
            entry: None,
            targets: SmallVec::new(),
            x_value: 0,
            damage_assignments: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_entry(entry: &StackEntry) -> Self {
        Self {
            controller: entry.controller,
            source_name: entry.card.name.clone(),
            source_color: entry.card.color,
            source_permanent: entry.source_permanent,
            entry: Some(entry.id),
            targets: entry.targets.clone(),
            x_value: entry.x_value,
            damage_assignments: entry.damage_assignments.clone(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, permanent: EntityId, color: Option<Color>) -> Self {
        self.source_permanent = Some(permanent);
        self.source_color = color;
        self
    }

    #[must_use]
    pub fn with_targets(mut self, targets: impl IntoIterator<Item = Target>) -> Self {
        self.targets = targets.into_iter().collect();
        self
    }

    #[must_use]
    pub fn damage_source(&self) -> DamageSource {
        DamageSource {
            controller: self.controller,
            name: self.source_name.clone(),
            color: self.source_color,
            permanent: self.source_permanent,
            combat: false,
        }
    }

    #[must_use]
    pub fn target_source(&self) -> TargetSource {
        TargetSource {
            controller: self.controller,
            color: self.source_color,
            permanent: self.source_permanent,
        }
    }
}

/// Whether an effect finished or is waiting on a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Suspended,
}

/// Interprets effect descriptors.
pub trait EffectResolver: Send + Sync {
    fn apply(&self, effect: &Effect, ctx: &ResolverContext, data: &mut GameData) -> Result<Outcome>;
}

/// The resolver for every descriptor in [`Effect`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardResolver;

impl EffectResolver for StandardResolver {
    fn apply(&self, effect: &Effect, ctx: &ResolverContext, data: &mut GameData) -> Result<Outcome> {
        match effect {
            // === Costs ===
            Effect::SacrificeSelf => {
                if let Some(id) = ctx.source_permanent {
                    let line = format!("{} sacrifices {}.", data.player_name(ctx.controller), ctx.source_name);
                    data.push_log(line);
                    data.move_to_graveyard(id);
                }
            }
            Effect::PayLife(amount) => data.lose_life(ctx.controller, *amount),

            // === Damage and life ===
            Effect::DealDamage { amount, to } => {
                let amount = amount.resolve(ctx.x_value);
                let source = ctx.damage_source();
                for target in recipients(data, ctx, *to) {
                    deal_damage(data, &source, target, amount);
                }
            }
            Effect::DealDividedDamage => {
                let source = ctx.damage_source();
                for (target, amount) in &ctx.damage_assignments {
                    deal_damage(data, &source, *target, *amount);
                }
            }
            Effect::GainLife { amount, to } => {
                let amount = amount.resolve(ctx.x_value);
                for player in recipient_players(data, ctx, *to) {
                    data.gain_life(player, amount);
                }
            }
            Effect::LoseLife { amount, to } => {
                let amount = amount.resolve(ctx.x_value);
                for player in recipient_players(data, ctx, *to) {
                    data.lose_life(player, amount);
                }
            }
            Effect::PreventDamage { amount, to } => {
                for target in recipients(data, ctx, *to) {
                    match target {
                        Target::Player(player) => data.players[player].prevention_shield += amount,
                        Target::Permanent(id) => {
                            if let Some(permanent) = data.permanent_mut(id) {
                                permanent.prevention_shield += amount;
                            }
                        }
                        _ => {}
                    }
                }
            }

            // === Permanents ===
            Effect::Destroy { can_regenerate } => {
                for id in target_permanents(data, ctx) {
                    data.destroy_permanent(id, *can_regenerate);
                }
            }
            Effect::Exile => {
                for id in target_permanents(data, ctx) {
                    data.exile_permanent(id);
                }
            }
            Effect::ReturnToHand => {
                for id in target_permanents(data, ctx) {
                    data.return_to_hand(id);
                }
            }
            Effect::Tap => {
                for id in target_permanents(data, ctx) {
                    if let Some(permanent) = data.permanent_mut(id) {
                        permanent.tap();
                    }
                }
            }
            Effect::Untap => {
                for id in target_permanents(data, ctx) {
                    if let Some(permanent) = data.permanent_mut(id) {
                        permanent.untap();
                    }
                }
            }
            Effect::Boost {
                power,
                toughness,
                to,
            } => {
                for id in recipient_permanents(data, ctx, *to) {
                    if let Some(permanent) = data.permanent_mut(id) {
                        permanent.power_modifier += power;
                        permanent.toughness_modifier += toughness;
                        let line = format!(
                            "{} gets {:+}/{:+} until end of turn.",
                            permanent.name(),
                            power,
                            toughness
                        );
                        data.push_log(line);
                    }
                }
            }
            Effect::GrantKeyword { keyword, to } => {
                for id in recipient_permanents(data, ctx, *to) {
                    if let Some(permanent) = data.permanent_mut(id) {
                        permanent.granted_keywords.push(*keyword);
                    }
                }
            }
            Effect::Regenerate { to } => {
                for id in recipient_permanents(data, ctx, *to) {
                    if let Some(permanent) = data.permanent_mut(id) {
                        permanent.regeneration_shields += 1;
                    }
                }
            }
            Effect::Sacrifice { filters, to } => {
                for player in recipient_players(data, ctx, *to) {
                    let valid = controlled_matching(data, player, filters);
                    match valid.len() {
                        0 => {}
                        1 => {
                            let line = sacrifice_line(data, player, valid[0]);
                            data.push_log(line);
                            data.move_to_graveyard(valid[0]);
                        }
                        _ => data.interaction.request(Interaction::new(
                            player,
                            InteractionKind::PermanentChoice {
                                valid,
                                purpose: PermanentChoicePurpose::Sacrifice,
                            },
                        )),
                    }
                }
            }
            Effect::EachPlayerReturnsPermanent { filters } => {
                for player in data.apnap_order() {
                    let valid = controlled_matching(data, player, filters);
                    match valid.len() {
                        0 => {}
                        1 => {
                            data.return_to_hand(valid[0]);
                        }
                        _ => data.interaction.request(Interaction::new(
                            player,
                            InteractionKind::PermanentChoice {
                                valid,
                                purpose: PermanentChoicePurpose::ReturnToHand,
                            },
                        )),
                    }
                }
            }
            Effect::ReturnUpTo { count, filters } => {
                let source = ctx.target_source();
                let valid: Vec<EntityId> = data
                    .players
                    .iter()
                    .flat_map(|(controller, state)| {
                        state
                            .battlefield
                            .iter()
                            .filter(move |p| permanent_matches(filters, p, controller, &source))
                            .map(|p| p.id)
                    })
                    .collect();
                if !valid.is_empty() {
                    data.interaction.request(Interaction::new(
                        ctx.controller,
                        InteractionKind::MultiPermanentChoice { valid, max: *count },
                    ));
                }
            }
            Effect::MoveAura => {
                for aura in target_permanents(data, ctx) {
                    let host = data.permanent(aura).and_then(|p| p.attached_to);
                    let valid: Vec<EntityId> = data
                        .players
                        .iter()
                        .flat_map(|(_, state)| state.battlefield.iter())
                        .filter(|p| p.card.is_creature() && Some(p.id) != host)
                        .map(|p| p.id)
                        .collect();
                    if valid.is_empty() {
                        data.push_log(format!("{} has nowhere to move.", ctx.source_name));
                        continue;
                    }
                    data.interaction.request(Interaction::new(
                        ctx.controller,
                        InteractionKind::PermanentChoice {
                            valid,
                            purpose: PermanentChoicePurpose::AuraDestination { aura },
                        },
                    ));
                }
            }
            Effect::Equip => {
                let Some(equipment) = ctx.source_permanent.filter(|id| data.permanent(*id).is_some()) else {
                    data.push_log(format!("{} is no longer on the battlefield.", ctx.source_name));
                    return Ok(Outcome::Done);
                };
                for creature in target_permanents(data, ctx) {
                    let name = data.permanent(creature).map_or_else(String::new, |p| p.name().to_string());
                    if let Some(permanent) = data.permanent_mut(equipment) {
                        permanent.attached_to = Some(creature);
                    }
                    data.push_log(format!("{} is now attached to {name}.", ctx.source_name));
                }
            }
            Effect::GainControl { until_end_of_turn } => {
                for id in target_permanents(data, ctx) {
                    let Some(previous) = data.gain_control(id, ctx.controller) else {
                        continue;
                    };
                    if *until_end_of_turn {
                        if let Some(permanent) = data.permanent_mut(id) {
                            permanent.control_reverts_to.get_or_insert(previous);
                        }
                    }
                }
            }
            Effect::ChooseColor => {
                if let Some(permanent) = ctx.source_permanent {
                    data.interaction.request(Interaction::new(
                        ctx.controller,
                        InteractionKind::ColorChoice { permanent },
                    ));
                }
            }

            // === Stack ===
            Effect::CounterSpell => {
                for entry in target_spells(ctx) {
                    crate::stack::counter_entry(data, entry);
                }
            }
            Effect::CounterUnlessPays(amount) => {
                for entry_id in target_spells(ctx) {
                    let Some(entry) = data.stack.iter().find(|e| e.id == entry_id) else {
                        continue;
                    };
                    data.interaction.request(Interaction::new(
                        entry.controller,
                        InteractionKind::MayAbility {
                            prompt: format!("Pay {{{amount}}} to keep {}?", entry.description),
                            origin: MayOrigin::CounterUnlessPays {
                                entry: entry_id,
                                amount: *amount,
                            },
                        },
                    ));
                }
            }
            Effect::CopySpell { choose_new_target } => {
                for entry_id in target_spells(ctx) {
                    let Some(original) = data.stack.iter().find(|e| e.id == entry_id).cloned() else {
                        continue;
                    };
                    let copy_id = StackEntryId::new(data.ids.next_raw());
                    let copy = original.copy_as(copy_id, ctx.controller);
                    let spec = copy.target_spec.clone();
                    let line = format!("{} copies {}.", data.player_name(ctx.controller), original.description);
                    data.push_log(line);
                    crate::stack::push_entry(data, copy);

                    let retarget = spec.filter(|s| {
                        *choose_new_target
                            && s.target_type == TargetType::Permanent
                            && s.count.max() == 1
                    });
                    if let Some(spec) = retarget {
                        let source = TargetSource {
                            controller: ctx.controller,
                            color: original.card.color,
                            permanent: None,
                        };
                        let valid: Vec<EntityId> = legal_targets(data, &spec, &source)
                            .iter()
                            .filter_map(Target::as_permanent)
                            .collect();
                        if !valid.is_empty() {
                            data.interaction.request(Interaction::new(
                                ctx.controller,
                                InteractionKind::PermanentChoice {
                                    valid,
                                    purpose: PermanentChoicePurpose::NewSpellTarget { entry: copy_id },
                                },
                            ));
                        }
                    }
                }
            }

            Effect::ChangeTarget => {
                for entry_id in target_spells(ctx) {
                    let Some(entry) = data.stack.iter().find(|e| e.id == entry_id) else {
                        continue;
                    };
                    let spec = entry.target_spec.clone().filter(|s| {
                        matches!(s.target_type, TargetType::Permanent | TargetType::PermanentOrPlayer)
                            && s.count.max() == 1
                    });
                    let Some(spec) = spec else {
                        let line = format!("{} has no single target to change.", entry.description);
                        data.push_log(line);
                        continue;
                    };
                    let source = TargetSource {
                        controller: entry.controller,
                        color: entry.card.color,
                        permanent: entry.source_permanent,
                    };
                    let current = entry.targets.clone();
                    let description = entry.description.clone();
                    let valid: Vec<EntityId> = legal_targets(data, &spec, &source)
                        .iter()
                        .filter(|target| !current.contains(*target))
                        .filter_map(Target::as_permanent)
                        .collect();
                    if valid.is_empty() {
                        data.push_log(format!("{description} has no other legal target."));
                        continue;
                    }
                    data.interaction.request(Interaction::new(
                        ctx.controller,
                        InteractionKind::PermanentChoice {
                            valid,
                            purpose: PermanentChoicePurpose::NewSpellTarget { entry: entry_id },
                        },
                    ));
                }
            }

            // === Cards and zones ===
            Effect::DrawCards { count, to } => {
                let count = count.resolve(ctx.x_value).max(0) as usize;
                for player in recipient_players(data, ctx, *to) {
                    data.draw_cards(player, count);
                }
            }
            Effect::Discard { count, to } => {
                for player in recipient_players(data, ctx, *to) {
                    let hand = data.players[player].hand.len();
                    if hand == 0 {
                        continue;
                    }
                    if hand <= *count as usize {
                        while data.discard(player, 0).is_some() {}
                        continue;
                    }
                    data.interaction.request(Interaction::new(
                        player,
                        InteractionKind::CardChoice {
                            valid_indices: (0..hand).collect(),
                            purpose: CardChoicePurpose::Discard { remaining: *count },
                        },
                    ));
                }
            }
            Effect::SearchLibrary { filters } => {
                let library = &data.players[ctx.controller].library;
                let valid_indices = matching_indices(library.iter().map(|c| &*c.card), filters);
                if valid_indices.is_empty() {
                    let line = format!("{} searches their library and finds nothing.", data.player_name(ctx.controller));
                    data.push_log(line);
                    data.shuffle_library(ctx.controller);
                } else {
                    data.interaction.request(Interaction::new(
                        ctx.controller,
                        InteractionKind::LibrarySearch {
                            valid_indices,
                            looked_at: Vec::new(),
                        },
                    ));
                }
            }
            Effect::LookAtTopAndReorder { count } => {
                let cards: Vec<EntityId> = data.players[ctx.controller]
                    .library
                    .iter()
                    .take(*count)
                    .map(|c| c.id)
                    .collect();
                if cards.len() > 1 {
                    data.interaction.request(Interaction::new(
                        ctx.controller,
                        InteractionKind::LibraryReorder {
                            cards,
                            to_bottom: false,
                        },
                    ));
                }
            }
            Effect::LookAtTopTakeOneRestOnBottom { count, filters } => {
                let top: Vec<&crate::cards::CardInstance> =
                    data.players[ctx.controller].library.iter().take(*count).collect();
                let looked_at: Vec<EntityId> = top.iter().map(|c| c.id).collect();
                let valid_indices = matching_indices(top.iter().map(|c| &*c.card), filters);
                if valid_indices.is_empty() {
                    put_on_bottom(data, ctx.controller, looked_at);
                } else {
                    data.interaction.request(Interaction::new(
                        ctx.controller,
                        InteractionKind::LibrarySearch {
                            valid_indices,
                            looked_at,
                        },
                    ));
                }
            }
            Effect::ReturnFromGraveyard { filters } => {
                let targeted: Vec<EntityId> = ctx
                    .targets
                    .iter()
                    .filter_map(|t| match t {
                        Target::Card { id, zone: Zone::Graveyard } => Some(*id),
                        _ => None,
                    })
                    .collect();
                if targeted.is_empty() {
                    let graveyard = &data.players[ctx.controller].graveyard;
                    let valid_indices = matching_indices(graveyard.iter().map(|c| &*c.card), filters);
                    if !valid_indices.is_empty() {
                        data.interaction.request(Interaction::new(
                            ctx.controller,
                            InteractionKind::GraveyardChoice { valid_indices },
                        ));
                    }
                }
                for id in targeted {
                    if let Some((owner, Zone::Graveyard, index)) = data.find_card(id) {
                        data.return_from_graveyard(owner, index);
                    }
                }
            }
            Effect::RevealHandChooseDiscard { filters } => {
                for owner in recipient_players(data, ctx, Recipient::Target) {
                    let hand = &data.players[owner].hand;
                    let names: Vec<&str> = hand.iter().map(|c| c.name()).collect();
                    let line = if names.is_empty() {
                        format!("{} reveals an empty hand.", data.player_name(owner))
                    } else {
                        format!("{} reveals their hand: {}.", data.player_name(owner), names.join(", "))
                    };
                    let valid_indices = matching_indices(hand.iter().map(|c| &*c.card), filters);
                    data.push_log(line);
                    if !valid_indices.is_empty() {
                        data.interaction.request(Interaction::new(
                            ctx.controller,
                            InteractionKind::RevealedHandChoice { owner, valid_indices },
                        ));
                    }
                }
            }

            // === Mana ===
            Effect::AddMana { color, amount } => {
                data.players[ctx.controller].mana_pool.add(*color, *amount);
            }

            // === Control ===
            Effect::May { prompt, effects } => {
                data.interaction.request(Interaction::new(
                    ctx.controller,
                    InteractionKind::MayAbility {
                        prompt: prompt.clone(),
                        origin: MayOrigin::Resolution {
                            effects: effects.clone(),
                        },
                    },
                ));
                return Ok(Outcome::Suspended);
            }

            // === Static ===
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
            | Effect::BoostCreaturesOfChosenColor { .. } => {
                tracing::error!(?effect, source = %ctx.source_name, "static effect executed as one-shot");
            }
        }
        Ok(Outcome::Done)
    }
}

fn deal_damage(data: &mut GameData, source: &DamageSource, target: Target, amount: i32) {
    match target {
        Target::Player(player) => {
            data.damage_player(source, player, amount);
        }
        Target::Permanent(id) => {
            data.damage_permanent(source, id, amount);
        }
        _ => {}
    }
}

/// Players and permanents an effect applies to.
fn recipients(data: &GameData, ctx: &ResolverContext, to: Recipient) -> Vec<Target> {
    match to {
        Recipient::Target => ctx.targets.to_vec(),
        Recipient::Source => ctx.source_permanent.map(Target::Permanent).into_iter().collect(),
        _ => recipient_players(data, ctx, to)
            .into_iter()
            .map(Target::Player)
            .collect(),
    }
}

fn recipient_players(data: &GameData, ctx: &ResolverContext, to: Recipient) -> Vec<PlayerId> {
    match to {
        Recipient::Target => ctx.targets.iter().filter_map(Target::as_player).collect(),
        Recipient::Controller => vec![ctx.controller],
        Recipient::Source => Vec::new(),
        Recipient::EachOpponent => data.opponents(ctx.controller),
        Recipient::EachPlayer => PlayerId::apnap_order(ctx.controller, data.player_count())
            .into_iter()
            .filter(|p| !data.players[*p].has_lost)
            .collect(),
    }
}

fn recipient_permanents(data: &GameData, ctx: &ResolverContext, to: Recipient) -> Vec<EntityId> {
    match to {
        Recipient::Target => target_permanents(data, ctx),
        Recipient::Source => ctx
            .source_permanent
            .filter(|id| data.permanent(*id).is_some())
            .into_iter()
            .collect(),
        _ => Vec::new(),
    }
}

fn target_permanents(data: &GameData, ctx: &ResolverContext) -> Vec<EntityId> {
    ctx.targets
        .iter()
        .filter_map(Target::as_permanent)
        .filter(|id| data.permanent(*id).is_some())
        .collect()
}

fn target_spells(ctx: &ResolverContext) -> Vec<StackEntryId> {
    ctx.targets.iter().filter_map(Target::as_spell).collect()
}

/// Permanents `player` controls that match `filters`.
fn controlled_matching(data: &GameData, player: PlayerId, filters: &[TargetFilter]) -> Vec<EntityId> {
    let source = TargetSource {
        controller: player,
        color: None,
        permanent: None,
    };
    data.players[player]
        .battlefield
        .iter()
        .filter(|p| permanent_matches(filters, p, player, &source))
        .map(|p| p.id)
        .collect()
}

fn matching_indices<'a>(
    cards: impl Iterator<Item = &'a crate::cards::Card>,
    filters: &[TargetFilter],
) -> Vec<usize> {
    cards
        .enumerate()
        .filter(|(_, card)| filters.iter().all(|f| f.matches_card(card)))
        .map(|(i, _)| i)
        .collect()
}

/// Move `cards` from the top of `player`'s library to the bottom. More
/// than one card asks the player for an order.
pub(crate) fn put_on_bottom(data: &mut GameData, player: PlayerId, cards: Vec<EntityId>) {
    match cards.len() {
        0 => {}
        1 => {
            let library = &mut data.players[player].library;
            if let Some(position) = library.iter().position(|c| c.id == cards[0]) {
                let card = library.remove(position);
                library.push_back(card);
            }
            let line = format!("{} puts a card on the bottom of their library.", data.player_name(player));
            data.push_log(line);
        }
        _ => data.interaction.request(Interaction::new(
            player,
            InteractionKind::LibraryReorder { cards, to_bottom: true },
        )),
    }
}

fn sacrifice_line(data: &GameData, player: PlayerId, id: EntityId) -> String {
    format!(
        "{} sacrifices {}.",
        data.player_name(player),
        data.permanent(id).map_or("", |p| p.name())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::catalog::test_catalog;
    use crate::cards::CardInstance;
    use crate::core::GameConfig;
    use crate::effects::Amount;
    use crate::interaction::AwaitingInput;

    fn board() -> GameData {
        let mut data = GameData::new(GameConfig::default());
        data.add_player("alice", Vec::new());
        data.add_player("bob", Vec::new());
        data
    }

    fn put(data: &mut GameData, player: PlayerId, name: &str) -> EntityId {
        let card = test_catalog().unwrap().get_by_name(name).unwrap();
        let object = data.ids.next_id();
        data.put_onto_battlefield(player, CardInstance::new(object, card, player))
    }

    fn in_hand(data: &mut GameData, player: PlayerId, name: &str) {
        let card = test_catalog().unwrap().get_by_name(name).unwrap();
        let object = data.ids.next_id();
        data.players[player].hand.push_back(CardInstance::new(object, card, player));
    }

    fn alice_ctx() -> ResolverContext {
        ResolverContext::new(PlayerId::new(0), "Test Spell")
    }

    #[test]
    fn test_x_damage() {
        let mut data = board();
        let ctx = alice_ctx().with_targets([Target::Player(PlayerId::new(1))]);
        let ctx = ResolverContext { x_value: 4, ..ctx };
        let effect = Effect::DealDamage {
            amount: Amount::X,
            to: Recipient::Target,
        };
        StandardResolver.apply(&effect, &ctx, &mut data).unwrap();
        assert_eq!(data.players[PlayerId::new(1)].life, 16);
    }

    #[test]
    fn test_divided_damage() {
        let mut data = board();
        let bears = put(&mut data, PlayerId::new(1), "Grizzly Bears");
        let mut ctx = alice_ctx();
        ctx.damage_assignments = vec![
            (Target::Permanent(bears), 2),
            (Target::Player(PlayerId::new(1)), 3),
        ];
        StandardResolver
            .apply(&Effect::DealDividedDamage, &ctx, &mut data)
            .unwrap();
        assert_eq!(data.permanent(bears).unwrap().damage, 2);
        assert_eq!(data.players[PlayerId::new(1)].life, 17);
    }

    #[test]
    fn test_each_opponent_loses_life() {
        let mut data = board();
        let effect = Effect::LoseLife {
            amount: Amount::Fixed(1),
            to: Recipient::EachOpponent,
        };
        StandardResolver.apply(&effect, &alice_ctx(), &mut data).unwrap();
        assert_eq!(data.players[PlayerId::new(0)].life, 20);
        assert_eq!(data.players[PlayerId::new(1)].life, 19);
    }

    #[test]
    fn test_sacrifice_single_candidate_is_automatic() {
        let mut data = board();
        let bob = PlayerId::new(1);
        let bears = put(&mut data, bob, "Grizzly Bears");
        put(&mut data, bob, "Forest");
        let effect = Effect::Sacrifice {
            filters: vec![TargetFilter::CardType(crate::cards::attributes::CardType::Creature)],
            to: Recipient::Target,
        };
        let ctx = alice_ctx().with_targets([Target::Player(bob)]);
        StandardResolver.apply(&effect, &ctx, &mut data).unwrap();

        assert!(data.permanent(bears).is_none());
        assert!(!data.interaction.is_pending());
        assert_eq!(data.players[bob].graveyard.len(), 1);
    }

    #[test]
    fn test_sacrifice_several_candidates_asks() {
        let mut data = board();
        let bob = PlayerId::new(1);
        put(&mut data, bob, "Grizzly Bears");
        put(&mut data, bob, "Hill Giant");
        let effect = Effect::Sacrifice {
            filters: vec![TargetFilter::CardType(crate::cards::attributes::CardType::Creature)],
            to: Recipient::Target,
        };
        let ctx = alice_ctx().with_targets([Target::Player(bob)]);
        StandardResolver.apply(&effect, &ctx, &mut data).unwrap();

        let interaction = data.interaction.current().unwrap();
        assert_eq!(interaction.player, bob);
        assert_eq!(interaction.awaiting(), AwaitingInput::PermanentChoice);
    }

    #[test]
    fn test_discard_whole_small_hand() {
        let mut data = board();
        let bob = PlayerId::new(1);
        in_hand(&mut data, bob, "Shock");
        let effect = Effect::Discard {
            count: 2,
            to: Recipient::Target,
        };
        let ctx = alice_ctx().with_targets([Target::Player(bob)]);
        StandardResolver.apply(&effect, &ctx, &mut data).unwrap();
        assert!(data.players[bob].hand.is_empty());
        assert_eq!(data.players[bob].graveyard.len(), 1);
        assert!(!data.interaction.is_pending());
    }

    #[test]
    fn test_may_suspends() {
        let mut data = board();
        let effect = Effect::may("Draw?", [Effect::draw(1)]);
        let outcome = StandardResolver.apply(&effect, &alice_ctx(), &mut data).unwrap();
        assert_eq!(outcome, Outcome::Suspended);
        assert_eq!(data.interaction.awaiting(), Some(AwaitingInput::MayAbility));
    }

    #[test]
    fn test_boost_logs() {
        let mut data = board();
        let bears = put(&mut data, PlayerId::new(0), "Grizzly Bears");
        let ctx = alice_ctx().with_targets([Target::Permanent(bears)]);
        StandardResolver.apply(&Effect::boost(3, 3), &ctx, &mut data).unwrap();
        assert_eq!(data.effective_stats(bears), (5, 5));
        assert_eq!(
            data.log.last().map(String::as_str),
            Some("Grizzly Bears gets +3/+3 until end of turn.")
        );
    }

    #[test]
    fn test_revealed_hand_filter() {
        let mut data = board();
        let bob = PlayerId::new(1);
        in_hand(&mut data, bob, "Grizzly Bears");
        in_hand(&mut data, bob, "Shock");
        let effect = Effect::RevealHandChooseDiscard {
            filters: vec![TargetFilter::NotCardType(crate::cards::attributes::CardType::Creature)],
        };
        let ctx = alice_ctx().with_targets([Target::Player(bob)]);
        StandardResolver.apply(&effect, &ctx, &mut data).unwrap();

        match &data.interaction.current().unwrap().kind {
            InteractionKind::RevealedHandChoice { owner, valid_indices } => {
                assert_eq!(*owner, bob);
                assert_eq!(valid_indices, &vec![1]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(data.log.iter().any(|l| l == "bob reveals their hand: Grizzly Bears, Shock."));
    }

    #[test]
    fn test_permanent_control_change() {
        let mut data = board();
        let bears = put(&mut data, PlayerId::new(1), "Grizzly Bears");
        data.permanent_mut(bears).unwrap().summoning_sick = false;
        let ctx = alice_ctx().with_targets([Target::Permanent(bears)]);
        let effect = Effect::GainControl {
            until_end_of_turn: false,
        };
        StandardResolver.apply(&effect, &ctx, &mut data).unwrap();

        let stolen = data.permanent(bears).unwrap();
        assert_eq!(data.controller_of(bears), Some(PlayerId::new(0)));
        assert!(stolen.summoning_sick);
        assert_eq!(stolen.control_reverts_to, None);
        assert_eq!(data.log.last().map(String::as_str), Some("alice gains control of Grizzly Bears."));
    }

    #[test]
    fn test_equip_needs_source_on_battlefield() {
        let mut data = board();
        let bears = put(&mut data, PlayerId::new(0), "Grizzly Bears");
        let scimitar = put(&mut data, PlayerId::new(0), "Leonin Scimitar");
        let ctx = ResolverContext::new(PlayerId::new(0), "Leonin Scimitar")
            .with_source(scimitar, None)
            .with_targets([Target::Permanent(bears)]);
        StandardResolver.apply(&Effect::Equip, &ctx, &mut data).unwrap();
        assert_eq!(data.permanent(scimitar).unwrap().attached_to, Some(bears));
        assert_eq!(data.effective_stats(bears), (3, 3));

        data.move_to_graveyard(scimitar);
        StandardResolver.apply(&Effect::Equip, &ctx, &mut data).unwrap();
        assert_eq!(
            data.log.last().map(String::as_str),
            Some("Leonin Scimitar is no longer on the battlefield.")
        );
        assert_eq!(data.effective_stats(bears), (2, 2));
    }
}
