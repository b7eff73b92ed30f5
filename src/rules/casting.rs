//! Playing cards and activating abilities.
//!
//! ## Announcement
//!
//! Everything is checked before anything is paid: priority, timing, mana,
//! targets, divided damage and additional costs. Only then are costs paid,
//! the card leaves the hand and the entry goes on the stack. Combined with
//! the transactional `Game` facade this makes announcement all or nothing.
//!
//! ## Timing
//!
//! Instants, Flash cards and ordinary activated abilities may be used
//! whenever their controller holds priority. Everything else needs the
//! active player's main phase and an empty stack.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::cards::attributes::Keyword;
use crate::cards::{Card, Permanent};
use crate::core::{EntityId, GameData, GameError, PlayerId, Result};
use crate::effects::{
    legal_targets, run_effects, validate_targets, Effect, EffectResolver, EffectSlot,
    ResolverContext, RunResult, Target, TargetSource, TargetSpec,
};
use crate::interaction::{Continuation, InteractionKind, MayOrigin};
use crate::mana::{ManaCost, ManaPool};
use crate::stack::{self, StackEntry, StackEntryType};
use crate::triggers;

/// Whether the permanent may pay a `{T}` cost right now.
#[must_use]
pub fn can_tap_for_ability(data: &GameData, permanent: &Permanent) -> bool {
    !permanent.tapped
        && (!permanent.card.is_creature()
            || !permanent.summoning_sick
            || data.has_keyword(permanent.id, Keyword::Haste))
}

fn sorcery_timing(data: &GameData, player: PlayerId) -> bool {
    player == data.active_player && data.step.is_main() && data.stack.is_empty()
}

fn require_sorcery_timing(data: &GameData, player: PlayerId, what: &str) -> Result<()> {
    if sorcery_timing(data, player) {
        Ok(())
    } else {
        Err(GameError::illegal(format!(
            "{what} can only be played during your main phase with an empty stack"
        )))
    }
}

fn can_play_land(data: &GameData, player: PlayerId) -> bool {
    sorcery_timing(data, player) && data.players[player].lands_played == 0
}

/// Check announced targets against `spec`. A creature's enter-the-
/// battlefield target may be left out when nothing is targetable.
fn check_targets(
    data: &GameData,
    spec: Option<&TargetSpec>,
    targets: &[Target],
    source: &TargetSource,
    optional: bool,
) -> Result<()> {
    let Some(spec) = spec else {
        if targets.is_empty() {
            return Ok(());
        }
        return Err(GameError::illegal("This doesn't take targets"));
    };
    if targets.is_empty() && legal_targets(data, spec, source).is_empty() {
        if optional {
            return Ok(());
        }
        return Err(GameError::illegal("No legal targets"));
    }
    validate_targets(data, spec, targets, source)
}

/// Check that additional costs in `effects` can be paid.
fn check_costs(data: &GameData, player: PlayerId, effects: &[Effect]) -> Result<()> {
    let life: i32 = effects
        .iter()
        .map(|e| match e {
            Effect::PayLife(n) => *n,
            _ => 0,
        })
        .sum();
    if life > data.players[player].life {
        return Err(GameError::illegal("Not enough life to pay"));
    }
    Ok(())
}

/// Pay the additional costs in `effects`, in order.
fn pay_costs(data: &mut GameData, player: PlayerId, source: Option<EntityId>, effects: &[Effect]) {
    for effect in effects.iter().filter(|e| e.is_cost()) {
        match effect {
            Effect::PayLife(n) => data.lose_life(player, *n),
            Effect::SacrificeSelf => {
                if let Some(id) = source {
                    if let Some(permanent) = data.permanent(id) {
                        let line = format!("{} sacrifices {}.", data.player_name(player), permanent.name());
                        data.push_log(line);
                    }
                    data.move_to_graveyard(id);
                }
            }
            _ => {}
        }
    }
}

/// Play the card at `hand_index`: a land goes straight onto the
/// battlefield; anything else is cast onto the stack.
pub fn play_card(
    data: &mut GameData,
    player: PlayerId,
    hand_index: usize,
    x_value: u32,
    targets: &[Target],
    damage_assignments: &[(Target, i32)],
) -> Result<()> {
    data.require_priority(player)?;
    let card = data.players[player]
        .hand
        .get(hand_index)
        .map(|c| Arc::clone(&c.card))
        .ok_or_else(|| GameError::invalid_choice(format!("No card at hand index {hand_index}")))?;

    if card.is_land() {
        return play_land(data, player, hand_index);
    }
    if !card.is_instant_speed() {
        require_sorcery_timing(data, player, &card.name)?;
    }

    let cost = card.cost();
    let x_value = if cost.has_x() { x_value } else { 0 };
    if !cost.can_pay(&data.players[player].mana_pool, x_value) {
        return Err(GameError::InsufficientMana);
    }

    let source = TargetSource {
        controller: player,
        color: card.color,
        permanent: None,
    };
    check_targets(data, card.target.as_ref(), targets, &source, card.is_creature())?;
    if card.needs_damage_distribution() {
        check_distribution(targets, damage_assignments, x_value)?;
    }
    let spell_effects = card.effects(EffectSlot::Spell);
    check_costs(data, player, spell_effects)?;

    let entry_type = StackEntryType::for_spell(card.card_type)
        .ok_or_else(|| GameError::illegal(format!("{} cannot be cast", card.name)))?;

    // Point of no return.
    cost.pay(&mut data.players[player].mana_pool, x_value)?;
    pay_costs(data, player, None, spell_effects);
    let instance = data.players[player].hand.remove(hand_index);

    let id = stack::next_stack_id(data);
    let effects: Vec<Effect> = spell_effects.iter().filter(|e| !e.is_cost()).cloned().collect();
    let mut entry = StackEntry::new(id, entry_type, Arc::clone(&card), player, effects)
        .with_targets(targets.iter().copied())
        .with_target_spec(card.target.clone());
    entry.owner = instance.owner;
    entry.card_object = Some(instance.id);
    entry.x_value = x_value;
    if card.needs_damage_distribution() {
        entry.damage_assignments = damage_assignments.to_vec();
    }

    let line = format!("{} casts {}.", data.player_name(player), card.name);
    data.push_log(line);
    tracing::info!(player = %player, card = %card.name, x_value, "cast");
    stack::push_entry(data, entry);
    Ok(())
}

fn check_distribution(targets: &[Target], assignments: &[(Target, i32)], x_value: u32) -> Result<()> {
    let mut total = 0;
    for (i, (target, amount)) in assignments.iter().enumerate() {
        if !targets.contains(target) {
            return Err(GameError::illegal("Damage assigned to something that isn't a target"));
        }
        if assignments[..i].iter().any(|(t, _)| t == target) {
            return Err(GameError::illegal("The same target was assigned damage twice"));
        }
        if *amount < 1 {
            return Err(GameError::illegal("Each target must be assigned at least 1 damage"));
        }
        total += amount;
    }
    if targets.iter().any(|t| !assignments.iter().any(|(a, _)| a == t)) {
        return Err(GameError::illegal("Every target must be assigned damage"));
    }
    if total != x_value as i32 {
        return Err(GameError::illegal(format!(
            "Assigned {total} damage, but X is {x_value}"
        )));
    }
    Ok(())
}

fn play_land(data: &mut GameData, player: PlayerId, hand_index: usize) -> Result<()> {
    if !sorcery_timing(data, player) {
        return Err(GameError::illegal(
            "Lands can only be played during your main phase with an empty stack",
        ));
    }
    if data.players[player].lands_played > 0 {
        return Err(GameError::illegal("You have already played a land this turn"));
    }

    let card = data.players[player].hand.remove(hand_index);
    let line = format!("{} plays {}.", data.player_name(player), card.name());
    data.push_log(line);
    data.players[player].lands_played += 1;
    let id = data.put_onto_battlefield(player, card);
    data.clear_priority_passes();
    triggers::on_enter_battlefield(data, player, id, &[], None);
    Ok(())
}

/// Activate ability `ability_index` of the permanent at
/// `permanent_index`. Mana abilities resolve immediately.
pub fn activate_ability(
    data: &mut GameData,
    resolver: &dyn EffectResolver,
    player: PlayerId,
    permanent_index: usize,
    ability_index: usize,
    x_value: u32,
    targets: &[Target],
) -> Result<()> {
    data.require_running()?;
    let permanent = data.players[player]
        .battlefield
        .get(permanent_index)
        .cloned()
        .ok_or_else(|| GameError::invalid_choice(format!("No permanent at index {permanent_index}")))?;
    let ability = permanent
        .card
        .abilities
        .get(ability_index)
        .cloned()
        .ok_or_else(|| GameError::invalid_choice(format!("{} has no ability {ability_index}", permanent.name())))?;

    let mana_ability = ability.is_mana_ability();
    if mana_ability {
        if data.interaction.is_pending() {
            return Err(GameError::illegal("Waiting for a decision"));
        }
    } else {
        data.require_priority(player)?;
    }
    if ability.sorcery_speed {
        require_sorcery_timing(data, player, &ability.description)?;
    }
    if ability.requires_tap && !can_tap_for_ability(data, &permanent) {
        let reason = if permanent.tapped {
            format!("{} is already tapped", permanent.name())
        } else {
            format!("{} has summoning sickness", permanent.name())
        };
        return Err(GameError::illegal(reason));
    }

    let cost = ability.mana_cost.clone().unwrap_or_default();
    let x_value = if cost.has_x() { x_value } else { 0 };
    if !cost.can_pay(&data.players[player].mana_pool, x_value) {
        return Err(GameError::InsufficientMana);
    }
    let source = TargetSource {
        controller: player,
        color: permanent.card.color,
        permanent: Some(permanent.id),
    };
    check_targets(data, ability.target.as_ref(), targets, &source, false)?;
    check_costs(data, player, &ability.effects)?;

    cost.pay(&mut data.players[player].mana_pool, x_value)?;
    if ability.requires_tap {
        if let Some(p) = data.permanent_mut(permanent.id) {
            p.tap();
        }
    }
    pay_costs(data, player, Some(permanent.id), &ability.effects);
    let effects: Vec<Effect> = ability.effects.iter().filter(|e| !e.is_cost()).cloned().collect();

    if mana_ability {
        let ctx = ResolverContext::new(player, permanent.name())
            .with_source(permanent.id, permanent.card.color);
        if let RunResult::Suspended { next } = run_effects(data, resolver, &effects, 0, &ctx)? {
            tracing::debug!(card = %permanent.name(), ability_index, next, "mana ability waiting on a decision");
            data.interaction.suspend(Continuation::Effects { effects, next, ctx });
        }
        return Ok(());
    }

    let id = stack::next_stack_id(data);
    let mut entry = StackEntry::new(
        id,
        StackEntryType::ActivatedAbility,
        Arc::clone(&permanent.card),
        player,
        effects,
    )
    .with_targets(targets.iter().copied())
    .with_target_spec(ability.target.clone())
    .with_description(format!("{}'s ability", permanent.name()))
    .with_source(permanent.id);
    entry.x_value = x_value;

    let line = format!("{} activates {}.", data.player_name(player), ability.description);
    data.push_log(line);
    tracing::info!(player = %player, card = %permanent.name(), ability_index, "activate");
    stack::push_entry(data, entry);
    Ok(())
}

/// The mana a permanent's `OnTap` slot adds.
fn tap_mana(card: &Card) -> SmallVec<[(crate::mana::Color, u32); 1]> {
    card.effects(EffectSlot::OnTap)
        .iter()
        .filter_map(|e| match e {
            Effect::AddMana { color, amount } => Some((*color, *amount)),
            _ => None,
        })
        .collect()
}

/// Whether `player` is being asked to pay for a counter-unless-pays,
/// the one decision mana can still be made for.
fn deciding_payment(data: &GameData, player: PlayerId) -> bool {
    data.interaction.current().is_some_and(|i| {
        i.player == player
            && matches!(
                i.kind,
                InteractionKind::MayAbility {
                    origin: MayOrigin::CounterUnlessPays { .. },
                    ..
                }
            )
    })
}

/// Tap a permanent for mana. Does not use the stack.
pub fn tap_permanent(data: &mut GameData, player: PlayerId, permanent_index: usize) -> Result<()> {
    data.require_running()?;
    if data.interaction.is_pending() && !deciding_payment(data, player) {
        return Err(GameError::illegal("Waiting for a decision"));
    }
    let permanent = data.players[player]
        .battlefield
        .get(permanent_index)
        .ok_or_else(|| GameError::invalid_choice(format!("No permanent at index {permanent_index}")))?;
    let mana = tap_mana(&permanent.card);
    if mana.is_empty() {
        return Err(GameError::illegal(format!("{} has no mana ability", permanent.name())));
    }
    if permanent.tapped {
        return Err(GameError::illegal(format!("{} is already tapped", permanent.name())));
    }
    if !can_tap_for_ability(data, permanent) {
        return Err(GameError::illegal(format!("{} has summoning sickness", permanent.name())));
    }

    let name = permanent.name().to_string();
    data.players[player].battlefield[permanent_index].tap();
    for (color, amount) in mana {
        data.players[player].mana_pool.add(color, amount);
    }
    let line = format!("{} taps {} for mana.", data.player_name(player), name);
    data.push_log(line);
    Ok(())
}

/// The pool plus everything the player's untapped mana sources could add.
#[must_use]
pub fn potential_mana(data: &GameData, player: PlayerId) -> ManaPool {
    let mut pool = data.players[player].mana_pool.clone();
    for permanent in data.players[player].battlefield.iter() {
        if !can_tap_for_ability(data, permanent) {
            continue;
        }
        let from_tap = tap_mana(&permanent.card);
        if !from_tap.is_empty() {
            for (color, amount) in from_tap {
                pool.add(color, amount);
            }
            continue;
        }
        let free_ability = permanent.card.abilities.iter().find(|a| {
            a.is_mana_ability() && a.requires_tap && a.mana_cost.as_ref().map_or(true, |c| *c == ManaCost::free())
        });
        if let Some(ability) = free_ability {
            for effect in &ability.effects {
                if let Effect::AddMana { color, amount } = effect {
                    pool.add(*color, *amount);
                }
            }
        }
    }
    pool
}

/// Hand indices `player` could legally play right now.
#[must_use]
pub fn playable_card_indices(data: &GameData, player: PlayerId) -> Vec<usize> {
    if data.priority_holder() != Some(player) {
        return Vec::new();
    }
    let mana = potential_mana(data, player);
    let land_ok = can_play_land(data, player);
    let sorcery_ok = sorcery_timing(data, player);

    data.players[player]
        .hand
        .iter()
        .enumerate()
        .filter(|(_, instance)| {
            let card = &instance.card;
            if card.is_land() {
                return land_ok;
            }
            if !card.is_instant_speed() && !sorcery_ok {
                return false;
            }
            if !card.cost().can_pay(&mana, 0) {
                return false;
            }
            match &card.target {
                Some(spec) if !card.is_creature() => {
                    let source = TargetSource {
                        controller: player,
                        color: card.color,
                        permanent: None,
                    };
                    !legal_targets(data, spec, &source).is_empty()
                }
                _ => true,
            }
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::catalog::test_catalog;
    use crate::cards::CardInstance;
    use crate::core::{GameConfig, GameStatus};
    use crate::effects::StandardResolver;
    use crate::mana::Color;
    use crate::rules::Step;

    fn running() -> GameData {
        let mut data = GameData::new(GameConfig::default());
        data.add_player("alice", Vec::new());
        data.add_player("bob", Vec::new());
        data.status = GameStatus::Running;
        data.turn_number = 1;
        data.step = Step::PrecombatMain;
        data
    }

    fn to_hand(data: &mut GameData, player: PlayerId, name: &str) -> usize {
        let card = test_catalog().unwrap().get_by_name(name).unwrap();
        let id = data.ids.next_id();
        data.players[player].hand.push_back(CardInstance::new(id, card, player));
        data.players[player].hand.len() - 1
    }

    fn put(data: &mut GameData, player: PlayerId, name: &str) -> EntityId {
        let card = test_catalog().unwrap().get_by_name(name).unwrap();
        let object = data.ids.next_id();
        let id = data.put_onto_battlefield(player, CardInstance::new(object, card, player));
        data.permanent_mut(id).unwrap().summoning_sick = false;
        id
    }

    const ALICE: PlayerId = PlayerId::new(0);
    const BOB: PlayerId = PlayerId::new(1);

    #[test]
    fn test_land_once_per_turn() {
        let mut data = running();
        to_hand(&mut data, ALICE, "Forest");
        to_hand(&mut data, ALICE, "Forest");

        play_card(&mut data, ALICE, 0, 0, &[], &[]).unwrap();
        assert_eq!(data.players[ALICE].battlefield.len(), 1);
        assert!(data.log.iter().any(|l| l == "alice plays Forest."));

        let err = play_card(&mut data, ALICE, 0, 0, &[], &[]).unwrap_err();
        assert_eq!(err.reason(), "You have already played a land this turn");
    }

    #[test]
    fn test_cast_pays_and_pushes() {
        let mut data = running();
        data.players[ALICE].mana_pool.add(Color::Red, 1);
        let bolt = to_hand(&mut data, ALICE, "Lightning Bolt");

        play_card(&mut data, ALICE, bolt, 0, &[Target::Player(BOB)], &[]).unwrap();
        assert!(data.players[ALICE].mana_pool.is_empty());
        assert!(data.players[ALICE].hand.is_empty());
        assert_eq!(data.stack.len(), 1);
        assert!(data.log.iter().any(|l| l == "alice casts Lightning Bolt."));
    }

    #[test]
    fn test_insufficient_mana() {
        let mut data = running();
        let bolt = to_hand(&mut data, ALICE, "Lightning Bolt");
        let err = play_card(&mut data, ALICE, bolt, 0, &[Target::Player(BOB)], &[]).unwrap_err();
        assert_eq!(err, GameError::InsufficientMana);
    }

    #[test]
    fn test_sorcery_needs_main_phase() {
        let mut data = running();
        data.step = Step::Upkeep;
        data.players[ALICE].mana_pool.add(Color::Blue, 3);
        let divination = to_hand(&mut data, ALICE, "Divination");
        assert!(play_card(&mut data, ALICE, divination, 0, &[], &[]).is_err());
    }

    #[test]
    fn test_target_required() {
        let mut data = running();
        data.players[ALICE].mana_pool.add(Color::Black, 2);
        let terror = to_hand(&mut data, ALICE, "Terror");
        let err = play_card(&mut data, ALICE, terror, 0, &[], &[]).unwrap_err();
        assert_eq!(err.reason(), "No legal targets");
    }

    #[test]
    fn test_divided_damage_must_sum_to_x() {
        let mut data = running();
        data.players[ALICE].mana_pool.add(Color::Red, 6);
        let thunder = to_hand(&mut data, ALICE, "Rolling Thunder");
        let targets = [Target::Player(BOB), Target::Player(ALICE)];

        let short = [(Target::Player(BOB), 2), (Target::Player(ALICE), 1)];
        assert!(play_card(&mut data, ALICE, thunder, 4, &targets, &short).is_err());

        let exact = [(Target::Player(BOB), 3), (Target::Player(ALICE), 1)];
        play_card(&mut data, ALICE, thunder, 4, &targets, &exact).unwrap();
        assert_eq!(data.stack[0].damage_assignments.len(), 2);
    }

    #[test]
    fn test_tap_for_mana() {
        let mut data = running();
        put(&mut data, ALICE, "Mountain");
        tap_permanent(&mut data, ALICE, 0).unwrap();
        assert_eq!(data.players[ALICE].mana_pool.get(Color::Red), 1);
        assert!(tap_permanent(&mut data, ALICE, 0).is_err());
    }

    #[test]
    fn test_activated_ability_uses_stack() {
        let mut data = running();
        put(&mut data, ALICE, "Prodigal Sorcerer");
        activate_ability(&mut data, &StandardResolver, ALICE, 0, 0, 0, &[Target::Player(BOB)]).unwrap();
        assert_eq!(data.stack.len(), 1);
        assert_eq!(data.stack[0].description, "Prodigal Sorcerer's ability");
        assert!(data.players[ALICE].battlefield[0].tapped);
    }

    #[test]
    fn test_mana_ability_resolves_immediately() {
        let mut data = running();
        put(&mut data, ALICE, "Llanowar Elves");
        activate_ability(&mut data, &StandardResolver, ALICE, 0, 0, 0, &[]).unwrap();
        assert!(data.stack.is_empty());
        assert_eq!(data.players[ALICE].mana_pool.get(Color::Green), 1);
    }

    #[test]
    fn test_summoning_sick_cannot_tap() {
        let mut data = running();
        let id = put(&mut data, ALICE, "Prodigal Sorcerer");
        data.permanent_mut(id).unwrap().summoning_sick = true;
        let err = activate_ability(&mut data, &StandardResolver, ALICE, 0, 0, 0, &[Target::Player(BOB)])
            .unwrap_err();
        assert_eq!(err.reason(), "Prodigal Sorcerer has summoning sickness");
    }

    #[test]
    fn test_playable_uses_untapped_lands() {
        let mut data = running();
        put(&mut data, ALICE, "Mountain");
        to_hand(&mut data, ALICE, "Lightning Bolt");
        to_hand(&mut data, ALICE, "Hill Giant");
        assert_eq!(playable_card_indices(&data, ALICE), vec![0]);
        assert!(playable_card_indices(&data, BOB).is_empty());
    }
}
