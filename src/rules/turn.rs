//! Turn progression, priority passing and auto-pass.
//!
//! ## Settling
//!
//! Every operation ends by settling the game: queued interactions are
//! promoted, parked continuations run once nothing is pending, state-based
//! actions are checked, and then the auto-pass loop skips every priority
//! window where the holder has nothing to do.
//!
//! ## Auto-pass
//!
//! Auto-pass never passes over a non-empty stack, and never passes for a
//! player who holds a playable card or has a stop on the current step.
//! When nobody holds priority (untap, cleanup, or everybody passed) the
//! step advances. The loop is bounded by `GameConfig::auto_pass_limit`.

use crate::combat;
use crate::core::{EntityId, GameData, PlayerId, Result};
use crate::effects::{run_effects, Effect, EffectResolver, RunResult};
use crate::interaction::{CardChoicePurpose, Continuation, Interaction, InteractionKind};
use crate::stack;
use crate::triggers;

use super::casting::playable_card_indices;
use super::sba::check_state_based_actions;
use super::step::Step;

/// Move to the next step, or the next turn after cleanup, and perform the
/// new step's turn-based action.
pub fn advance_step(data: &mut GameData) {
    empty_mana_pools(data);
    data.clear_priority_passes();

    match data.step.next() {
        Some(step) => data.step = step,
        None => begin_next_turn(data),
    }
    tracing::info!(turn = data.turn_number, step = %data.step, "step");
    data.push_log(format!("Step: {}", data.step));
    perform_step_action(data);
}

fn begin_next_turn(data: &mut GameData) {
    let count = data.player_count();
    let mut next = data.active_player.next(count);
    for _ in 0..count {
        if !data.players[next].has_lost {
            break;
        }
        next = next.next(count);
    }
    data.turn_number += 1;
    data.active_player = next;
    data.step = Step::Untap;
    for (_, player) in data.players.iter_mut() {
        player.lands_played = 0;
    }
    let line = format!("Turn {} begins. {}'s turn.", data.turn_number, data.player_name(next));
    data.push_log(line);
}

fn empty_mana_pools(data: &mut GameData) {
    let held = data
        .players
        .player_ids()
        .any(|p| data.player_has_static(p, |e| *e == Effect::ManaDoesntEmpty));
    if held {
        return;
    }
    for (_, player) in data.players.iter_mut() {
        player.mana_pool.drain();
    }
}

/// The turn-based action of the current step.
pub fn perform_step_action(data: &mut GameData) {
    match data.step {
        Step::Untap => untap_step(data),
        Step::Upkeep => triggers::upkeep(data),
        Step::Draw => draw_step(data),
        Step::DeclareAttackers => combat::begin_declare_attackers(data),
        Step::DeclareBlockers => combat::begin_declare_blockers(data),
        Step::CombatDamage => {
            if let Err(err) = combat::begin_combat_damage(data) {
                tracing::error!(%err, "combat damage failed");
            }
        }
        Step::EndCombat => combat::end_combat(data),
        Step::EndStep => triggers::end_step(data),
        Step::Cleanup => cleanup_step(data),
        Step::PrecombatMain | Step::BeginCombat | Step::PostcombatMain => {}
    }
}

fn untap_step(data: &mut GameData) {
    let active = data.active_player;
    let held: Vec<bool> = data.players[active]
        .battlefield
        .iter()
        .map(|p| data.has_static(p.id, |e| matches!(e, Effect::DoesntUntap | Effect::EnchantedDoesntUntap)))
        .collect();
    for (permanent, held) in data.players[active].battlefield.iter_mut().zip(held) {
        if !held {
            permanent.untap();
        }
        permanent.summoning_sick = false;
    }
    let line = format!("{} untaps their permanents.", data.player_name(active));
    data.push_log(line);
}

fn draw_step(data: &mut GameData) {
    let active = data.active_player;
    if data.turn_number == 1 && active == data.starting_player {
        let line = format!("{} skips the draw (first turn).", data.player_name(active));
        data.push_log(line);
        return;
    }
    data.draw_card(active);
}

/// "Until end of turn" control changes end.
fn return_borrowed_permanents(data: &mut GameData) {
    let borrowed: Vec<(EntityId, PlayerId)> = data
        .players
        .iter()
        .flat_map(|(_, state)| state.battlefield.iter())
        .filter_map(|p| p.control_reverts_to.map(|owner| (p.id, owner)))
        .collect();
    for (id, controller) in borrowed {
        if let Some(permanent) = data.permanent_mut(id) {
            permanent.control_reverts_to = None;
        }
        data.gain_control(id, controller);
    }
}

fn cleanup_step(data: &mut GameData) {
    let active = data.active_player;
    let hand = data.players[active].hand.len();
    let max = data.config.max_hand_size;
    let unlimited = data.player_has_static(active, |e| *e == Effect::NoMaximumHandSize);
    if hand > max && !unlimited {
        data.interaction.request(Interaction::new(
            active,
            InteractionKind::CardChoice {
                valid_indices: (0..hand).collect(),
                purpose: CardChoicePurpose::CleanupDiscard {
                    remaining: (hand - max) as u32,
                },
            },
        ));
    }

    return_borrowed_permanents(data);
    for (_, player) in data.players.iter_mut() {
        player.prevention_shield = 0;
        for permanent in player.battlefield.iter_mut() {
            permanent.reset_modifiers();
        }
    }
}

/// Pass priority. Once everyone has passed in succession the top of the
/// stack resolves, or the step ends if the stack is empty.
pub fn pass_priority(data: &mut GameData, resolver: &dyn EffectResolver, player: PlayerId) -> Result<()> {
    data.require_priority(player)?;
    tracing::debug!(player = %player, step = %data.step, "pass priority");
    if !data.record_pass(player) {
        return Ok(());
    }
    if data.stack.is_empty() {
        advance_step(data);
        Ok(())
    } else {
        stack::resolve_top(data, resolver)
    }
}

/// Run whatever can run without a player, until someone must act.
pub fn settle(data: &mut GameData, resolver: &dyn EffectResolver) -> Result<()> {
    loop {
        if data.interaction.advance() {
            return Ok(());
        }
        if let Some(continuation) = data.interaction.pop_continuation() {
            run_continuation(data, resolver, continuation)?;
            continue;
        }
        if !data.is_running() {
            return Ok(());
        }
        check_state_based_actions(data);
        if data.interaction.advance() {
            return Ok(());
        }
        auto_pass(data);
        if data.interaction.advance() || data.interaction.is_idle() {
            return Ok(());
        }
    }
}

fn run_continuation(data: &mut GameData, resolver: &dyn EffectResolver, continuation: Continuation) -> Result<()> {
    match continuation {
        Continuation::Resolution {
            entry,
            effects,
            next,
            ctx,
        } => stack::resume_resolution(data, resolver, entry, effects, next, ctx),
        Continuation::Effects { effects, next, ctx } => {
            if let RunResult::Suspended { next } = run_effects(data, resolver, &effects, next, &ctx)? {
                data.interaction.suspend(Continuation::Effects { effects, next, ctx });
            }
            Ok(())
        }
        Continuation::CombatDamage(progress) => combat::run_combat_damage(data, progress),
    }
}

/// Skip priority windows nobody wants.
pub fn auto_pass(data: &mut GameData) {
    let limit = data.config.auto_pass_limit;
    for _ in 0..limit {
        if !data.is_running() || data.interaction.advance() || !data.stack.is_empty() {
            return;
        }
        let Some(holder) = data.priority_holder() else {
            advance_step(data);
            continue;
        };
        if data.players[holder].auto_stops.contains(&data.step)
            || !playable_card_indices(data, holder).is_empty()
        {
            return;
        }
        tracing::debug!(player = %holder, step = %data.step, "auto-pass");
        if data.record_pass(holder) {
            advance_step(data);
        }
    }
    tracing::warn!(limit, turn = data.turn_number, step = %data.step, "auto-pass limit reached");
}

/// Replace a player's stops. Both main phases are always kept.
pub fn set_auto_stops(data: &mut GameData, player: PlayerId, steps: &[Step]) -> Result<()> {
    if !data.players.contains(player) {
        return Err(crate::core::GameError::illegal(format!("{player} is not in this game")));
    }
    let stops = &mut data.players[player].auto_stops;
    stops.clear();
    stops.extend(steps.iter().copied());
    stops.extend([Step::PrecombatMain, Step::PostcombatMain]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::catalog::test_catalog;
    use crate::cards::CardInstance;
    use crate::core::{EntityId, GameConfig, GameStatus};
    use crate::effects::StandardResolver;
    use crate::mana::Color;

    fn running() -> GameData {
        let mut data = GameData::new(GameConfig::default());
        data.add_player("alice", Vec::new());
        data.add_player("bob", Vec::new());
        data.status = GameStatus::Running;
        data.turn_number = 1;
        data
    }

    fn put(data: &mut GameData, player: PlayerId, name: &str) -> EntityId {
        let card = test_catalog().unwrap().get_by_name(name).unwrap();
        let object = data.ids.next_id();
        data.put_onto_battlefield(player, CardInstance::new(object, card, player))
    }

    #[test]
    fn test_turn_rotation() {
        let mut data = running();
        data.step = Step::Cleanup;
        advance_step(&mut data);

        assert_eq!(data.turn_number, 2);
        assert_eq!(data.active_player, PlayerId::new(1));
        assert_eq!(data.step, Step::Untap);
        assert_eq!(data.recent_log(3), vec![
            "Turn 2 begins. bob's turn.",
            "Step: Untap",
            "bob untaps their permanents.",
        ]);
    }

    #[test]
    fn test_untap_respects_doesnt_untap() {
        let mut data = running();
        let bears = put(&mut data, PlayerId::new(0), "Grizzly Bears");
        let colossus = put(&mut data, PlayerId::new(0), "Colossus of Sardia");
        for id in [bears, colossus] {
            data.permanent_mut(id).unwrap().tap();
        }
        data.step = Step::Untap;
        perform_step_action(&mut data);

        assert!(!data.permanent(bears).unwrap().tapped);
        assert!(data.permanent(colossus).unwrap().tapped);
        assert!(!data.permanent(bears).unwrap().summoning_sick);
    }

    #[test]
    fn test_first_turn_draw_skipped() {
        let mut data = running();
        data.step = Step::Upkeep;
        advance_step(&mut data);
        assert!(data.log.iter().any(|l| l == "alice skips the draw (first turn)."));
    }

    #[test]
    fn test_mana_empties_between_steps() {
        let mut data = running();
        data.step = Step::PrecombatMain;
        data.players[PlayerId::new(0)].mana_pool.add(Color::Red, 2);
        advance_step(&mut data);
        assert!(data.players[PlayerId::new(0)].mana_pool.is_empty());

        put(&mut data, PlayerId::new(1), "Upwelling");
        data.players[PlayerId::new(0)].mana_pool.add(Color::Red, 2);
        advance_step(&mut data);
        assert_eq!(data.players[PlayerId::new(0)].mana_pool.total(), 2);
    }

    #[test]
    fn test_cleanup_discard_and_reset() {
        let mut data = running();
        let bears = put(&mut data, PlayerId::new(0), "Grizzly Bears");
        data.permanent_mut(bears).unwrap().power_modifier = 3;
        let card = test_catalog().unwrap().get_by_name("Shock").unwrap();
        for _ in 0..9 {
            let id = data.ids.next_id();
            data.players[PlayerId::new(0)]
                .hand
                .push_back(CardInstance::new(id, card.clone(), PlayerId::new(0)));
        }
        data.step = Step::EndStep;
        advance_step(&mut data);

        assert_eq!(data.effective_power(bears), 2);
        match &data.interaction.current().unwrap().kind {
            InteractionKind::CardChoice { purpose, .. } => {
                assert_eq!(*purpose, CardChoicePurpose::CleanupDiscard { remaining: 2 });
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_cleanup_returns_borrowed_creature() {
        let mut data = running();
        let bears = put(&mut data, PlayerId::new(1), "Grizzly Bears");
        assert_eq!(data.gain_control(bears, PlayerId::new(0)), Some(PlayerId::new(1)));
        data.permanent_mut(bears).unwrap().control_reverts_to = Some(PlayerId::new(1));
        let giant = put(&mut data, PlayerId::new(1), "Hill Giant");
        data.gain_control(giant, PlayerId::new(0));

        data.step = Step::EndStep;
        advance_step(&mut data);

        assert_eq!(data.controller_of(bears), Some(PlayerId::new(1)));
        assert_eq!(data.permanent(bears).unwrap().control_reverts_to, None);
        assert_eq!(data.controller_of(giant), Some(PlayerId::new(0)));
        assert!(data.log.iter().any(|l| l == "bob gains control of Grizzly Bears."));
    }

    #[test]
    fn test_both_pass_resolves_then_clears() {
        let mut data = running();
        data.step = Step::PrecombatMain;
        triggers::fire(
            &mut data,
            triggers::PendingTrigger::new(
                test_catalog().unwrap().get_by_name("Storm Totem").unwrap(),
                PlayerId::new(0),
                vec![Effect::draw(1)],
            ),
        );
        assert_eq!(data.stack.len(), 1);

        pass_priority(&mut data, &StandardResolver, PlayerId::new(0)).unwrap();
        assert_eq!(data.stack.len(), 1);
        assert!(pass_priority(&mut data, &StandardResolver, PlayerId::new(0)).is_err());
        pass_priority(&mut data, &StandardResolver, PlayerId::new(1)).unwrap();
        assert!(data.stack.is_empty());
        assert!(data.priority_passed.is_empty());
        assert_eq!(data.step, Step::PrecombatMain);
    }

    #[test]
    fn test_auto_pass_stops_at_main_phase() {
        let mut data = running();
        data.step = Step::Untap;
        settle(&mut data, &StandardResolver).unwrap();
        assert_eq!(data.step, Step::PrecombatMain);
        assert_eq!(data.priority_holder(), Some(PlayerId::new(0)));
    }

    #[test]
    fn test_set_auto_stops_keeps_mains() {
        let mut data = running();
        set_auto_stops(&mut data, PlayerId::new(1), &[Step::EndStep]).unwrap();
        let stops = &data.players[PlayerId::new(1)].auto_stops;
        assert!(stops.contains(&Step::EndStep));
        assert!(stops.contains(&Step::PrecombatMain));
        assert!(stops.contains(&Step::PostcombatMain));
        assert_eq!(stops.len(), 3);
    }
}
