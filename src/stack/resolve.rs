//! Pushing, resolving and countering stack entries.
//!
//! ## Resolution
//!
//! 1. The top entry is popped and every recorded target is rechecked.
//!    If any target has become illegal the entry fizzles: nothing happens
//!    except the spell moving to its owner's graveyard.
//! 2. Permanent spells enter the battlefield (Auras attached to their
//!    target) and their enter-the-battlefield triggers fire. A creature
//!    spell's target belongs to its trigger, so creature spells never
//!    fizzle.
//! 3. Other entries run their effects in order. An effect waiting on a
//!    player parks the rest of the list as a continuation, and the entry
//!    finishes when that continuation does.

use crate::cards::CardInstance;
use crate::core::{GameData, Result};
use crate::effects::{
    is_legal_target, run_effects, Effect, EffectResolver, ResolverContext, RunResult, Target,
    TargetSource,
};
use crate::interaction::Continuation;
use crate::triggers;

use super::entry::{StackEntry, StackEntryId, StackEntryType};

/// Allocate an id for a new stack entry.
pub fn next_stack_id(data: &mut GameData) -> StackEntryId {
    StackEntryId::new(data.ids.next_raw())
}

/// Put an entry on top of the stack. Any recorded passes are forgotten.
pub fn push_entry(data: &mut GameData, entry: StackEntry) {
    tracing::debug!(id = %entry.id, description = %entry.description, "stack push");
    data.stack.push_back(entry);
    data.clear_priority_passes();
}

/// Whether any of the entry's targets is no longer legal.
#[must_use]
pub fn fizzles(data: &GameData, entry: &StackEntry) -> bool {
    if entry.entry_type == StackEntryType::CreatureSpell || entry.targets.is_empty() {
        return false;
    }
    let Some(spec) = &entry.target_spec else {
        return false;
    };
    let source = TargetSource {
        controller: entry.controller,
        color: entry.card.color,
        permanent: entry.source_permanent,
    };
    entry
        .targets
        .iter()
        .any(|target| !is_legal_target(data, spec, target, &source))
}

/// Resolve the top of the stack.
pub fn resolve_top(data: &mut GameData, resolver: &dyn EffectResolver) -> Result<()> {
    let Some(entry) = data.stack.pop_back() else {
        return Ok(());
    };
    data.clear_priority_passes();

    if fizzles(data, &entry) {
        tracing::info!(id = %entry.id, description = %entry.description, "fizzled");
        data.push_log(format!("{} fizzles (illegal target).", entry.description));
        finish_resolution(data, entry);
        return Ok(());
    }

    tracing::info!(id = %entry.id, description = %entry.description, "resolving");
    data.push_log(format!("{} resolves.", entry.description));

    if entry.entry_type.is_permanent_spell() {
        enter_battlefield(data, entry);
        return Ok(());
    }

    let ctx = ResolverContext::from_entry(&entry);
    let effects = entry.effects.clone();
    match run_effects(data, resolver, &effects, 0, &ctx)? {
        RunResult::Completed => finish_resolution(data, entry),
        RunResult::Suspended { next } => data.interaction.suspend(Continuation::Resolution {
            entry,
            effects,
            next,
            ctx,
        }),
    }
    Ok(())
}

/// Pick up a suspended resolution where it stopped.
pub fn resume_resolution(
    data: &mut GameData,
    resolver: &dyn EffectResolver,
    entry: StackEntry,
    effects: Vec<Effect>,
    next: usize,
    ctx: ResolverContext,
) -> Result<()> {
    match run_effects(data, resolver, &effects, next, &ctx)? {
        RunResult::Completed => finish_resolution(data, entry),
        RunResult::Suspended { next } => data.interaction.suspend(Continuation::Resolution {
            entry,
            effects,
            next,
            ctx,
        }),
    }
    Ok(())
}

/// Move a resolved or fizzled instant or sorcery to its owner's
/// graveyard. Copies and abilities simply cease to exist.
pub fn finish_resolution(data: &mut GameData, entry: StackEntry) {
    if !entry.entry_type.is_spell() || entry.is_copy {
        return;
    }
    let id = entry.card_object.unwrap_or_else(|| data.ids.next_id());
    data.players[entry.owner]
        .graveyard
        .push_back(CardInstance::new(id, entry.card, entry.owner));
}

/// Remove an entry from the stack without resolving it.
pub fn counter_entry(data: &mut GameData, id: StackEntryId) -> bool {
    let Some(index) = data.stack.iter().position(|e| e.id == id) else {
        return false;
    };
    let entry = data.stack.remove(index);
    data.push_log(format!("{} is countered.", entry.description));
    finish_resolution(data, entry);
    true
}

fn enter_battlefield(data: &mut GameData, entry: StackEntry) {
    let object = entry.card_object.unwrap_or_else(|| data.ids.next_id());
    let card = CardInstance::new(object, entry.card.clone(), entry.owner);
    let id = data.put_onto_battlefield(entry.controller, card);

    let host = if entry.card.is_aura() {
        entry.targets.iter().find_map(Target::as_permanent)
    } else {
        None
    };
    if let Some(host) = host {
        if let Some(aura) = data.permanent_mut(id) {
            aura.attached_to = Some(host);
        }
    }

    // Only a creature's trigger rechecks the target it was cast with.
    let spec = if entry.entry_type == StackEntryType::CreatureSpell {
        entry.target_spec.clone()
    } else {
        None
    };
    triggers::on_enter_battlefield(data, entry.controller, id, &entry.targets, spec);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cards::catalog::test_catalog;
    use crate::cards::Card;
    use crate::core::{EntityId, GameConfig, PlayerId};
    use crate::effects::StandardResolver;

    fn board() -> GameData {
        let mut data = GameData::new(GameConfig::default());
        data.add_player("alice", Vec::new());
        data.add_player("bob", Vec::new());
        data
    }

    fn card(name: &str) -> Arc<Card> {
        test_catalog().unwrap().get_by_name(name).unwrap()
    }

    fn put(data: &mut GameData, player: PlayerId, name: &str) -> EntityId {
        let object = data.ids.next_id();
        data.put_onto_battlefield(player, CardInstance::new(object, card(name), player))
    }

    fn spell(data: &mut GameData, name: &str, controller: PlayerId, targets: &[Target]) -> StackEntry {
        let card = card(name);
        let id = next_stack_id(data);
        let entry_type = StackEntryType::for_spell(card.card_type).unwrap();
        let effects = card.effects(crate::effects::EffectSlot::Spell).to_vec();
        let spec = card.target.clone();
        let object = data.ids.next_id();
        let mut entry = StackEntry::new(id, entry_type, card, controller, effects)
            .with_targets(targets.iter().copied())
            .with_target_spec(spec);
        entry.card_object = Some(object);
        entry
    }

    #[test]
    fn test_push_clears_passes() {
        let mut data = board();
        data.priority_passed.insert(PlayerId::new(0));
        let entry = spell(&mut data, "Divination", PlayerId::new(0), &[]);
        push_entry(&mut data, entry);
        assert!(data.priority_passed.is_empty());
        assert_eq!(data.stack.len(), 1);
    }

    #[test]
    fn test_fizzle_when_target_gone() {
        let mut data = board();
        let alice = PlayerId::new(0);
        let bears = put(&mut data, PlayerId::new(1), "Grizzly Bears");
        let entry = spell(&mut data, "Terror", alice, &[Target::Permanent(bears)]);
        push_entry(&mut data, entry);

        data.return_to_hand(bears);
        resolve_top(&mut data, &StandardResolver).unwrap();

        assert!(data.stack.is_empty());
        assert_eq!(data.players[PlayerId::new(1)].hand.len(), 1);
        assert_eq!(data.players[alice].graveyard.len(), 1);
        assert!(data.log.iter().any(|l| l == "Terror fizzles (illegal target)."));
    }

    #[test]
    fn test_spell_resolves_to_graveyard() {
        let mut data = board();
        let alice = PlayerId::new(0);
        let entry = spell(&mut data, "Lightning Bolt", alice, &[Target::Player(PlayerId::new(1))]);
        push_entry(&mut data, entry);
        resolve_top(&mut data, &StandardResolver).unwrap();

        assert_eq!(data.players[PlayerId::new(1)].life, 17);
        assert_eq!(data.players[alice].graveyard.len(), 1);
        assert!(data.log.iter().any(|l| l == "Lightning Bolt resolves."));
    }

    #[test]
    fn test_aura_attaches() {
        let mut data = board();
        let alice = PlayerId::new(0);
        let bears = put(&mut data, alice, "Grizzly Bears");
        let entry = spell(&mut data, "Holy Strength", alice, &[Target::Permanent(bears)]);
        push_entry(&mut data, entry);
        resolve_top(&mut data, &StandardResolver).unwrap();

        let aura = data.players[alice].battlefield.last().unwrap();
        assert_eq!(aura.attached_to, Some(bears));
        assert_eq!(data.effective_stats(bears), (3, 4));
    }

    #[test]
    fn test_creature_spell_never_fizzles() {
        let mut data = board();
        let alice = PlayerId::new(0);
        let bears = put(&mut data, PlayerId::new(1), "Grizzly Bears");
        let entry = spell(&mut data, "Man-o'-War", alice, &[Target::Permanent(bears)]);
        push_entry(&mut data, entry);
        data.return_to_hand(bears);

        resolve_top(&mut data, &StandardResolver).unwrap();
        assert_eq!(data.players[alice].battlefield.len(), 1);
        assert_eq!(data.stack.len(), 1);

        resolve_top(&mut data, &StandardResolver).unwrap();
        assert!(data
            .log
            .iter()
            .any(|l| l == "Man-o'-War's triggered ability fizzles (illegal target)."));
    }

    #[test]
    fn test_counter_entry() {
        let mut data = board();
        let entry = spell(&mut data, "Divination", PlayerId::new(1), &[]);
        let id = entry.id;
        push_entry(&mut data, entry);

        assert!(counter_entry(&mut data, id));
        assert!(data.stack.is_empty());
        assert_eq!(data.players[PlayerId::new(1)].graveyard.len(), 1);
        assert!(!counter_entry(&mut data, id));
    }

    #[test]
    fn test_copy_goes_nowhere() {
        let mut data = board();
        let entry = spell(&mut data, "Lightning Bolt", PlayerId::new(0), &[Target::Player(PlayerId::new(1))]);
        let copy = entry.copy_as(next_stack_id(&mut data), PlayerId::new(0));
        push_entry(&mut data, copy);
        resolve_top(&mut data, &StandardResolver).unwrap();

        assert_eq!(data.players[PlayerId::new(1)].life, 17);
        assert!(data.players[PlayerId::new(0)].graveyard.is_empty());
    }
}
