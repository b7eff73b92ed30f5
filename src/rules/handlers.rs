//! Answers to pending interactions.
//!
//! Each handler checks that the current interaction is the one it
//! answers and belongs to `player`, validates the choice against the
//! recorded choice set, clears the interaction and applies the answer.
//! Nothing is mutated when validation fails. Parked work is resumed by
//! the caller's `settle`.

use crate::core::{EntityId, GameData, GameError, PlayerId, Result};
use crate::effects::{put_on_bottom, run_effects, EffectResolver, ResolverContext, RunResult, Target};
use crate::interaction::{
    AwaitingInput, CardChoicePurpose, Continuation, Interaction, InteractionKind, MayOrigin,
    PermanentChoicePurpose,
};
use crate::mana::{Color, ManaCost};
use crate::stack;
use crate::zones::ZonePosition;

fn require_index(valid: &[usize], index: usize) -> Result<()> {
    if valid.contains(&index) {
        Ok(())
    } else {
        Err(GameError::invalid_choice(format!("Index {index} is not a valid choice")))
    }
}

pub fn handle_color_chosen(data: &mut GameData, player: PlayerId, color: Color) -> Result<()> {
    let interaction = data.interaction.expect(player, AwaitingInput::ColorChoice)?;
    let InteractionKind::ColorChoice { permanent } = interaction.kind else {
        return Err(GameError::illegal("Not choosing a color"));
    };
    data.interaction.take_current();

    if let Some(chosen) = data.permanent_mut(permanent) {
        chosen.chosen_color = Some(color);
    }
    let line = format!("{} chooses {color}.", data.player_name(player));
    data.push_log(line);
    Ok(())
}

/// A card from the chooser's hand, for a discard.
pub fn handle_card_chosen(data: &mut GameData, player: PlayerId, index: usize) -> Result<()> {
    let interaction = data.interaction.expect(player, AwaitingInput::CardChoice)?;
    let InteractionKind::CardChoice { valid_indices, purpose } = &interaction.kind else {
        return Err(GameError::illegal("Not choosing a card"));
    };
    require_index(valid_indices, index)?;
    let purpose = *purpose;
    data.interaction.take_current();

    data.discard(player, index);
    let (remaining, next) = match purpose {
        CardChoicePurpose::Discard { remaining } => {
            (remaining, CardChoicePurpose::Discard { remaining: remaining.saturating_sub(1) })
        }
        CardChoicePurpose::CleanupDiscard { remaining } => (
            remaining,
            CardChoicePurpose::CleanupDiscard {
                remaining: remaining.saturating_sub(1),
            },
        ),
    };
    let hand = data.players[player].hand.len();
    if remaining > 1 && hand > 0 {
        data.interaction.request(Interaction::new(
            player,
            InteractionKind::CardChoice {
                valid_indices: (0..hand).collect(),
                purpose: next,
            },
        ));
    }
    Ok(())
}

pub fn handle_permanent_chosen(data: &mut GameData, player: PlayerId, id: EntityId) -> Result<()> {
    let interaction = data.interaction.expect(player, AwaitingInput::PermanentChoice)?;
    let InteractionKind::PermanentChoice { valid, purpose } = &interaction.kind else {
        return Err(GameError::illegal("Not choosing a permanent"));
    };
    if !valid.contains(&id) {
        return Err(GameError::invalid_choice(format!("Permanent {id} is not a valid choice")));
    }
    let valid = valid.clone();
    let purpose = purpose.clone();
    data.interaction.take_current();

    let name = data.permanent(id).map(|p| p.name().to_string()).unwrap_or_default();
    match purpose {
        PermanentChoicePurpose::LegendRule { .. } => {
            for other in valid.into_iter().filter(|&other| other != id) {
                let line = format!("{name} is put into its owner's graveyard (legend rule).");
                data.push_log(line);
                data.move_to_graveyard(other);
            }
        }
        PermanentChoicePurpose::ReturnToHand => {
            data.return_to_hand(id);
        }
        PermanentChoicePurpose::Sacrifice => {
            let line = format!("{} sacrifices {}.", data.player_name(player), name);
            data.push_log(line);
            data.move_to_graveyard(id);
        }
        PermanentChoicePurpose::AuraDestination { aura } => {
            let Some(placed) = data.permanent_mut(aura) else {
                return Ok(());
            };
            placed.attached_to = Some(id);
            let line = format!("{} is attached to {}.", placed.name(), name);
            data.push_log(line);
        }
        PermanentChoicePurpose::NewSpellTarget { entry } => {
            if let Some(spell) = data.stack.iter_mut().find(|e| e.id == entry) {
                spell.targets.clear();
                spell.targets.push(Target::Permanent(id));
                let line = format!("{} now targets {}.", spell.description, name);
                data.push_log(line);
            }
        }
    }
    Ok(())
}

/// Up to `max` distinct permanents, each returned to its owner's hand.
pub fn handle_multiple_permanents_chosen(data: &mut GameData, player: PlayerId, ids: &[EntityId]) -> Result<()> {
    let interaction = data.interaction.expect(player, AwaitingInput::MultiPermanentChoice)?;
    let InteractionKind::MultiPermanentChoice { valid, max } = &interaction.kind else {
        return Err(GameError::illegal("Not choosing permanents"));
    };
    if ids.len() > *max {
        return Err(GameError::invalid_choice(format!("Choose at most {max} permanent(s)")));
    }
    for (i, id) in ids.iter().enumerate() {
        if !valid.contains(id) {
            return Err(GameError::invalid_choice(format!("Permanent {id} is not a valid choice")));
        }
        if ids[..i].contains(id) {
            return Err(GameError::invalid_choice("The same permanent was chosen twice"));
        }
    }
    data.interaction.take_current();

    for &id in ids {
        data.return_to_hand(id);
    }
    Ok(())
}

pub fn handle_graveyard_card_chosen(data: &mut GameData, player: PlayerId, index: usize) -> Result<()> {
    let interaction = data.interaction.expect(player, AwaitingInput::GraveyardChoice)?;
    let InteractionKind::GraveyardChoice { valid_indices } = &interaction.kind else {
        return Err(GameError::illegal("Not choosing a graveyard card"));
    };
    require_index(valid_indices, index)?;
    data.interaction.take_current();

    data.return_from_graveyard(player, index);
    Ok(())
}

/// `order` is a permutation of the revealed cards; `order[0]` ends up on
/// top of the group.
pub fn handle_library_cards_reordered(data: &mut GameData, player: PlayerId, order: &[usize]) -> Result<()> {
    let interaction = data.interaction.expect(player, AwaitingInput::LibraryReorder)?;
    let InteractionKind::LibraryReorder { cards, to_bottom } = &interaction.kind else {
        return Err(GameError::illegal("Not reordering a library"));
    };
    if order.len() != cards.len() {
        return Err(GameError::invalid_choice(format!("Order all {} card(s)", cards.len())));
    }
    for (i, index) in order.iter().enumerate() {
        if *index >= cards.len() {
            return Err(GameError::invalid_choice(format!("No revealed card at index {index}")));
        }
        if order[..i].contains(index) {
            return Err(GameError::invalid_choice("The same card was placed twice"));
        }
    }
    let ordered: Vec<EntityId> = order.iter().map(|&i| cards[i]).collect();
    let to_bottom = *to_bottom;
    data.interaction.take_current();

    let library = &mut data.players[player].library;
    let mut pulled = Vec::with_capacity(ordered.len());
    for id in &ordered {
        if let Some(position) = library.iter().position(|c| c.id == *id) {
            pulled.push(library.remove(position));
        }
    }
    if to_bottom {
        for card in pulled {
            data.put_in_library(card, ZonePosition::Bottom);
        }
    } else {
        for card in pulled.into_iter().rev() {
            data.put_in_library(card, ZonePosition::Top);
        }
    }
    let line = if to_bottom {
        format!(
            "{} puts {} cards on the bottom of their library.",
            data.player_name(player),
            ordered.len()
        )
    } else {
        format!("{} reorders the top of their library.", data.player_name(player))
    };
    data.push_log(line);
    Ok(())
}

/// Take the chosen library card, or none. A full search shuffles; a look
/// at the top cards sends the rest to the bottom instead.
pub fn handle_library_card_searched(data: &mut GameData, player: PlayerId, index: Option<usize>) -> Result<()> {
    let interaction = data.interaction.expect(player, AwaitingInput::LibrarySearch)?;
    let InteractionKind::LibrarySearch { valid_indices, looked_at } = &interaction.kind else {
        return Err(GameError::illegal("Not searching a library"));
    };
    if let Some(index) = index {
        require_index(valid_indices, index)?;
    }
    let mut looked_at = looked_at.clone();
    data.interaction.take_current();

    let name = data.player_name(player).to_string();
    let full_search = looked_at.is_empty();
    match index {
        Some(index) => {
            let card = data.players[player].library.remove(index);
            looked_at.retain(|id| *id != card.id);
            let line = if full_search {
                format!("{name} searches their library and puts {} into their hand.", card.name())
            } else {
                format!("{name} reveals {} and puts it into their hand.", card.name())
            };
            data.players[player].hand.push_back(card);
            data.push_log(line);
        }
        None if full_search => data.push_log(format!("{name} searches their library and finds nothing.")),
        None => data.push_log(format!("{name} takes nothing.")),
    }
    if full_search {
        data.shuffle_library(player);
    } else {
        put_on_bottom(data, player, looked_at);
    }
    Ok(())
}

pub fn handle_revealed_hand_card_chosen(data: &mut GameData, player: PlayerId, index: usize) -> Result<()> {
    let interaction = data.interaction.expect(player, AwaitingInput::RevealedHandChoice)?;
    let InteractionKind::RevealedHandChoice { owner, valid_indices } = &interaction.kind else {
        return Err(GameError::illegal("Not choosing from a revealed hand"));
    };
    require_index(valid_indices, index)?;
    let owner = *owner;
    data.interaction.take_current();

    data.discard(owner, index);
    Ok(())
}

pub fn handle_may_ability_chosen(
    data: &mut GameData,
    resolver: &dyn EffectResolver,
    player: PlayerId,
    accept: bool,
) -> Result<()> {
    let interaction = data.interaction.expect(player, AwaitingInput::MayAbility)?;
    let InteractionKind::MayAbility { origin, .. } = &interaction.kind else {
        return Err(GameError::illegal("Not answering a may ability"));
    };
    let origin = origin.clone();

    // A failed payment is an answer, not an error, so the interaction is
    // consumed before anything can fail.
    data.interaction.take_current();
    let name = data.player_name(player).to_string();
    match origin {
        MayOrigin::Trigger(trigger) => {
            if accept {
                let entry = trigger.into_entry(data);
                stack::push_entry(data, entry);
            } else {
                data.push_log(format!("{name} declines."));
            }
        }
        MayOrigin::Resolution { effects } => {
            if !accept {
                data.push_log(format!("{name} declines."));
                return Ok(());
            }
            let ctx = suspended_context(data).unwrap_or_else(|| ResolverContext::new(player, name));
            if let RunResult::Suspended { next } = run_effects(data, resolver, &effects, 0, &ctx)? {
                data.interaction.suspend(Continuation::Effects { effects, next, ctx });
            }
        }
        MayOrigin::CounterUnlessPays { entry, amount } => {
            if !accept {
                stack::counter_entry(data, entry);
                return Ok(());
            }
            let cost = ManaCost::parse(&format!("{{{amount}}}"))?;
            if cost.pay(&mut data.players[player].mana_pool, 0).is_ok() {
                data.push_log(format!("{name} pays {{{amount}}}."));
            } else {
                data.push_log(format!("{name} cannot pay {{{amount}}}."));
                stack::counter_entry(data, entry);
            }
        }
    }
    Ok(())
}

/// The context of the resolution a "may" effect interrupted.
fn suspended_context(data: &mut GameData) -> Option<ResolverContext> {
    match data.interaction.top_continuation_mut()? {
        Continuation::Resolution { ctx, .. } | Continuation::Effects { ctx, .. } => Some(ctx.clone()),
        Continuation::CombatDamage(_) => None,
    }
}
