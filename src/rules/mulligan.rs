//! Opening hands and the London mulligan.
//!
//! Once the table is full every library is shuffled, a starting player is
//! picked with the game RNG and each player is dealt an opening hand. A
//! mulligan shuffles the hand away and deals a fresh one; after keeping,
//! the player puts one card on the bottom of their library per mulligan
//! taken. The first turn starts when everyone is done.

use crate::core::{GameData, GameError, GameStatus, PlayerId, Result};
use crate::zones::ZonePosition;

use super::step::Step;
use super::turn::perform_step_action;

fn deal_hand(data: &mut GameData, player: PlayerId) {
    data.shuffle_library(player);
    let size = data.config.opening_hand_size;
    let state = &mut data.players[player];
    for _ in 0..size {
        match state.library.pop_front() {
            Some(card) => state.hand.push_back(card),
            None => break,
        }
    }
}

/// Shuffle, pick the starting player and deal every opening hand.
pub fn begin_mulligans(data: &mut GameData) {
    let players: Vec<PlayerId> = data.players.player_ids().collect();
    for &player in &players {
        deal_hand(data, player);
    }
    let first = PlayerId::new(data.rng.gen_index(players.len()) as u8);
    data.starting_player = first;
    data.active_player = first;
    data.status = GameStatus::Mulligan;
    let line = format!("{} will go first.", data.player_name(first));
    data.push_log(line);
    tracing::info!(starting_player = %first, players = players.len(), "mulligans begin");
}

fn require_undecided(data: &GameData, player: PlayerId) -> Result<()> {
    if data.status != GameStatus::Mulligan {
        return Err(GameError::illegal("Not in the mulligan phase"));
    }
    if data.players[player].kept_hand {
        return Err(GameError::illegal("You have already kept your hand"));
    }
    Ok(())
}

pub fn keep_hand(data: &mut GameData, player: PlayerId) -> Result<()> {
    require_undecided(data, player)?;
    let state = &mut data.players[player];
    state.kept_hand = true;
    state.cards_to_bottom = state.mulligans;
    let line = format!("{} keeps their hand.", data.player_name(player));
    data.push_log(line);
    start_if_ready(data);
    Ok(())
}

pub fn mulligan(data: &mut GameData, player: PlayerId) -> Result<()> {
    require_undecided(data, player)?;
    if data.players[player].mulligans >= data.config.max_mulligans {
        return Err(GameError::illegal("No mulligans left"));
    }
    let state = &mut data.players[player];
    let hand = std::mem::take(&mut state.hand);
    state.library.append(hand);
    state.mulligans += 1;
    deal_hand(data, player);
    let line = format!("{} takes a mulligan.", data.player_name(player));
    data.push_log(line);
    Ok(())
}

/// Put the chosen hand cards on the bottom of the library, in the order
/// given.
pub fn bottom_cards(data: &mut GameData, player: PlayerId, indices: &[usize]) -> Result<()> {
    if data.status != GameStatus::Mulligan || !data.players[player].kept_hand {
        return Err(GameError::illegal("Keep your hand before choosing cards to bottom"));
    }
    let owed = data.players[player].cards_to_bottom as usize;
    if owed == 0 {
        return Err(GameError::illegal("No cards to put on the bottom"));
    }
    if indices.len() != owed {
        return Err(GameError::invalid_choice(format!("Choose exactly {owed} card(s)")));
    }
    let hand_len = data.players[player].hand.len();
    for (i, index) in indices.iter().enumerate() {
        if *index >= hand_len {
            return Err(GameError::invalid_choice(format!("No card at hand index {index}")));
        }
        if indices[..i].contains(index) {
            return Err(GameError::invalid_choice("The same card was chosen twice"));
        }
    }

    let cards: Vec<_> = indices
        .iter()
        .map(|&i| data.players[player].hand[i].clone())
        .collect();
    let mut sorted = indices.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    for index in sorted {
        data.players[player].hand.remove(index);
    }
    for card in cards {
        data.put_in_library(card, ZonePosition::Bottom);
    }
    data.players[player].cards_to_bottom = 0;
    let line = format!(
        "{} puts {} card(s) on the bottom of their library.",
        data.player_name(player),
        owed
    );
    data.push_log(line);
    start_if_ready(data);
    Ok(())
}

fn start_if_ready(data: &mut GameData) {
    let ready = data
        .players
        .iter()
        .all(|(_, state)| state.kept_hand && state.cards_to_bottom == 0);
    if !ready {
        return;
    }
    data.status = GameStatus::Running;
    data.turn_number = 1;
    data.active_player = data.starting_player;
    data.step = Step::Untap;
    data.clear_priority_passes();
    let line = format!("Turn 1 begins. {}'s turn.", data.player_name(data.starting_player));
    data.push_log(line);
    data.push_log(format!("Step: {}", Step::Untap));
    tracing::info!(starting_player = %data.starting_player, "game started");
    perform_step_action(data);
}
