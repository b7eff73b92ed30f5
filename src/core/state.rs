//! Game state.
//!
//! ## GameData
//!
//! The root aggregate of one match:
//! - per-player zones, mana pool, life total and turn bookkeeping
//! - the shared stack, game log and action history
//! - the current step, turn number, active player and priority passes
//! - the pending interaction, the id allocator and the RNG
//!
//! All collections are `im` persistent structures, so cloning a whole
//! `GameData` is O(1). The `Game` facade relies on this to make every
//! operation transactional: it works on a clone and commits only on
//! success.
//!
//! ## PlayerState
//!
//! Everything owned by one seat. A permanent's controller's battlefield
//! list is the only place that permanent exists.

use std::collections::BTreeSet;
use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::config::GameConfig;
use super::entity::{EntityAllocator, EntityId};
use super::error::{GameError, Result};
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{Card, CardInstance, Permanent};
use crate::interaction::InteractionState;
use crate::mana::ManaPool;
use crate::rules::Step;
use crate::stack::StackEntry;

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    WaitingForPlayers,
    Mulligan,
    Running,
    /// `winner` is `None` on a draw.
    Finished { winner: Option<PlayerId> },
}

/// Everything owned by one seat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub life: i32,

    /// Top of library first.
    pub library: Vector<CardInstance>,
    pub hand: Vector<CardInstance>,
    pub graveyard: Vector<CardInstance>,
    pub exile: Vector<CardInstance>,
    pub battlefield: Vector<Permanent>,

    pub mana_pool: ManaPool,
    /// Steps where this player is always offered priority.
    pub auto_stops: BTreeSet<Step>,
    pub lands_played: u32,
    /// Damage prevented before it reduces life.
    pub prevention_shield: i32,

    pub mulligans: u32,
    pub kept_hand: bool,
    /// Cards still owed to the bottom of the library after keeping.
    pub cards_to_bottom: u32,
    pub has_lost: bool,
}

impl PlayerState {
    #[must_use]
    pub fn new(name: impl Into<String>, life: i32, auto_stops: BTreeSet<Step>) -> Self {
        Self {
            name: name.into(),
            life,
            library: Vector::new(),
            hand: Vector::new(),
            graveyard: Vector::new(),
            exile: Vector::new(),
            battlefield: Vector::new(),
            mana_pool: ManaPool::new(),
            auto_stops,
            lands_played: 0,
            prevention_shield: 0,
            mulligans: 0,
            kept_hand: false,
            cards_to_bottom: 0,
            has_lost: false,
        }
    }

    /// Index of a permanent on this player's battlefield.
    #[must_use]
    pub fn permanent_index(&self, id: EntityId) -> Option<usize> {
        self.battlefield.iter().position(|p| p.id == id)
    }
}

/// Root aggregate of one match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameData {
    pub config: GameConfig,
    pub status: GameStatus,
    pub players: PlayerMap<PlayerState>,

    /// Bottom first; the last entry is the top of the stack.
    pub stack: Vector<StackEntry>,
    pub log: Vector<String>,
    pub history: Vector<ActionRecord>,

    pub step: Step,
    pub turn_number: u32,
    pub active_player: PlayerId,
    pub starting_player: PlayerId,
    /// Players who passed since the last state change.
    pub priority_passed: BTreeSet<PlayerId>,

    pub interaction: InteractionState,
    pub ids: EntityAllocator,
    pub rng: GameRng,
}

impl GameData {
    /// An empty table waiting for players.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            config,
            status: GameStatus::WaitingForPlayers,
            players: PlayerMap::empty(),
            stack: Vector::new(),
            log: Vector::new(),
            history: Vector::new(),
            step: Step::Untap,
            turn_number: 0,
            active_player: PlayerId::new(0),
            starting_player: PlayerId::new(0),
            priority_passed: BTreeSet::new(),
            interaction: InteractionState::default(),
            ids: EntityAllocator::default(),
            rng,
        }
    }

    /// Seat a player with their deck as an unshuffled library.
    pub fn add_player(&mut self, name: impl Into<String>, deck: Vec<Arc<Card>>) -> PlayerId {
        let seat = PlayerId::new(self.players.player_count() as u8);
        let mut stops: BTreeSet<Step> = self.config.default_auto_stops.iter().copied().collect();
        stops.extend([Step::PrecombatMain, Step::PostcombatMain]);

        let mut player = PlayerState::new(name, self.config.starting_life, stops);
        for card in deck {
            player.library.push_back(CardInstance::new(self.ids.next_id(), card, seat));
        }
        self.players.push(player)
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    #[must_use]
    pub fn player_name(&self, player: PlayerId) -> &str {
        &self.players[player].name
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn require_running(&self) -> Result<()> {
        if self.is_running() {
            Ok(())
        } else {
            Err(GameError::GameNotRunning)
        }
    }

    /// The player attacked by the active player: the next seat still in
    /// the game.
    #[must_use]
    pub fn defending_player(&self) -> PlayerId {
        self.opponents(self.active_player)
            .into_iter()
            .next()
            .unwrap_or(self.active_player)
    }

    /// Every other player still in the game, in turn order after `player`.
    #[must_use]
    pub fn opponents(&self, player: PlayerId) -> Vec<PlayerId> {
        PlayerId::apnap_order(player, self.player_count())
            .into_iter()
            .skip(1)
            .filter(|p| !self.players[*p].has_lost)
            .collect()
    }

    /// Players still in the game, active player first.
    #[must_use]
    pub fn apnap_order(&self) -> Vec<PlayerId> {
        PlayerId::apnap_order(self.active_player, self.player_count())
            .into_iter()
            .filter(|p| !self.players[*p].has_lost)
            .collect()
    }

    /// Append a narration line to the game log.
    pub fn push_log(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::debug!(target: "game_log", "{line}");
        self.log.push_back(line);
    }

    /// The last `n` log lines, oldest first.
    #[must_use]
    pub fn recent_log(&self, n: usize) -> Vec<&str> {
        let skip = self.log.len().saturating_sub(n);
        self.log.iter().skip(skip).map(String::as_str).collect()
    }

    /// Any passed priority is forgotten after a state change.
    pub fn clear_priority_passes(&mut self) {
        self.priority_passed.clear();
    }

    pub fn gain_life(&mut self, player: PlayerId, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.players[player].life += amount;
        let name = self.player_name(player).to_string();
        self.push_log(format!("{name} gains {amount} life."));
    }

    pub fn lose_life(&mut self, player: PlayerId, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.players[player].life -= amount;
        let name = self.player_name(player).to_string();
        self.push_log(format!("{name} loses {amount} life."));
    }

    /// Serialize the whole match to a compact binary snapshot.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| GameError::Config(e.to_string()))
    }

    pub fn restore(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| GameError::Config(e.to_string()))
    }
}
