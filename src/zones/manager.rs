//! Zone lookups and movement.
//!
//! All card movement goes through these `GameData` methods so that the
//! one-zone-per-object invariant holds: each method removes the object
//! from where it is before inserting it anywhere else.
//!
//! - Lookups: [`GameData::find_permanent`], [`GameData::find_card`]
//! - Battlefield: entering, leaving to graveyard, hand or exile, and
//!   destruction with indestructible and regeneration handled
//! - Library and hand: drawing, discarding, inserting at a position,
//!   shuffling

use crate::cards::attributes::Keyword;
use crate::cards::{CardInstance, Permanent};
use crate::core::{EntityId, GameData, PlayerId};
use crate::triggers;

use super::zone::{Zone, ZonePosition};

impl GameData {
    /// Controller and battlefield index of a permanent.
    #[must_use]
    pub fn find_permanent(&self, id: EntityId) -> Option<(PlayerId, usize)> {
        self.players
            .iter()
            .find_map(|(player, state)| state.permanent_index(id).map(|index| (player, index)))
    }

    #[must_use]
    pub fn permanent(&self, id: EntityId) -> Option<&Permanent> {
        let (controller, index) = self.find_permanent(id)?;
        self.players[controller].battlefield.get(index)
    }

    pub fn permanent_mut(&mut self, id: EntityId) -> Option<&mut Permanent> {
        let (controller, index) = self.find_permanent(id)?;
        self.players[controller].battlefield.get_mut(index)
    }

    #[must_use]
    pub fn controller_of(&self, id: EntityId) -> Option<PlayerId> {
        self.find_permanent(id).map(|(controller, _)| controller)
    }

    /// Owner, zone and index of a card object outside the battlefield and
    /// stack.
    #[must_use]
    pub fn find_card(&self, id: EntityId) -> Option<(PlayerId, Zone, usize)> {
        for (player, state) in self.players.iter() {
            let zones = [
                (Zone::Library, &state.library),
                (Zone::Hand, &state.hand),
                (Zone::Graveyard, &state.graveyard),
                (Zone::Exile, &state.exile),
            ];
            for (zone, cards) in zones {
                if let Some(index) = cards.iter().position(|c| c.id == id) {
                    return Some((player, zone, index));
                }
            }
        }
        None
    }

    /// Put a card onto the battlefield under `controller`'s control.
    /// The permanent gets a fresh id and enters summoning sick.
    pub fn put_onto_battlefield(&mut self, controller: PlayerId, card: CardInstance) -> EntityId {
        let id = self.ids.next_id();
        let name = card.name().to_string();
        self.players[controller]
            .battlefield
            .push_back(Permanent::new(id, card));

        let player = self.player_name(controller).to_string();
        self.push_log(format!("{name} enters the battlefield under {player}'s control."));
        id
    }

    /// Move a permanent to `controller`'s battlefield. It keeps its id,
    /// leaves combat and is summoning sick for its new controller.
    /// Returns the previous controller, or `None` if nothing changed.
    pub fn gain_control(&mut self, id: EntityId, controller: PlayerId) -> Option<PlayerId> {
        let (previous, index) = self.find_permanent(id)?;
        if previous == controller {
            return None;
        }
        let mut permanent = self.players[previous].battlefield.remove(index);
        permanent.summoning_sick = true;
        permanent.remove_from_combat();
        let name = permanent.name().to_string();
        self.players[controller].battlefield.push_back(permanent);

        let line = format!("{} gains control of {name}.", self.player_name(controller));
        self.push_log(line);
        Some(previous)
    }

    /// Take a permanent off the battlefield. Other permanents that were
    /// blocking it stay marked as blockers.
    pub fn remove_permanent(&mut self, id: EntityId) -> Option<(PlayerId, Permanent)> {
        let (controller, index) = self.find_permanent(id)?;
        let permanent = self.players[controller].battlefield.remove(index);
        Some((controller, permanent))
    }

    /// Move a permanent to its owner's graveyard and fire its death
    /// triggers.
    pub fn move_to_graveyard(&mut self, id: EntityId) -> bool {
        let Some((controller, permanent)) = self.remove_permanent(id) else {
            return false;
        };
        triggers::on_death(self, controller, &permanent);
        let card = permanent.into_card();
        let owner = card.owner;
        self.players[owner].graveyard.push_back(card);
        true
    }

    /// Return a permanent to its owner's hand.
    pub fn return_to_hand(&mut self, id: EntityId) -> bool {
        let Some((_, permanent)) = self.remove_permanent(id) else {
            return false;
        };
        let card = permanent.into_card();
        let owner = card.owner;
        let line = format!("{} returns to {}'s hand.", card.name(), self.player_name(owner));
        self.players[owner].hand.push_back(card);
        self.push_log(line);
        true
    }

    pub fn exile_permanent(&mut self, id: EntityId) -> bool {
        let Some((_, permanent)) = self.remove_permanent(id) else {
            return false;
        };
        let card = permanent.into_card();
        let owner = card.owner;
        self.push_log(format!("{} is exiled.", card.name()));
        self.players[owner].exile.push_back(card);
        true
    }

    /// Destroy a permanent. Indestructible permanents survive; a
    /// regeneration shield is used instead when allowed. Returns whether
    /// the permanent left the battlefield.
    pub fn destroy_permanent(&mut self, id: EntityId, can_regenerate: bool) -> bool {
        if self.permanent(id).is_none() || self.has_keyword(id, Keyword::Indestructible) {
            return false;
        }
        if can_regenerate && self.regenerate(id) {
            return false;
        }
        if let Some(permanent) = self.permanent(id) {
            let line = format!("{} is destroyed.", permanent.name());
            self.push_log(line);
        }
        self.move_to_graveyard(id)
    }

    /// Use one regeneration shield: the creature is tapped, its damage
    /// is removed, and it leaves combat.
    pub fn regenerate(&mut self, id: EntityId) -> bool {
        let Some(permanent) = self.permanent_mut(id) else {
            return false;
        };
        if permanent.regeneration_shields == 0 {
            return false;
        }
        permanent.regeneration_shields -= 1;
        permanent.damage = 0;
        permanent.tap();
        permanent.remove_from_combat();
        let line = format!("{} regenerates.", permanent.name());
        self.push_log(line);
        true
    }

    /// Draw the top card. Drawing from an empty library is logged and
    /// otherwise does nothing.
    pub fn draw_card(&mut self, player: PlayerId) -> bool {
        let name = self.player_name(player).to_string();
        match self.players[player].library.pop_front() {
            Some(card) => {
                self.players[player].hand.push_back(card);
                self.push_log(format!("{name} draws a card."));
                true
            }
            None => {
                self.push_log(format!("{name} has no cards to draw."));
                false
            }
        }
    }

    pub fn draw_cards(&mut self, player: PlayerId, count: usize) -> usize {
        (0..count).filter(|_| self.draw_card(player)).count()
    }

    /// Discard the card at `hand_index` to its owner's graveyard.
    pub fn discard(&mut self, player: PlayerId, hand_index: usize) -> Option<EntityId> {
        if hand_index >= self.players[player].hand.len() {
            return None;
        }
        let card = self.players[player].hand.remove(hand_index);
        let id = card.id;
        let line = format!("{} discards {}.", self.player_name(player), card.name());
        let owner = card.owner;
        self.players[owner].graveyard.push_back(card);
        self.push_log(line);
        Some(id)
    }

    /// Insert a card into its owner's library.
    pub fn put_in_library(&mut self, card: CardInstance, position: ZonePosition) {
        let library = &mut self.players[card.owner].library;
        let index = position.index_in(library.len());
        library.insert(index, card);
    }

    pub fn shuffle_library(&mut self, player: PlayerId) {
        let mut library = std::mem::take(&mut self.players[player].library);
        self.rng.shuffle_vector(&mut library);
        self.players[player].library = library;
    }

    /// Move a card from a player's graveyard to their hand.
    pub fn return_from_graveyard(&mut self, player: PlayerId, index: usize) -> Option<EntityId> {
        if index >= self.players[player].graveyard.len() {
            return None;
        }
        let card = self.players[player].graveyard.remove(index);
        let id = card.id;
        let line = format!("{} returns {} to their hand.", self.player_name(player), card.name());
        self.players[player].hand.push_back(card);
        self.push_log(line);
        Some(id)
    }
}
