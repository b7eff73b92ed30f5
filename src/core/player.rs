//! Player identification and per-player storage.
//!
//! ## PlayerId
//!
//! Seat index of a player, assigned in join order. The first player to
//! create the game is `PlayerId(0)`.
//!
//! ## PlayerMap
//!
//! Per-player data backed by a `Vec` for O(1) access, indexed by `PlayerId`.
//! Grows as players join; never shrinks.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat index of a player (0-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat after this one, wrapping around the table.
    ///
    /// ```
    /// use mtg_rules_engine::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::new(0).next(2), PlayerId::new(1));
    /// assert_eq!(PlayerId::new(1).next(2), PlayerId::new(0));
    /// ```
    #[must_use]
    pub fn next(self, player_count: usize) -> PlayerId {
        PlayerId(((self.index() + 1) % player_count) as u8)
    }

    /// Active player first, then every other seat in turn order (APNAP).
    ///
    /// ```
    /// use mtg_rules_engine::core::PlayerId;
    ///
    /// let order = PlayerId::apnap_order(PlayerId::new(2), 3);
    /// assert_eq!(order, vec![PlayerId::new(2), PlayerId::new(0), PlayerId::new(1)]);
    /// ```
    #[must_use]
    pub fn apnap_order(active: PlayerId, player_count: usize) -> Vec<PlayerId> {
        let mut order = Vec::with_capacity(player_count);
        let mut seat = active;
        for _ in 0..player_count {
            order.push(seat);
            seat = seat.next(player_count);
        }
        order
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ```
/// use mtg_rules_engine::core::{PlayerId, PlayerMap};
///
/// let mut life: PlayerMap<i32> = PlayerMap::new(2, |_| 20);
/// life[PlayerId::new(1)] -= 3;
/// assert_eq!(life[PlayerId::new(1)], 17);
///
/// let seat = life.push(20);
/// assert_eq!(seat, PlayerId::new(2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8).map(|i| factory(PlayerId(i))).collect();
        Self { data }
    }

    /// A map with no seats yet; players are added with [`PlayerMap::push`].
    #[must_use]
    pub fn empty() -> Self {
        Self { data: Vec::new() }
    }

    /// Seat a new player and return their id.
    pub fn push(&mut self, value: T) -> PlayerId {
        assert!(self.data.len() < 255, "At most 255 players supported");
        self.data.push(value);
        PlayerId((self.data.len() - 1) as u8)
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        player.index() < self.data.len()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs in seat order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p1 = PlayerId::new(1);
        assert_eq!(p1.index(), 1);
        assert_eq!(format!("{}", p1), "Player 1");
    }

    #[test]
    fn test_next_wraps() {
        assert_eq!(PlayerId::new(3).next(4), PlayerId::new(0));
        assert_eq!(PlayerId::new(1).next(4), PlayerId::new(2));
    }

    #[test]
    fn test_apnap_two_player() {
        let order = PlayerId::apnap_order(PlayerId::new(1), 2);
        assert_eq!(order, vec![PlayerId::new(1), PlayerId::new(0)]);
    }

    #[test]
    fn test_player_map_push_and_index() {
        let mut map: PlayerMap<&str> = PlayerMap::empty();
        assert_eq!(map.player_count(), 0);

        let alice = map.push("alice");
        let bob = map.push("bob");

        assert_eq!(alice, PlayerId::new(0));
        assert_eq!(bob, PlayerId::new(1));
        assert_eq!(map[bob], "bob");
        assert!(map.contains(bob));
        assert!(!map.contains(PlayerId::new(2)));
    }

    #[test]
    fn test_player_map_iter() {
        let map: PlayerMap<i32> = PlayerMap::new(3, |p| p.index() as i32);
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs[2], (PlayerId::new(2), &2));
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<i32> = PlayerMap::new(2, |p| p.index() as i32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
