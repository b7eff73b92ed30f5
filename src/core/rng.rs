//! Deterministic random number generation.
//!
//! The only randomness in a game is library shuffling and the choice of
//! starting player. Both draw from one seeded ChaCha8 stream stored in the
//! game state, so a game replayed from the same seed and the same actions
//! reaches the same state.
//!
//! ```
//! use mtg_rules_engine::core::GameRng;
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! let mut deck_a = vec![1, 2, 3, 4, 5];
//! let mut deck_b = deck_a.clone();
//! a.shuffle(&mut deck_a);
//! b.shuffle(&mut deck_b);
//! assert_eq!(deck_a, deck_b);
//! ```

use im::Vector;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seeded game RNG. Serializes as its [`GameRngState`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "GameRngState", from = "GameRngState")]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn gen_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Shuffle a persistent vector (libraries are stored as `im::Vector`).
    pub fn shuffle_vector<T: Clone>(&mut self, cards: &mut Vector<T>) {
        let mut items: Vec<T> = cards.iter().cloned().collect();
        self.shuffle(&mut items);
        *cards = items.into_iter().collect();
    }

    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG checkpoint: seed plus ChaCha8 word position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    pub word_pos: u128,
}

impl From<GameRng> for GameRngState {
    fn from(rng: GameRng) -> Self {
        rng.state()
    }
}

impl From<GameRngState> for GameRng {
    fn from(state: GameRngState) -> Self {
        GameRng::from_state(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_index(1000), rng2.gen_index(1000));
        }
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = GameRng::new(42);
        let mut data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let original = data.clone();

        rng.shuffle(&mut data);
        assert_ne!(data, original);

        data.sort_unstable();
        assert_eq!(data, original);
    }

    #[test]
    fn test_shuffle_vector() {
        let mut rng = GameRng::new(3);
        let mut cards: Vector<u32> = (0..20).collect();
        rng.shuffle_vector(&mut cards);

        let mut sorted: Vec<u32> = cards.iter().copied().collect();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_state_round_trip_continues_sequence() {
        let mut rng = GameRng::new(42);
        for _ in 0..50 {
            rng.gen_index(1000);
        }

        let json = serde_json::to_string(&rng).unwrap();
        let expected: Vec<_> = (0..10).map(|_| rng.gen_index(1000)).collect();

        let mut restored: GameRng = serde_json::from_str(&json).unwrap();
        let actual: Vec<_> = (0..10).map(|_| restored.gen_index(1000)).collect();
        assert_eq!(expected, actual);
    }
}
