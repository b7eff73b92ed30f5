use serde::{Deserialize, Serialize};

use super::Color;

/// Floating mana: one non-negative counter per color.
///
/// Pools empty at every step boundary unless a static effect says
/// otherwise.
///
/// ```
/// use mtg_rules_engine::mana::{Color, ManaPool};
///
/// let mut pool = ManaPool::new();
/// pool.add(Color::Green, 3);
/// pool.add(Color::Red, 2);
/// assert_eq!(pool.total(), 5);
/// assert_eq!(pool.to_string(), "{R:2, G:3}");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManaPool {
    counts: [u32; 5],
}

impl ManaPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pool from `(color, amount)` pairs.
    #[must_use]
    pub fn with(amounts: &[(Color, u32)]) -> Self {
        let mut pool = Self::new();
        for &(color, amount) in amounts {
            pool.add(color, amount);
        }
        pool
    }

    #[must_use]
    pub fn get(&self, color: Color) -> u32 {
        self.counts[color.index()]
    }

    pub fn add(&mut self, color: Color, amount: u32) {
        self.counts[color.index()] += amount;
    }

    /// Remove one mana of `color`. Returns `false` if there was none.
    pub fn remove_one(&mut self, color: Color) -> bool {
        let slot = &mut self.counts[color.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// The color with the strictly largest count, earliest in WUBRG order
    /// on ties. `None` when the pool is empty.
    #[must_use]
    pub fn largest(&self) -> Option<Color> {
        let mut best: Option<(Color, u32)> = None;
        for color in Color::ALL {
            let amount = self.get(color);
            if amount > best.map_or(0, |(_, a)| a) {
                best = Some((color, amount));
            }
        }
        best.map(|(color, _)| color)
    }

    pub fn drain(&mut self) {
        self.counts = [0; 5];
    }
}

impl std::fmt::Display for ManaPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = Color::ALL
            .iter()
            .filter(|c| self.get(**c) > 0)
            .map(|c| format!("{}:{}", c.code(), self.get(*c)))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove() {
        let mut pool = ManaPool::new();
        pool.add(Color::Blue, 2);
        assert!(pool.remove_one(Color::Blue));
        assert!(pool.remove_one(Color::Blue));
        assert!(!pool.remove_one(Color::Blue));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_largest_prefers_wubrg_on_tie() {
        let pool = ManaPool::with(&[(Color::Green, 2), (Color::Red, 2)]);
        assert_eq!(pool.largest(), Some(Color::Red));

        let pool = ManaPool::with(&[(Color::Green, 3), (Color::Red, 2)]);
        assert_eq!(pool.largest(), Some(Color::Green));

        assert_eq!(ManaPool::new().largest(), None);
    }

    #[test]
    fn test_drain() {
        let mut pool = ManaPool::with(&[(Color::White, 1), (Color::Black, 4)]);
        pool.drain();
        assert_eq!(pool.total(), 0);
    }

    #[test]
    fn test_display_empty() {
        assert_eq!(ManaPool::new().to_string(), "{}");
    }
}
