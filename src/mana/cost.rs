use serde::{Deserialize, Serialize};

use super::{Color, ManaPool};
use crate::core::{GameError, Result};

/// A parsed mana cost.
///
/// Parsed once from the catalog's cost string. Each `{...}` group is one
/// symbol: a color code adds a colored requirement, a number adds generic
/// cost, and `X` marks a variable cost whose value is chosen on casting.
/// The empty string is a valid, free cost.
///
/// ```
/// use mtg_rules_engine::mana::{Color, ManaCost, ManaPool};
///
/// let cost = ManaCost::parse("{2}{G}").unwrap();
/// assert_eq!(cost.mana_value(), 3);
///
/// let mut pool = ManaPool::with(&[(Color::Green, 3), (Color::Red, 2)]);
/// assert!(cost.can_pay(&pool, 0));
/// cost.pay(&mut pool, 0).unwrap();
/// assert_eq!(pool.get(Color::Green), 1);
/// assert_eq!(pool.get(Color::Red), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManaCost {
    colored: [u32; 5],
    generic: u32,
    has_x: bool,
}

impl ManaCost {
    /// Parse a cost string such as `"{X}{R}{R}"`.
    pub fn parse(source: &str) -> Result<Self> {
        let mut cost = ManaCost::default();
        let mut rest = source;

        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| GameError::illegal(format!("Unclosed mana symbol in {source:?}")))?;
            let symbol = &after[..close];

            if symbol == "X" {
                cost.has_x = true;
            } else if let Some(color) = Color::from_code(symbol) {
                cost.colored[color.index()] += 1;
            } else {
                let amount: u32 = symbol.parse().map_err(|_| {
                    GameError::illegal(format!("Unknown mana symbol {{{symbol}}} in {source:?}"))
                })?;
                cost.generic = cost.generic.checked_add(amount).ok_or_else(|| {
                    GameError::illegal(format!("Generic cost too large in {source:?}"))
                })?;
            }

            rest = &after[close + 1..];
        }

        Ok(cost)
    }

    /// A cost with no symbols at all.
    #[must_use]
    pub fn free() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn colored(&self, color: Color) -> u32 {
        self.colored[color.index()]
    }

    #[must_use]
    pub fn colored_total(&self) -> u32 {
        self.colored.iter().sum()
    }

    #[must_use]
    pub fn generic(&self) -> u32 {
        self.generic
    }

    #[must_use]
    pub fn has_x(&self) -> bool {
        self.has_x
    }

    /// Converted cost, counting X as zero.
    #[must_use]
    pub fn mana_value(&self) -> u32 {
        self.generic.saturating_add(self.colored_total())
    }

    /// Generic plus X, or an error when the sum does not fit.
    fn generic_due(&self, x_value: u32) -> Result<u32> {
        self.generic
            .checked_add(x_value)
            .ok_or_else(|| GameError::illegal(format!("X = {x_value} is too large")))
    }

    /// Every colored requirement is available and what is left over covers
    /// generic plus X.
    #[must_use]
    pub fn can_pay(&self, pool: &ManaPool, x_value: u32) -> bool {
        let colored_ok = Color::ALL
            .iter()
            .all(|&color| pool.get(color) >= self.colored(color));
        if !colored_ok {
            return false;
        }
        match self.generic_due(x_value) {
            Ok(due) => pool.total() - self.colored_total() >= due,
            Err(_) => false,
        }
    }

    /// Deduct this cost from `pool`.
    ///
    /// Colored requirements are removed first. Each remaining generic or X
    /// point then comes from the color with the largest count, the earliest
    /// color in WUBRG order winning ties. Fails without touching the pool
    /// if the cost is unaffordable or X overflows.
    pub fn pay(&self, pool: &mut ManaPool, x_value: u32) -> Result<()> {
        let due = self.generic_due(x_value)?;
        if !self.can_pay(pool, x_value) {
            return Err(GameError::InsufficientMana);
        }

        for color in Color::ALL {
            for _ in 0..self.colored(color) {
                pool.remove_one(color);
            }
        }

        for _ in 0..due {
            match pool.largest() {
                Some(color) => {
                    pool.remove_one(color);
                }
                None => break,
            }
        }

        Ok(())
    }
}

impl std::str::FromStr for ManaCost {
    type Err = GameError;

    fn from_str(source: &str) -> Result<Self> {
        Self::parse(source)
    }
}

impl std::fmt::Display for ManaCost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.has_x {
            f.write_str("{X}")?;
        }
        if self.generic > 0 {
            write!(f, "{{{}}}", self.generic)?;
        }
        for color in Color::ALL {
            for _ in 0..self.colored(color) {
                write!(f, "{{{}}}", color.code())?;
            }
        }
        Ok(())
    }
}
