//! Mana model: colors, costs and pools.
//!
//! - `Color`: the five colors in WUBRG order
//! - `ManaCost`: a parsed cost string (`"{2}{G}"`, `"{X}{R}"`)
//! - `ManaPool`: five non-negative counters, one per color
//!
//! Payment is deterministic: colored requirements come out first, then each
//! point of generic (and X) comes from whichever color currently has the
//! most mana, the earliest color in WUBRG order winning ties.

mod color;
mod cost;
mod pool;

pub use color::Color;
pub use cost::ManaCost;
pub use pool::ManaPool;
