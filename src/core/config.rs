//! Game configuration.
//!
//! A `GameConfig` fixes the table size and the numeric constants of a
//! match: life totals, hand sizes, the mulligan cap, default auto-stops and
//! the RNG seed. It can be built in code with the `with_*` methods or read
//! from TOML:
//!
//! ```
//! use mtg_rules_engine::core::GameConfig;
//!
//! let config = GameConfig::from_toml_str(r#"
//!     starting_life = 30
//!     seed = 99
//! "#).unwrap();
//!
//! assert_eq!(config.starting_life, 30);
//! assert_eq!(config.max_hand_size, 7);
//! ```

use serde::{Deserialize, Serialize};

use super::error::{GameError, Result};
use crate::rules::Step;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Seats to fill before the mulligan phase begins.
    pub player_count: usize,

    pub starting_life: i32,

    pub opening_hand_size: usize,

    /// The active player discards down to this at cleanup.
    pub max_hand_size: usize,

    pub max_mulligans: u32,

    /// Steps where priority is always offered. Both main phases are
    /// added regardless.
    pub default_auto_stops: Vec<Step>,

    pub seed: u64,

    /// Upper bound on auto-pass iterations per operation.
    pub auto_pass_limit: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            starting_life: 20,
            opening_hand_size: 7,
            max_hand_size: 7,
            max_mulligans: 7,
            default_auto_stops: vec![Step::PrecombatMain, Step::PostcombatMain],
            seed: 0,
            auto_pass_limit: 100,
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: GameConfig =
            toml::from_str(source).map_err(|e| GameError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(2..=4).contains(&self.player_count) {
            return Err(GameError::Config(format!(
                "player_count must be between 2 and 4, got {}",
                self.player_count
            )));
        }
        if self.starting_life <= 0 {
            return Err(GameError::Config("starting_life must be positive".into()));
        }
        if self.auto_pass_limit == 0 {
            return Err(GameError::Config("auto_pass_limit must be positive".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_player_count(mut self, player_count: usize) -> Self {
        self.player_count = player_count;
        self
    }

    #[must_use]
    pub fn with_starting_life(mut self, life: i32) -> Self {
        self.starting_life = life;
        self
    }

    #[must_use]
    pub fn with_auto_stops(mut self, stops: Vec<Step>) -> Self {
        self.default_auto_stops = stops;
        self
    }
}
