//! Dealing damage.
//!
//! Combat and non-combat damage both go through these two methods, which
//! apply, in order: redirection (damage to a player moved onto an
//! enchanted creature), protection, prevention shields, and lifelink.

use serde::{Deserialize, Serialize};

use crate::cards::attributes::Keyword;
use crate::core::{EntityId, GameData, PlayerId};
use crate::mana::Color;

/// Who is dealing damage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageSource {
    pub controller: PlayerId,
    pub name: String,
    pub color: Option<Color>,
    /// The permanent dealing the damage, for lifelink.
    pub permanent: Option<EntityId>,
    pub combat: bool,
}

impl GameData {
    /// Damage `player`. Returns the damage actually dealt to that player
    /// (redirected or prevented damage is not counted).
    pub fn damage_player(&mut self, source: &DamageSource, player: PlayerId, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        if let Some(host) = self.damage_redirect(player) {
            let line = format!(
                "{} damage to {} is dealt to {} instead.",
                amount,
                self.player_name(player),
                self.permanent(host).map_or("", |p| p.name())
            );
            self.push_log(line);
            self.damage_permanent(source, host, amount);
            return 0;
        }

        let shield = &mut self.players[player].prevention_shield;
        let prevented = (*shield).min(amount);
        *shield -= prevented;
        let dealt = amount - prevented;
        if dealt == 0 {
            return 0;
        }

        self.players[player].life -= dealt;
        let name = self.player_name(player).to_string();
        if source.combat {
            self.push_log(format!("{name} takes {dealt} combat damage."));
        } else {
            self.push_log(format!("{} deals {dealt} damage to {name}.", source.name));
        }
        self.apply_lifelink(source, dealt);
        dealt
    }

    /// Mark damage on a permanent. Destruction is left to state-based
    /// actions.
    pub fn damage_permanent(&mut self, source: &DamageSource, id: EntityId, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        if let Some(color) = source.color {
            if self.has_keyword(id, Keyword::ProtectionFrom(color)) {
                return 0;
            }
        }
        let Some(permanent) = self.permanent_mut(id) else {
            return 0;
        };
        let prevented = permanent.prevention_shield.min(amount);
        permanent.prevention_shield -= prevented;
        let dealt = amount - prevented;
        if dealt == 0 {
            return 0;
        }
        permanent.damage += dealt;
        let target = permanent.name().to_string();

        if !source.combat {
            self.push_log(format!("{} deals {dealt} damage to {target}.", source.name));
        }
        self.apply_lifelink(source, dealt);
        dealt
    }

    fn apply_lifelink(&mut self, source: &DamageSource, dealt: i32) {
        let lifelink = source
            .permanent
            .is_some_and(|id| self.has_keyword(id, Keyword::Lifelink));
        if lifelink {
            self.gain_life(source.controller, dealt);
        }
    }
}
