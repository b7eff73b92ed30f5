//! Continuous-effect queries.
//!
//! Static effects are never executed. Other components ask these
//! questions instead: combat asks whether an attacker can't be blocked,
//! the untap step asks whether a permanent doesn't untap, and so on.
//!
//! A permanent's statics come from two places: its own card's `Static`
//! slot, and the `Static` slot of every Aura or Equipment attached to it
//! (the "enchanted creature ..." variants).

use crate::cards::attributes::Keyword;
use crate::cards::Permanent;
use crate::core::{EntityId, GameData, PlayerId};

use super::effect::{Effect, EffectSlot};

impl GameData {
    /// Whether the permanent's own statics include one matching `pred`.
    #[must_use]
    pub fn own_static(&self, id: EntityId, pred: impl Fn(&Effect) -> bool) -> bool {
        self.permanent(id).is_some_and(|permanent| {
            permanent
                .card
                .effects(EffectSlot::Static)
                .iter()
                .any(|effect| !effect.affects_enchanted() && pred(effect))
        })
    }

    /// Whether an attached Aura or Equipment grants a static matching
    /// `pred`.
    #[must_use]
    pub fn enchanted_static(&self, id: EntityId, pred: impl Fn(&Effect) -> bool) -> bool {
        self.attachments(id).any(|aura| {
            aura.card
                .effects(EffectSlot::Static)
                .iter()
                .any(|effect| effect.affects_enchanted() && pred(effect))
        })
    }

    #[must_use]
    pub fn has_static(&self, id: EntityId, pred: impl Fn(&Effect) -> bool) -> bool {
        self.own_static(id, &pred) || self.enchanted_static(id, &pred)
    }

    /// Permanents attached to `id`.
    pub fn attachments(&self, id: EntityId) -> impl Iterator<Item = &Permanent> {
        self.players
            .iter()
            .flat_map(|(_, state)| state.battlefield.iter())
            .filter(move |permanent| permanent.attached_to == Some(id))
    }

    /// Whether any permanent `player` controls carries a static matching
    /// `pred`.
    #[must_use]
    pub fn player_has_static(&self, player: PlayerId, pred: impl Fn(&Effect) -> bool) -> bool {
        self.players[player].battlefield.iter().any(|permanent| {
            permanent
                .card
                .effects(EffectSlot::Static)
                .iter()
                .any(|effect| pred(effect))
        })
    }

    /// Printed keywords, keywords granted until end of turn, and keywords
    /// granted by Auras.
    #[must_use]
    pub fn has_keyword(&self, id: EntityId, keyword: Keyword) -> bool {
        let Some(permanent) = self.permanent(id) else {
            return false;
        };
        permanent.card.has_keyword(keyword)
            || permanent.granted_keywords.contains(&keyword)
            || self.enchanted_static(id, |effect| {
                matches!(effect, Effect::GrantKeywordToEnchanted(k) if *k == keyword)
            })
    }

    #[must_use]
    pub fn effective_power(&self, id: EntityId) -> i32 {
        self.effective_stats(id).0
    }

    #[must_use]
    pub fn effective_toughness(&self, id: EntityId) -> i32 {
        self.effective_stats(id).1
    }

    /// Power and toughness after modifiers, Aura boosts, and anthem
    /// effects.
    #[must_use]
    pub fn effective_stats(&self, id: EntityId) -> (i32, i32) {
        let Some((controller, index)) = self.find_permanent(id) else {
            return (0, 0);
        };
        let permanent = &self.players[controller].battlefield[index];
        let mut power = permanent.card.power.unwrap_or(0) + permanent.power_modifier;
        let mut toughness = permanent.card.toughness.unwrap_or(0) + permanent.toughness_modifier;

        for aura in self.attachments(id) {
            for effect in aura.card.effects(EffectSlot::Static) {
                if let Effect::BoostEnchanted {
                    power: p,
                    toughness: t,
                } = effect
                {
                    power += p;
                    toughness += t;
                }
            }
        }

        if permanent.card.is_creature() {
            for other in self.players[controller].battlefield.iter() {
                for effect in other.card.effects(EffectSlot::Static) {
                    match effect {
                        Effect::BoostOtherCreaturesYouControl {
                            power: p,
                            toughness: t,
                        } if other.id != id => {
                            power += p;
                            toughness += t;
                        }
                        Effect::BoostCreaturesOfChosenColor {
                            power: p,
                            toughness: t,
                        } if other.chosen_color.is_some()
                            && other.chosen_color == permanent.card.color =>
                        {
                            power += p;
                            toughness += t;
                        }
                        _ => {}
                    }
                }
            }
        }

        (power, toughness)
    }

    /// Damage still needed to destroy the creature.
    #[must_use]
    pub fn lethal_damage_remaining(&self, id: EntityId) -> i32 {
        let damage = self.permanent(id).map_or(0, |p| p.damage);
        (self.effective_toughness(id) - damage).max(0)
    }

    /// The creature that receives damage dealt to `player` instead.
    #[must_use]
    pub fn damage_redirect(&self, player: PlayerId) -> Option<EntityId> {
        self.players[player].battlefield.iter().find_map(|aura| {
            let redirects = aura
                .card
                .effects(EffectSlot::Static)
                .contains(&Effect::RedirectPlayerDamageToEnchanted);
            let host = aura.attached_to?;
            (redirects && self.permanent(host).is_some()).then_some(host)
        })
    }

    #[must_use]
    pub fn is_creature(&self, id: EntityId) -> bool {
        self.permanent(id).is_some_and(|p| p.card.is_creature())
    }
}
