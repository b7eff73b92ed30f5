//! Attacker and blocker declaration.
//!
//! Both declarations are interactions raised by the turn engine when the
//! step begins: the active player answers the attacker declaration, the
//! defending player the blocker declaration. Indices refer to the
//! declaring player's battlefield (attacker indices always to the active
//! player's).

use rustc_hash::FxHashMap;

use crate::cards::attributes::{CardType, Keyword};
use crate::core::{EntityId, GameData, GameError, PlayerId, Result};
use crate::effects::Effect;
use crate::interaction::{AwaitingInput, Interaction, InteractionKind};
use crate::mana::Color;

const LANDWALK: [(Keyword, &str); 5] = [
    (Keyword::Plainswalk, "Plains"),
    (Keyword::Islandwalk, "Island"),
    (Keyword::Swampwalk, "Swamp"),
    (Keyword::Mountainwalk, "Mountain"),
    (Keyword::Forestwalk, "Forest"),
];

impl GameData {
    /// Untapped, not summoning sick (or hasty), and not restricted.
    #[must_use]
    pub fn can_attack(&self, id: EntityId) -> bool {
        let Some(permanent) = self.permanent(id) else {
            return false;
        };
        permanent.card.is_creature()
            && !permanent.tapped
            && (!permanent.summoning_sick || self.has_keyword(id, Keyword::Haste))
            && !self.has_keyword(id, Keyword::Defender)
            && !self.has_static(id, |e| {
                matches!(e, Effect::CantAttack | Effect::EnchantedCantAttackOrBlock)
            })
    }

    /// Able to block at all, ignoring evasion.
    #[must_use]
    pub fn can_block_any(&self, id: EntityId) -> bool {
        let Some(permanent) = self.permanent(id) else {
            return false;
        };
        permanent.card.is_creature()
            && !permanent.tapped
            && !self.has_static(id, |e| {
                matches!(e, Effect::CantBlock | Effect::EnchantedCantAttackOrBlock)
            })
    }

    /// Whether `blocker` may block `attacker`, evasion included.
    #[must_use]
    pub fn can_block(&self, blocker: EntityId, attacker: EntityId) -> bool {
        if !self.can_block_any(blocker) {
            return false;
        }
        let (Some(b), Some(a)) = (self.permanent(blocker), self.permanent(attacker)) else {
            return false;
        };
        if !a.attacking || self.own_static(attacker, |e| *e == Effect::CantBeBlocked) {
            return false;
        }

        let flying = self.has_keyword(attacker, Keyword::Flying);
        if flying
            && !self.has_keyword(blocker, Keyword::Flying)
            && !self.has_keyword(blocker, Keyword::Reach)
        {
            return false;
        }
        if !flying && self.own_static(blocker, |e| *e == Effect::CanBlockOnlyFlyers) {
            return false;
        }

        let artifact = b.card.color.is_none() || b.card.card_type == CardType::Artifact;
        if self.has_keyword(attacker, Keyword::Fear) && !artifact && b.card.color != Some(Color::Black) {
            return false;
        }
        if self.has_keyword(attacker, Keyword::Intimidate)
            && !artifact
            && (a.card.color.is_none() || b.card.color != a.card.color)
        {
            return false;
        }
        let subtype_restricted = self.own_static(attacker, |e| {
            matches!(e, Effect::CantBeBlockedBySubtype(subtype) if b.card.has_subtype(subtype))
        });
        if subtype_restricted {
            return false;
        }
        if let Some(color) = b.card.color {
            if self.has_keyword(attacker, Keyword::ProtectionFrom(color)) {
                return false;
            }
        }

        let Some(defender) = self.controller_of(blocker) else {
            return false;
        };
        !LANDWALK.iter().any(|(keyword, land)| {
            self.has_keyword(attacker, *keyword)
                && self.players[defender]
                    .battlefield
                    .iter()
                    .any(|p| p.card.is_land() && p.card.has_subtype(land))
        })
    }

    /// How many attackers the permanent may block at once.
    #[must_use]
    pub fn max_blocked_attackers(&self, id: EntityId) -> usize {
        let extra: u32 = self.permanent(id).map_or(0, |p| {
            p.card
                .effects(crate::effects::EffectSlot::Static)
                .iter()
                .map(|e| match e {
                    Effect::CanBlockAdditional(n) => *n,
                    _ => 0,
                })
                .sum()
        });
        1 + extra as usize
    }

    /// The most blockers the attacker may have, if limited.
    #[must_use]
    pub fn max_blockers(&self, id: EntityId) -> Option<usize> {
        self.permanent(id).and_then(|p| {
            p.card
                .effects(crate::effects::EffectSlot::Static)
                .iter()
                .find_map(|e| match e {
                    Effect::CantBeBlockedByMoreThan(n) => Some(*n as usize),
                    _ => None,
                })
        })
    }

    /// The active player's attacking creatures, in battlefield order.
    #[must_use]
    pub fn attacking_creatures(&self) -> Vec<EntityId> {
        self.players[self.active_player]
            .battlefield
            .iter()
            .filter(|p| p.attacking)
            .map(|p| p.id)
            .collect()
    }

    /// Permanents blocking `attacker`, in battlefield order.
    #[must_use]
    pub fn blockers_of(&self, attacker: EntityId) -> Vec<EntityId> {
        self.players
            .iter()
            .flat_map(|(_, state)| state.battlefield.iter())
            .filter(|p| p.blocking.contains(&attacker))
            .map(|p| p.id)
            .collect()
    }
}

/// Raise the attacker declaration for the active player, if anything can
/// attack.
pub fn begin_declare_attackers(data: &mut GameData) {
    let active = data.active_player;
    let battlefield = &data.players[active].battlefield;
    let attackable: Vec<usize> = (0..battlefield.len())
        .filter(|&i| data.can_attack(battlefield[i].id))
        .collect();
    if attackable.is_empty() {
        tracing::debug!(player = %active, "no possible attackers");
        return;
    }
    let must_attack: Vec<usize> = attackable
        .iter()
        .copied()
        .filter(|&i| data.own_static(battlefield[i].id, |e| *e == Effect::MustAttack))
        .collect();
    data.interaction.request(Interaction::new(
        active,
        InteractionKind::DeclareAttackers {
            attackable,
            must_attack,
        },
    ));
}

/// Answer the attacker declaration.
pub fn declare_attackers(data: &mut GameData, player: PlayerId, indices: &[usize]) -> Result<()> {
    let interaction = data.interaction.expect(player, AwaitingInput::AttackerDeclaration)?;
    let InteractionKind::DeclareAttackers {
        attackable,
        must_attack,
    } = &interaction.kind
    else {
        return Err(GameError::illegal("Not declaring attackers"));
    };

    for (i, index) in indices.iter().enumerate() {
        if !attackable.contains(index) {
            return Err(GameError::invalid_choice(format!("Creature {index} cannot attack")));
        }
        if indices[..i].contains(index) {
            return Err(GameError::invalid_choice("The same creature was declared twice"));
        }
    }
    if let Some(missing) = must_attack.iter().find(|i| !indices.contains(i)) {
        return Err(GameError::invalid_choice(format!("Creature {missing} must attack")));
    }

    data.interaction.take_current();
    for &index in indices {
        let id = data.players[player].battlefield[index].id;
        let vigilance = data.has_keyword(id, Keyword::Vigilance);
        let permanent = &mut data.players[player].battlefield[index];
        permanent.attacking = true;
        if !vigilance {
            permanent.tap();
        }
    }
    let line = format!("{} declares {} attacker(s).", data.player_name(player), indices.len());
    data.push_log(line);
    tracing::info!(player = %player, count = indices.len(), "attackers declared");
    Ok(())
}

/// Raise the blocker declaration for the defending player, if any
/// attacker can be blocked.
pub fn begin_declare_blockers(data: &mut GameData) {
    let attackers = data.attacking_creatures();
    if attackers.is_empty() {
        return;
    }
    let defender = data.defending_player();
    let battlefield = &data.players[defender].battlefield;
    let blockable: Vec<usize> = (0..battlefield.len())
        .filter(|&i| {
            let blocker = battlefield[i].id;
            attackers.iter().any(|&a| data.can_block(blocker, a))
        })
        .collect();
    if blockable.is_empty() {
        tracing::debug!(player = %defender, "no possible blockers");
        return;
    }

    let active = &data.players[data.active_player].battlefield;
    let attacker_indices: Vec<usize> = (0..active.len()).filter(|&i| active[i].attacking).collect();
    data.interaction.request(Interaction::new(
        defender,
        InteractionKind::DeclareBlockers {
            blockable,
            attackers: attacker_indices,
        },
    ));
}

/// Answer the blocker declaration with `(blocker_index, attacker_index)`
/// pairs.
pub fn declare_blockers(data: &mut GameData, player: PlayerId, pairs: &[(usize, usize)]) -> Result<()> {
    let interaction = data.interaction.expect(player, AwaitingInput::BlockerDeclaration)?;
    let InteractionKind::DeclareBlockers {
        blockable,
        attackers,
    } = &interaction.kind
    else {
        return Err(GameError::illegal("Not declaring blockers"));
    };

    let active = data.active_player;
    let mut per_blocker: FxHashMap<usize, usize> = FxHashMap::default();
    let mut per_attacker: FxHashMap<usize, usize> = FxHashMap::default();
    for (i, &(blocker_index, attacker_index)) in pairs.iter().enumerate() {
        if !blockable.contains(&blocker_index) {
            return Err(GameError::invalid_choice(format!("Creature {blocker_index} cannot block")));
        }
        if !attackers.contains(&attacker_index) {
            return Err(GameError::invalid_choice(format!("Creature {attacker_index} is not attacking")));
        }
        if pairs[..i].contains(&(blocker_index, attacker_index)) {
            return Err(GameError::invalid_choice("The same block was declared twice"));
        }
        let blocker = data.players[player].battlefield[blocker_index].id;
        let attacker = data.players[active].battlefield[attacker_index].id;
        if !data.can_block(blocker, attacker) {
            return Err(GameError::invalid_choice(format!(
                "{} cannot block {}",
                data.players[player].battlefield[blocker_index].name(),
                data.players[active].battlefield[attacker_index].name()
            )));
        }
        *per_blocker.entry(blocker_index).or_default() += 1;
        *per_attacker.entry(attacker_index).or_default() += 1;
    }

    for (&blocker_index, &count) in &per_blocker {
        let blocker = data.players[player].battlefield[blocker_index].id;
        if count > data.max_blocked_attackers(blocker) {
            return Err(GameError::invalid_choice(format!(
                "{} cannot block that many attackers",
                data.players[player].battlefield[blocker_index].name()
            )));
        }
    }
    for (&attacker_index, &count) in &per_attacker {
        let attacker = data.players[active].battlefield[attacker_index].id;
        let name = data.players[active].battlefield[attacker_index].name();
        if data.has_keyword(attacker, Keyword::Menace) && count < 2 {
            return Err(GameError::invalid_choice(format!("{name} must be blocked by two or more creatures")));
        }
        if data.max_blockers(attacker).is_some_and(|max| count > max) {
            return Err(GameError::invalid_choice(format!("{name} cannot be blocked by that many creatures")));
        }
    }

    data.interaction.take_current();
    for &(blocker_index, attacker_index) in pairs {
        let attacker = data.players[active].battlefield[attacker_index].id;
        data.players[active].battlefield[attacker_index].blocked = true;
        data.players[player].battlefield[blocker_index].blocking.push(attacker);
    }
    let blockers = per_blocker.len();
    let line = format!("{} declares {} blocker(s).", data.player_name(player), blockers);
    data.push_log(line);
    tracing::info!(player = %player, count = blockers, "blockers declared");
    Ok(())
}

/// Everything leaves combat.
pub fn end_combat(data: &mut GameData) {
    for player in data.players.player_ids().collect::<Vec<_>>() {
        let battlefield = &mut data.players[player].battlefield;
        for permanent in battlefield.iter_mut() {
            permanent.remove_from_combat();
        }
    }
}
