//! Combat damage.
//!
//! Damage is dealt in up to two passes. If any attacker or blocker has
//! first strike or double strike, a first-strike pass runs before the
//! regular pass. Each pass is computed from the board as a list of hits,
//! then applied all at once; creatures with lethal damage are destroyed
//! before the next pass is computed, so a creature killed by first-strike
//! damage deals no regular damage.
//!
//! ## The carried snapshot
//!
//! [`DamagePass`] is the state carried from the first pass into the
//! second: which permanents already died and how much damage each object
//! took and dealt. It is immutable between passes and is part of the
//! suspended [`CombatProgress`] when a player must assign damage.
//!
//! ## Assignment
//!
//! An attacker blocked by two or more creatures, a trampler with power
//! beyond its blockers' lethal damage, or an attacker that may assign its
//! damage as though unblocked, waits for its controller to split its
//! damage through a combat-damage-assignment interaction.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::cards::attributes::Keyword;
use crate::core::{EntityId, GameData, GameError, PlayerId, Result};
use crate::effects::{DamageSource, Effect, Target};
use crate::interaction::{AwaitingInput, BlockerLethal, Continuation, Interaction, InteractionKind};
use crate::triggers;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSubStep {
    FirstStrike,
    Regular,
}

/// One creature's damage to one recipient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatHit {
    pub source: EntityId,
    pub target: Target,
    pub amount: i32,
}

/// Mid-combat state carried from one damage pass to the next.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DamagePass {
    /// Destroyed by combat damage in an earlier pass.
    pub dead: FxHashSet<EntityId>,
    /// Damage marked on each permanent this combat.
    pub marked: FxHashMap<EntityId, i32>,
    /// Damage dealt by each source this combat.
    pub dealt: FxHashMap<EntityId, i32>,
}

/// A combat damage step in progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatProgress {
    pub sub_step: DamageSubStep,
    pub carried: DamagePass,
    /// Player-chosen splits for the current pass, by attacker.
    pub assignments: FxHashMap<EntityId, Vec<(Target, i32)>>,
}

impl CombatProgress {
    #[must_use]
    pub fn new(sub_step: DamageSubStep) -> Self {
        Self {
            sub_step,
            carried: DamagePass::default(),
            assignments: FxHashMap::default(),
        }
    }
}

/// Split `power` across blockers in order, giving each lethal damage
/// before moving on. Returns the per-blocker amounts and the excess.
///
/// ```
/// use mtg_rules_engine::combat::trample_split;
/// use mtg_rules_engine::core::EntityId;
/// use mtg_rules_engine::interaction::BlockerLethal;
///
/// let blockers = [BlockerLethal { blocker: EntityId(1), lethal: 2 }];
/// let (to_blockers, excess) = trample_split(5, &blockers);
/// assert_eq!(to_blockers, vec![(EntityId(1), 2)]);
/// assert_eq!(excess, 3);
/// ```
#[must_use]
pub fn trample_split(power: i32, blockers: &[BlockerLethal]) -> (Vec<(EntityId, i32)>, i32) {
    let mut remaining = power.max(0);
    let mut split = Vec::with_capacity(blockers.len());
    for blocker in blockers {
        let amount = remaining.min(blocker.lethal.max(0));
        split.push((blocker.blocker, amount));
        remaining -= amount;
    }
    (split, remaining)
}

impl GameData {
    /// Whether the permanent deals damage in `sub_step`.
    #[must_use]
    pub fn deals_damage_in(&self, id: EntityId, sub_step: DamageSubStep) -> bool {
        let first = self.has_keyword(id, Keyword::FirstStrike);
        let double = self.has_keyword(id, Keyword::DoubleStrike);
        match sub_step {
            DamageSubStep::FirstStrike => first || double,
            DamageSubStep::Regular => !first || double,
        }
    }

    fn blocker_lethals(&self, attacker: EntityId) -> Vec<BlockerLethal> {
        self.blockers_of(attacker)
            .into_iter()
            .map(|blocker| BlockerLethal {
                blocker,
                lethal: self.lethal_damage_remaining(blocker),
            })
            .collect()
    }

    /// The assignment interaction `attacker` needs, if its damage split
    /// is the controller's choice.
    #[must_use]
    pub fn assignment_needed(&self, attacker: EntityId) -> Option<Interaction> {
        let (controller, index) = self.find_permanent(attacker)?;
        let permanent = &self.players[controller].battlefield[index];
        if !permanent.attacking || !permanent.blocked {
            return None;
        }
        let power = self.effective_power(attacker);
        let blockers = self.blocker_lethals(attacker);
        if power <= 0 || blockers.is_empty() {
            return None;
        }
        let trample = self.has_keyword(attacker, Keyword::Trample);
        let as_though_unblocked = self.own_static(attacker, |e| *e == Effect::AssignDamageAsThoughUnblocked);
        let total_lethal: i32 = blockers.iter().map(|b| b.lethal).sum();
        let choice = blockers.len() >= 2 || (trample && power > total_lethal) || as_though_unblocked;
        choice.then(|| {
            Interaction::new(
                controller,
                InteractionKind::CombatDamageAssignment {
                    attacker,
                    attacker_index: index,
                    power,
                    blockers,
                    defender: self.defending_player(),
                    trample,
                    as_though_unblocked,
                },
            )
        })
    }

    /// Every hit of one pass, computed from the current board.
    #[must_use]
    pub fn compute_pass(&self, progress: &CombatProgress) -> Vec<CombatHit> {
        let sub_step = progress.sub_step;
        let defender = self.defending_player();
        let mut hits = Vec::new();

        for attacker in self.attacking_creatures() {
            if progress.carried.dead.contains(&attacker) || !self.deals_damage_in(attacker, sub_step) {
                continue;
            }
            let power = self.effective_power(attacker);
            if power <= 0 {
                continue;
            }
            if let Some(assignments) = progress.assignments.get(&attacker) {
                hits.extend(assignments.iter().map(|&(target, amount)| CombatHit {
                    source: attacker,
                    target,
                    amount,
                }));
                continue;
            }

            let blocked = self.permanent(attacker).is_some_and(|p| p.blocked);
            let trample = self.has_keyword(attacker, Keyword::Trample);
            let blockers = self.blocker_lethals(attacker);
            if !blocked || (blockers.is_empty() && trample) {
                hits.push(CombatHit {
                    source: attacker,
                    target: Target::Player(defender),
                    amount: power,
                });
                continue;
            }
            let (mut split, excess) = trample_split(power, &blockers);
            if excess > 0 {
                if trample {
                    hits.push(CombatHit {
                        source: attacker,
                        target: Target::Player(defender),
                        amount: excess,
                    });
                } else if let Some(last) = split.last_mut() {
                    last.1 += excess;
                }
            }
            hits.extend(
                split
                    .into_iter()
                    .filter(|&(_, amount)| amount > 0)
                    .map(|(blocker, amount)| CombatHit {
                        source: attacker,
                        target: Target::Permanent(blocker),
                        amount,
                    }),
            );
        }

        for (_, state) in self.players.iter() {
            for blocker in state.battlefield.iter().filter(|p| p.is_blocking()) {
                if progress.carried.dead.contains(&blocker.id) || !self.deals_damage_in(blocker.id, sub_step) {
                    continue;
                }
                let power = self.effective_power(blocker.id);
                let target = blocker
                    .blocking
                    .iter()
                    .copied()
                    .find(|a| self.permanent(*a).is_some_and(|p| p.attacking));
                if let (Some(attacker), true) = (target, power > 0) {
                    hits.push(CombatHit {
                        source: blocker.id,
                        target: Target::Permanent(attacker),
                        amount: power,
                    });
                }
            }
        }
        hits
    }

    /// Deal every hit, then destroy creatures with lethal damage.
    /// Returns the names of the creatures that died.
    pub fn apply_pass(&mut self, hits: &[CombatHit], carried: &mut DamagePass) -> Vec<String> {
        let sources: Vec<Option<DamageSource>> = hits
            .iter()
            .map(|hit| {
                let (controller, index) = self.find_permanent(hit.source)?;
                let permanent = &self.players[controller].battlefield[index];
                Some(DamageSource {
                    controller,
                    name: permanent.name().to_string(),
                    color: permanent.card.color,
                    permanent: Some(hit.source),
                    combat: true,
                })
            })
            .collect();

        for (hit, source) in hits.iter().zip(sources) {
            let Some(source) = source else {
                continue;
            };
            match hit.target {
                Target::Player(player) => {
                    let dealt = self.damage_player(&source, player, hit.amount);
                    if dealt > 0 {
                        triggers::on_combat_damage_to_player(self, hit.source, player);
                    }
                }
                Target::Permanent(id) => {
                    let dealt = self.damage_permanent(&source, id, hit.amount);
                    *carried.marked.entry(id).or_default() += dealt;
                }
                _ => {}
            }
            *carried.dealt.entry(hit.source).or_default() += hit.amount;
        }

        let lethal: Vec<EntityId> = self
            .players
            .iter()
            .flat_map(|(_, state)| state.battlefield.iter())
            .filter(|p| p.card.is_creature() && p.damage > 0)
            .map(|p| p.id)
            .filter(|&id| self.lethal_damage_remaining(id) == 0)
            .collect();

        let mut died = Vec::new();
        for id in lethal {
            let name = self.permanent(id).map(|p| p.name().to_string());
            if self.destroy_permanent(id, true) {
                carried.dead.insert(id);
                died.extend(name);
            }
        }
        if !died.is_empty() {
            self.push_log(format!("{} died in combat.", died.join(", ")));
        }
        died
    }
}

/// Start the combat damage step.
pub fn begin_combat_damage(data: &mut GameData) -> Result<()> {
    let attackers = data.attacking_creatures();
    if attackers.is_empty() {
        return Ok(());
    }
    let blockers: Vec<EntityId> = attackers.iter().flat_map(|&a| data.blockers_of(a)).collect();
    let first_strike = attackers.iter().chain(&blockers).any(|&id| {
        data.has_keyword(id, Keyword::FirstStrike) || data.has_keyword(id, Keyword::DoubleStrike)
    });
    let sub_step = if first_strike {
        DamageSubStep::FirstStrike
    } else {
        DamageSubStep::Regular
    };
    run_combat_damage(data, CombatProgress::new(sub_step))
}

/// Run damage passes until combat damage is done or a player must assign
/// damage.
pub fn run_combat_damage(data: &mut GameData, mut progress: CombatProgress) -> Result<()> {
    loop {
        if !data.is_running() {
            return Ok(());
        }
        let needed: Vec<Interaction> = data
            .attacking_creatures()
            .into_iter()
            .filter(|a| {
                !progress.assignments.contains_key(a)
                    && !progress.carried.dead.contains(a)
                    && data.deals_damage_in(*a, progress.sub_step)
            })
            .filter_map(|a| data.assignment_needed(a))
            .collect();
        if !needed.is_empty() {
            for interaction in needed {
                data.interaction.request(interaction);
            }
            data.interaction.suspend(Continuation::CombatDamage(progress));
            return Ok(());
        }

        let hits = data.compute_pass(&progress);
        tracing::debug!(sub_step = ?progress.sub_step, hits = hits.len(), "combat damage pass");
        let mut carried = std::mem::take(&mut progress.carried);
        data.apply_pass(&hits, &mut carried);
        progress.carried = carried;
        crate::rules::check_state_based_actions(data);

        match progress.sub_step {
            DamageSubStep::FirstStrike => {
                progress.sub_step = DamageSubStep::Regular;
                progress.assignments.clear();
            }
            DamageSubStep::Regular => return Ok(()),
        }
    }
}

/// Answer a combat damage assignment.
pub fn assign_combat_damage(
    data: &mut GameData,
    player: PlayerId,
    attacker_index: usize,
    assignments: &[(Target, i32)],
) -> Result<()> {
    let interaction = data.interaction.expect(player, AwaitingInput::CombatDamageAssignment)?;
    let InteractionKind::CombatDamageAssignment {
        attacker,
        attacker_index: expected_index,
        power,
        blockers,
        defender,
        trample,
        as_though_unblocked,
    } = &interaction.kind
    else {
        return Err(GameError::illegal("Not assigning combat damage"));
    };
    if attacker_index != *expected_index {
        return Err(GameError::invalid_choice(format!(
            "Waiting for damage assignment of attacker {expected_index}"
        )));
    }
    validate_assignment(assignments, *power, blockers, *defender, *trample, *as_though_unblocked)?;
    let attacker = *attacker;

    let Some(Continuation::CombatDamage(progress)) = data.interaction.top_continuation_mut() else {
        return Err(GameError::illegal("No combat damage step in progress"));
    };
    progress.assignments.insert(attacker, assignments.to_vec());
    data.interaction.take_current();
    Ok(())
}

/// Check a damage split against the assignment order rules.
pub fn validate_assignment(
    assignments: &[(Target, i32)],
    power: i32,
    blockers: &[BlockerLethal],
    defender: PlayerId,
    trample: bool,
    as_though_unblocked: bool,
) -> Result<()> {
    let mut total = 0;
    for (i, (target, amount)) in assignments.iter().enumerate() {
        if *amount < 0 {
            return Err(GameError::invalid_choice("Damage amounts cannot be negative"));
        }
        if assignments[..i].iter().any(|(t, _)| t == target) {
            return Err(GameError::invalid_choice("The same recipient was listed twice"));
        }
        let legal = match target {
            Target::Player(p) => *p == defender && (trample || as_though_unblocked),
            Target::Permanent(id) => blockers.iter().any(|b| b.blocker == *id),
            _ => false,
        };
        if !legal {
            return Err(GameError::invalid_choice("Damage can only go to blockers or, with trample, the defending player"));
        }
        total += amount;
    }
    if total != power {
        return Err(GameError::invalid_choice(format!(
            "Assigned {total} damage, but the attacker deals {power}"
        )));
    }

    let amount_for = |target: Target| {
        assignments
            .iter()
            .filter(|(t, _)| *t == target)
            .map(|(_, a)| *a)
            .sum::<i32>()
    };
    let to_player = amount_for(Target::Player(defender));
    if as_though_unblocked && to_player == power {
        return Ok(());
    }

    let mut earlier_lethal = true;
    for blocker in blockers {
        let amount = amount_for(Target::Permanent(blocker.blocker));
        if amount > 0 && !earlier_lethal {
            return Err(GameError::invalid_choice(
                "Each blocker must be assigned lethal damage before the next",
            ));
        }
        earlier_lethal &= amount >= blocker.lethal;
    }
    if to_player > 0 && !earlier_lethal {
        return Err(GameError::invalid_choice(
            "Every blocker must be assigned lethal damage before the player",
        ));
    }
    Ok(())
}
