//! Triggered abilities.
//!
//! Each hook point collects the effects of one [`EffectSlot`] from the
//! relevant permanents and puts a `TriggeredAbility` entry on the stack.
//! Triggers from several permanents are put on the stack in APNAP order,
//! then battlefield order.
//!
//! ## Optional triggers
//!
//! A trigger whose whole effect list is a single `May` asks its controller
//! first. Accepting puts the inner effects on the stack; declining drops
//! the trigger.
//!
//! ## Choose-color
//!
//! A `ChooseColor` enter-the-battlefield effect is a replacement-style
//! choice made as the permanent enters, so it raises its interaction
//! immediately instead of using the stack.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{Card, Permanent};
use crate::core::{EntityId, GameData, PlayerId};
use crate::effects::{Effect, EffectSlot, Target, TargetSpec};
use crate::interaction::{Interaction, InteractionKind, MayOrigin};
use crate::stack::{self, StackEntry, StackEntryType};

/// A triggered ability waiting to be put on the stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingTrigger {
    pub card: Arc<Card>,
    pub controller: PlayerId,
    /// `None` once the source has left the battlefield (death triggers).
    pub source_permanent: Option<EntityId>,
    pub effects: Vec<Effect>,
    pub targets: SmallVec<[Target; 2]>,
    /// Rechecked on resolution when present.
    pub target_spec: Option<TargetSpec>,
}

impl PendingTrigger {
    #[must_use]
    pub fn new(card: Arc<Card>, controller: PlayerId, effects: Vec<Effect>) -> Self {
        Self {
            card,
            controller,
            source_permanent: None,
            effects,
            targets: SmallVec::new(),
            target_spec: None,
        }
    }

    #[must_use]
    pub fn from_permanent(permanent: &Permanent, controller: PlayerId, slot: EffectSlot) -> Self {
        let mut trigger = Self::new(
            Arc::clone(&permanent.card),
            controller,
            permanent.card.effects(slot).to_vec(),
        );
        trigger.source_permanent = Some(permanent.id);
        trigger
    }

    #[must_use]
    pub fn with_targets(mut self, targets: impl IntoIterator<Item = Target>, spec: Option<TargetSpec>) -> Self {
        self.targets = targets.into_iter().collect();
        self.target_spec = spec;
        self
    }

    /// The optional effects if this trigger is a lone `May`.
    fn optional(&self) -> Option<(&str, &[Effect])> {
        match self.effects.as_slice() {
            [Effect::May { prompt, effects }] => Some((prompt.as_str(), effects.as_slice())),
            _ => None,
        }
    }

    /// The stack entry for this trigger.
    #[must_use]
    pub fn into_entry(self, data: &mut GameData) -> StackEntry {
        let id = stack::next_stack_id(data);
        let description = format!("{}'s triggered ability", self.card.name);
        let mut entry = StackEntry::new(
            id,
            StackEntryType::TriggeredAbility,
            self.card,
            self.controller,
            self.effects,
        )
        .with_targets(self.targets)
        .with_target_spec(self.target_spec)
        .with_description(description);
        entry.source_permanent = self.source_permanent;
        entry
    }
}

/// Put a trigger on the stack, or ask first if it is optional.
pub fn fire(data: &mut GameData, trigger: PendingTrigger) {
    if trigger.effects.iter().all(|e| e.is_static() || e.is_cost()) {
        return;
    }
    if let Some((prompt, effects)) = trigger.optional() {
        let prompt = prompt.to_string();
        let effects = effects.to_vec();
        let controller = trigger.controller;
        let trigger = PendingTrigger { effects, ..trigger };
        data.interaction.request(Interaction::new(
            controller,
            InteractionKind::MayAbility {
                prompt,
                origin: MayOrigin::Trigger(trigger),
            },
        ));
        return;
    }

    tracing::debug!(card = %trigger.card.name, controller = %trigger.controller, "trigger fired");
    let entry = trigger.into_entry(data);
    stack::push_entry(data, entry);
}

/// Enter-the-battlefield hook. `targets` are the ones chosen when the
/// spell was cast.
pub fn on_enter_battlefield(
    data: &mut GameData,
    controller: PlayerId,
    permanent: EntityId,
    targets: &[Target],
    target_spec: Option<TargetSpec>,
) {
    let Some(source) = data.permanent(permanent).cloned() else {
        return;
    };
    let effects = source.card.effects(EffectSlot::OnEnterBattlefield);
    if effects.is_empty() {
        return;
    }

    if effects.contains(&Effect::ChooseColor) {
        data.interaction.request(Interaction::new(
            controller,
            InteractionKind::ColorChoice { permanent },
        ));
    }
    let rest: Vec<Effect> = effects
        .iter()
        .filter(|e| **e != Effect::ChooseColor)
        .cloned()
        .collect();
    if rest.is_empty() {
        return;
    }
    // A targeted trigger with nothing to target never goes on the stack.
    if target_spec.is_some() && targets.is_empty() {
        return;
    }

    let mut trigger = PendingTrigger::new(Arc::clone(&source.card), controller, rest)
        .with_targets(targets.iter().copied(), target_spec);
    trigger.source_permanent = Some(permanent);
    fire(data, trigger);
}

/// Death hook, called after the permanent has left the battlefield.
pub fn on_death(data: &mut GameData, controller: PlayerId, permanent: &Permanent) {
    if permanent.card.effects(EffectSlot::OnDeath).is_empty() {
        return;
    }
    let mut trigger = PendingTrigger::from_permanent(permanent, controller, EffectSlot::OnDeath);
    trigger.source_permanent = None;
    fire(data, trigger);
}

/// Combat damage to a player hook.
pub fn on_combat_damage_to_player(data: &mut GameData, source: EntityId, damaged: PlayerId) {
    let Some((controller, index)) = data.find_permanent(source) else {
        return;
    };
    let permanent = &data.players[controller].battlefield[index];
    if permanent.card.effects(EffectSlot::OnCombatDamageToPlayer).is_empty() {
        return;
    }
    let trigger = PendingTrigger::from_permanent(permanent, controller, EffectSlot::OnCombatDamageToPlayer)
        .with_targets([Target::Player(damaged)], None);
    fire(data, trigger);
}

/// Upkeep triggers of the active player's permanents.
pub fn upkeep(data: &mut GameData) {
    let active = data.active_player;
    fire_slot(data, &[active], EffectSlot::UpkeepTriggered);
}

/// End step triggers of every player's permanents, APNAP.
pub fn end_step(data: &mut GameData) {
    let order = data.apnap_order();
    fire_slot(data, &order, EffectSlot::EndStepTriggered);
}

fn fire_slot(data: &mut GameData, players: &[PlayerId], slot: EffectSlot) {
    let triggers: Vec<PendingTrigger> = players
        .iter()
        .flat_map(|&player| {
            data.players[player]
                .battlefield
                .iter()
                .filter(move |p| !p.card.effects(slot).is_empty())
                .map(move |p| PendingTrigger::from_permanent(p, player, slot))
        })
        .collect();
    for trigger in triggers {
        fire(data, trigger);
    }
}
