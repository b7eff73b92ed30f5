//! State-based actions.
//!
//! Checked after every resolution, combat damage pass and answered
//! interaction. Nothing here uses the stack. Zone changes repeat until
//! the board is stable; the legend rule then asks for a choice and player
//! losses end the game.

use rustc_hash::FxHashMap;

use crate::core::{EntityId, GameData, GameStatus, PlayerId};
use crate::interaction::{Interaction, InteractionKind, PermanentChoicePurpose};

/// Apply every state-based action that currently holds.
pub fn check_state_based_actions(data: &mut GameData) {
    while remove_dead_permanents(data) {}
    apply_legend_rule(data);
    check_losses(data);
}

fn remove_dead_permanents(data: &mut GameData) -> bool {
    let permanents: Vec<EntityId> = data
        .players
        .iter()
        .flat_map(|(_, state)| state.battlefield.iter().map(|p| p.id))
        .collect();

    let mut changed = false;
    for id in permanents {
        let Some(permanent) = data.permanent(id) else {
            continue;
        };
        let name = permanent.name().to_string();
        let damage = permanent.damage;
        let orphaned = permanent
            .attached_to
            .is_some_and(|host| data.permanent(host).is_none());

        if permanent.card.is_creature() {
            if data.effective_toughness(id) <= 0 {
                data.push_log(format!("{name} dies."));
                changed |= data.move_to_graveyard(id);
            } else if damage > 0 && data.lethal_damage_remaining(id) == 0 {
                changed |= data.destroy_permanent(id, true);
            }
        } else if orphaned && permanent.card.is_equipment() {
            if let Some(equipment) = data.permanent_mut(id) {
                equipment.attached_to = None;
            }
            data.push_log(format!("{name} becomes unattached."));
        } else if orphaned {
            data.push_log(format!("{name} is put into its owner's graveyard."));
            changed |= data.move_to_graveyard(id);
        }
    }
    changed
}

fn apply_legend_rule(data: &mut GameData) {
    if data.interaction.is_pending() || data.interaction.queued() > 0 {
        return;
    }
    for player in data.apnap_order() {
        let mut by_name: FxHashMap<&str, Vec<EntityId>> = FxHashMap::default();
        for permanent in data.players[player].battlefield.iter() {
            if permanent.card.is_legendary() {
                by_name.entry(permanent.name()).or_default().push(permanent.id);
            }
        }
        let mut duplicates: Vec<(String, Vec<EntityId>)> = by_name
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(name, ids)| (name.to_string(), ids))
            .collect();
        duplicates.sort();

        for (name, valid) in duplicates {
            tracing::debug!(player = %player, %name, "legend rule");
            data.interaction.request(Interaction::new(
                player,
                InteractionKind::PermanentChoice {
                    valid,
                    purpose: PermanentChoicePurpose::LegendRule { name },
                },
            ));
        }
    }
}

fn check_losses(data: &mut GameData) {
    if !data.is_running() {
        return;
    }
    let losers: Vec<PlayerId> = data
        .players
        .iter()
        .filter(|(_, state)| !state.has_lost && state.life <= 0)
        .map(|(player, _)| player)
        .collect();
    if losers.is_empty() {
        return;
    }
    for &loser in &losers {
        data.players[loser].has_lost = true;
    }

    let remaining: Vec<PlayerId> = data
        .players
        .iter()
        .filter(|(_, state)| !state.has_lost)
        .map(|(player, _)| player)
        .collect();
    let winner = match remaining.as_slice() {
        [winner] => Some(*winner),
        _ => None,
    };
    for loser in losers {
        let name = data.player_name(loser).to_string();
        let line = match winner {
            Some(winner) => format!("{name} has been defeated! {} wins!", data.player_name(winner)),
            None => format!("{name} has been defeated!"),
        };
        data.push_log(line);
    }

    if remaining.len() <= 1 {
        tracing::info!(?winner, turn = data.turn_number, "game over");
        if winner.is_none() {
            data.push_log("The game is a draw.");
        }
        data.status = GameStatus::Finished { winner };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::catalog::test_catalog;
    use crate::cards::CardInstance;
    use crate::core::GameConfig;
    use crate::interaction::AwaitingInput;

    fn running() -> GameData {
        let mut data = GameData::new(GameConfig::default());
        data.add_player("alice", Vec::new());
        data.add_player("bob", Vec::new());
        data.status = GameStatus::Running;
        data
    }

    fn put(data: &mut GameData, player: PlayerId, name: &str) -> EntityId {
        let card = test_catalog().unwrap().get_by_name(name).unwrap();
        let object = data.ids.next_id();
        data.put_onto_battlefield(player, CardInstance::new(object, card, player))
    }

    #[test]
    fn test_lethal_damage_destroys() {
        let mut data = running();
        let bears = put(&mut data, PlayerId::new(0), "Grizzly Bears");
        data.permanent_mut(bears).unwrap().damage = 2;
        check_state_based_actions(&mut data);
        assert!(data.permanent(bears).is_none());
        assert_eq!(data.players[PlayerId::new(0)].graveyard.len(), 1);
    }

    #[test]
    fn test_indestructible_survives_damage() {
        let mut data = running();
        let myr = put(&mut data, PlayerId::new(0), "Darksteel Myr");
        data.permanent_mut(myr).unwrap().damage = 5;
        check_state_based_actions(&mut data);
        assert!(data.permanent(myr).is_some());
    }

    #[test]
    fn test_regeneration_shield_used() {
        let mut data = running();
        let bears = put(&mut data, PlayerId::new(0), "Grizzly Bears");
        {
            let permanent = data.permanent_mut(bears).unwrap();
            permanent.damage = 3;
            permanent.regeneration_shields = 1;
        }
        check_state_based_actions(&mut data);
        let permanent = data.permanent(bears).unwrap();
        assert_eq!(permanent.damage, 0);
        assert!(permanent.tapped);
        assert!(data.log.iter().any(|l| l == "Grizzly Bears regenerates."));
    }

    #[test]
    fn test_zero_toughness_dies() {
        let mut data = running();
        let elves = put(&mut data, PlayerId::new(1), "Llanowar Elves");
        data.permanent_mut(elves).unwrap().toughness_modifier = -1;
        check_state_based_actions(&mut data);
        assert!(data.permanent(elves).is_none());
        assert!(data.log.iter().any(|l| l == "Llanowar Elves dies."));
    }

    #[test]
    fn test_orphaned_aura() {
        let mut data = running();
        let bears = put(&mut data, PlayerId::new(0), "Grizzly Bears");
        let aura = put(&mut data, PlayerId::new(0), "Holy Strength");
        data.permanent_mut(aura).unwrap().attached_to = Some(bears);
        data.return_to_hand(bears);

        check_state_based_actions(&mut data);
        assert!(data.permanent(aura).is_none());
        assert_eq!(data.players[PlayerId::new(0)].graveyard.len(), 1);
    }

    #[test]
    fn test_orphaned_equipment_stays() {
        let mut data = running();
        let bears = put(&mut data, PlayerId::new(0), "Grizzly Bears");
        let scimitar = put(&mut data, PlayerId::new(0), "Leonin Scimitar");
        data.permanent_mut(scimitar).unwrap().attached_to = Some(bears);
        data.return_to_hand(bears);

        check_state_based_actions(&mut data);
        assert_eq!(data.permanent(scimitar).unwrap().attached_to, None);
        assert!(data.players[PlayerId::new(0)].graveyard.is_empty());
        assert!(data.log.iter().any(|l| l == "Leonin Scimitar becomes unattached."));
    }

    #[test]
    fn test_legend_rule_asks() {
        let mut data = running();
        put(&mut data, PlayerId::new(0), "Jedit Ojanen");
        put(&mut data, PlayerId::new(0), "Jedit Ojanen");
        put(&mut data, PlayerId::new(1), "Jedit Ojanen");

        check_state_based_actions(&mut data);
        let interaction = data.interaction.current().unwrap();
        assert_eq!(interaction.player, PlayerId::new(0));
        assert_eq!(interaction.awaiting(), AwaitingInput::PermanentChoice);
        assert_eq!(data.interaction.queued(), 0);
    }

    #[test]
    fn test_defeat_ends_game() {
        let mut data = running();
        data.players[PlayerId::new(1)].life = 0;
        check_state_based_actions(&mut data);

        assert_eq!(
            data.status,
            GameStatus::Finished {
                winner: Some(PlayerId::new(0))
            }
        );
        assert!(data.log.iter().any(|l| l == "bob has been defeated! alice wins!"));
    }

    #[test]
    fn test_simultaneous_defeat_is_draw() {
        let mut data = running();
        data.players[PlayerId::new(0)].life = -1;
        data.players[PlayerId::new(1)].life = 0;
        check_state_based_actions(&mut data);
        assert_eq!(data.status, GameStatus::Finished { winner: None });
    }
}
