//! Stack and priority integration tests.
//!
//! These verify casting, responding, resolution order, fizzling and
//! counterspells through the `Game` facade.

use std::sync::Arc;

use mtg_rules_engine::cards::catalog::test_catalog;
use mtg_rules_engine::cards::Card;
use mtg_rules_engine::core::{GameError, PlayerId};
use mtg_rules_engine::effects::Target;
use mtg_rules_engine::interaction::{AwaitingInput, InteractionKind};
use mtg_rules_engine::rules::{Game, GameBuilder};

const ALICE: PlayerId = PlayerId::new(0);
const BOB: PlayerId = PlayerId::new(1);

fn card(name: &str) -> Arc<Card> {
    test_catalog().unwrap().get_by_name(name).unwrap()
}

fn both_pass(game: &mut Game) {
    let first = game.priority_holder().unwrap();
    game.pass_priority(first).unwrap();
    let second = game.priority_holder().unwrap();
    game.pass_priority(second).unwrap();
}

// =============================================================================
// Casting and resolution
// =============================================================================

/// A spell resolves only after both players pass in succession.
#[test]
fn test_resolves_after_both_pass() {
    let mut game = GameBuilder::new()
        .with_player("alice")
        .with_player("bob")
        .with_permanent(ALICE, card("Mountain"))
        .with_hand_card(ALICE, card("Lightning Bolt"))
        .build()
        .unwrap();

    game.tap_permanent(ALICE, 0).unwrap();
    game.play_card(ALICE, 0, 0, vec![Target::Player(BOB)], Vec::new()).unwrap();
    assert_eq!(game.data().stack.len(), 1);
    assert!(game.data().log.iter().any(|l| l == "alice casts Lightning Bolt."));

    game.pass_priority(ALICE).unwrap();
    assert_eq!(game.data().stack.len(), 1);
    assert_eq!(game.priority_holder(), Some(BOB));

    game.pass_priority(BOB).unwrap();
    assert!(game.data().stack.is_empty());
    assert_eq!(game.data().players[BOB].life, 17);
    assert_eq!(game.data().players[ALICE].graveyard[0].name(), "Lightning Bolt");
}

/// The last spell cast resolves first.
#[test]
fn test_last_in_first_out() {
    let mut game = GameBuilder::new()
        .with_player("alice")
        .with_player("bob")
        .with_permanent(ALICE, card("Mountain"))
        .with_permanent(BOB, card("Forest"))
        .with_permanent(BOB, card("Grizzly Bears"))
        .with_hand_card(ALICE, card("Shock"))
        .with_hand_card(BOB, card("Giant Growth"))
        .build()
        .unwrap();
    let bears = game.data().players[BOB].battlefield[1].id;

    game.tap_permanent(ALICE, 0).unwrap();
    game.play_card(ALICE, 0, 0, vec![Target::Permanent(bears)], Vec::new()).unwrap();
    game.pass_priority(ALICE).unwrap();

    game.tap_permanent(BOB, 0).unwrap();
    game.play_card(BOB, 0, 0, vec![Target::Permanent(bears)], Vec::new()).unwrap();
    assert_eq!(game.data().stack.len(), 2);

    both_pass(&mut game);
    assert_eq!(game.data().stack.len(), 1);
    both_pass(&mut game);

    let survivor = &game.data().players[BOB].battlefield[1];
    assert_eq!(survivor.damage, 2);
    assert_eq!(game.data().players[BOB].graveyard.len(), 1);
}

/// A spell whose only target left the battlefield fizzles but still goes
/// to the graveyard.
#[test]
fn test_fizzle_on_missing_target() {
    let mut game = GameBuilder::new()
        .with_player("alice")
        .with_player("bob")
        .with_permanent(ALICE, card("Mountain"))
        .with_permanent(BOB, card("Island"))
        .with_permanent(BOB, card("Grizzly Bears"))
        .with_hand_card(ALICE, card("Shock"))
        .with_hand_card(BOB, card("Unsummon"))
        .build()
        .unwrap();
    let bears = game.data().players[BOB].battlefield[1].id;

    game.tap_permanent(ALICE, 0).unwrap();
    game.play_card(ALICE, 0, 0, vec![Target::Permanent(bears)], Vec::new()).unwrap();
    game.pass_priority(ALICE).unwrap();
    game.tap_permanent(BOB, 0).unwrap();
    game.play_card(BOB, 0, 0, vec![Target::Permanent(bears)], Vec::new()).unwrap();

    both_pass(&mut game);
    assert_eq!(game.data().players[BOB].hand[0].name(), "Grizzly Bears");
    both_pass(&mut game);

    assert!(game.data().log.iter().any(|l| l == "Shock fizzles (illegal target)."));
    assert_eq!(game.data().players[ALICE].graveyard[0].name(), "Shock");
    assert_eq!(game.data().players[BOB].life, 20);
}

/// Sorceries wait for an empty stack in their controller's main phase.
#[test]
fn test_sorcery_timing() {
    let mut game = GameBuilder::new()
        .with_player("alice")
        .with_player("bob")
        .with_permanent(BOB, card("Island"))
        .with_permanent(BOB, card("Island"))
        .with_permanent(BOB, card("Island"))
        .with_hand_card(BOB, card("Divination"))
        .build()
        .unwrap();

    assert!(matches!(
        game.play_card(BOB, 0, 0, Vec::new(), Vec::new()),
        Err(GameError::NotYourPriority(_))
    ));
    game.pass_priority(ALICE).unwrap();
    for index in 0..3 {
        game.tap_permanent(BOB, index).unwrap();
    }
    let err = game.play_card(BOB, 0, 0, Vec::new(), Vec::new()).unwrap_err();
    assert!(matches!(err, GameError::IllegalAction(_)));
    assert_eq!(game.data().players[BOB].hand.len(), 1);
}

// =============================================================================
// Counterspells
// =============================================================================

/// Counterspell removes the targeted spell from the stack.
#[test]
fn test_counterspell() {
    let mut game = GameBuilder::new()
        .with_player("alice")
        .with_player("bob")
        .with_permanent(ALICE, card("Mountain"))
        .with_permanent(BOB, card("Island"))
        .with_permanent(BOB, card("Island"))
        .with_hand_card(ALICE, card("Lightning Bolt"))
        .with_hand_card(BOB, card("Counterspell"))
        .build()
        .unwrap();

    game.tap_permanent(ALICE, 0).unwrap();
    game.play_card(ALICE, 0, 0, vec![Target::Player(BOB)], Vec::new()).unwrap();
    let bolt = game.data().stack[0].id;
    game.pass_priority(ALICE).unwrap();
    game.tap_permanent(BOB, 0).unwrap();
    game.tap_permanent(BOB, 1).unwrap();
    game.play_card(BOB, 0, 0, vec![Target::Spell(bolt)], Vec::new()).unwrap();

    both_pass(&mut game);
    assert!(game.data().stack.is_empty());
    assert_eq!(game.data().players[BOB].life, 20);
    assert!(game.data().log.iter().any(|l| l == "Lightning Bolt is countered."));
}

/// Mana Leak asks the caster to pay; declining counters the spell.
#[test]
fn test_mana_leak_declined() {
    let mut game = GameBuilder::new()
        .with_player("alice")
        .with_player("bob")
        .with_permanent(ALICE, card("Mountain"))
        .with_permanent(BOB, card("Island"))
        .with_permanent(BOB, card("Island"))
        .with_hand_card(ALICE, card("Lightning Bolt"))
        .with_hand_card(BOB, card("Mana Leak"))
        .build()
        .unwrap();

    game.tap_permanent(ALICE, 0).unwrap();
    game.play_card(ALICE, 0, 0, vec![Target::Player(BOB)], Vec::new()).unwrap();
    let bolt = game.data().stack[0].id;
    game.pass_priority(ALICE).unwrap();
    game.tap_permanent(BOB, 0).unwrap();
    game.tap_permanent(BOB, 1).unwrap();
    game.play_card(BOB, 0, 0, vec![Target::Spell(bolt)], Vec::new()).unwrap();
    both_pass(&mut game);

    assert_eq!(game.data().interaction.awaiting(), Some(AwaitingInput::MayAbility));
    assert!(game.handle_may_ability_chosen(BOB, false).is_err());
    game.handle_may_ability_chosen(ALICE, false).unwrap();

    assert!(game.data().stack.is_empty());
    assert_eq!(game.data().players[BOB].life, 20);
    assert_eq!(game.data().players[BOB].graveyard[0].name(), "Mana Leak");
}

/// Mana tapped while deciding pays for Mana Leak and the spell survives.
#[test]
fn test_mana_leak_paid() {
    let mut game = GameBuilder::new()
        .with_player("alice")
        .with_player("bob")
        .with_permanent(ALICE, card("Mountain"))
        .with_permanent(ALICE, card("Mountain"))
        .with_permanent(ALICE, card("Mountain"))
        .with_permanent(ALICE, card("Mountain"))
        .with_permanent(BOB, card("Island"))
        .with_permanent(BOB, card("Island"))
        .with_hand_card(ALICE, card("Lightning Bolt"))
        .with_hand_card(BOB, card("Mana Leak"))
        .build()
        .unwrap();

    game.tap_permanent(ALICE, 0).unwrap();
    game.play_card(ALICE, 0, 0, vec![Target::Player(BOB)], Vec::new()).unwrap();
    let bolt = game.data().stack[0].id;
    game.pass_priority(ALICE).unwrap();
    game.tap_permanent(BOB, 0).unwrap();
    game.tap_permanent(BOB, 1).unwrap();
    game.play_card(BOB, 0, 0, vec![Target::Spell(bolt)], Vec::new()).unwrap();
    both_pass(&mut game);

    for index in 1..4 {
        game.tap_permanent(ALICE, index).unwrap();
    }
    game.handle_may_ability_chosen(ALICE, true).unwrap();
    assert_eq!(game.data().stack.len(), 1);

    both_pass(&mut game);
    assert_eq!(game.data().players[BOB].life, 17);
}

// =============================================================================
// Copies and redirection
// =============================================================================

/// Fork copies Shock and lets its caster aim the copy elsewhere.
#[test]
fn test_fork_retargets_copy() {
    let mut game = GameBuilder::new()
        .with_player("alice")
        .with_player("bob")
        .with_permanent(ALICE, card("Mountain"))
        .with_permanent(ALICE, card("Mountain"))
        .with_permanent(ALICE, card("Mountain"))
        .with_permanent(BOB, card("Grizzly Bears"))
        .with_permanent(BOB, card("Llanowar Elves"))
        .with_hand_card(ALICE, card("Shock"))
        .with_hand_card(ALICE, card("Fork"))
        .build()
        .unwrap();
    let bears = game.data().players[BOB].battlefield[0].id;
    let elves = game.data().players[BOB].battlefield[1].id;

    for index in 0..3 {
        game.tap_permanent(ALICE, index).unwrap();
    }
    game.play_card(ALICE, 0, 0, vec![Target::Permanent(bears)], Vec::new()).unwrap();
    let shock = game.data().stack[0].id;
    game.play_card(ALICE, 0, 0, vec![Target::Spell(shock)], Vec::new()).unwrap();
    both_pass(&mut game);

    match &game.interaction().unwrap().kind {
        InteractionKind::PermanentChoice { valid, .. } => {
            assert!(valid.contains(&bears));
            assert!(valid.contains(&elves));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(game.handle_permanent_chosen(BOB, elves).is_err());
    game.handle_permanent_chosen(ALICE, elves).unwrap();
    assert!(game.data().log.iter().any(|l| l == "alice copies Shock."));
    assert!(game.data().log.iter().any(|l| l == "Copy of Shock now targets Llanowar Elves."));
    assert_eq!(game.data().stack.len(), 2);

    both_pass(&mut game);
    assert!(game.data().permanent(elves).is_none());
    assert!(game.data().permanent(bears).is_some());
    both_pass(&mut game);

    assert!(game.data().players[BOB].battlefield.is_empty());
    let graveyard: Vec<&str> = game.data().players[ALICE].graveyard.iter().map(|c| c.name()).collect();
    assert_eq!(graveyard, vec!["Fork", "Shock"]);
}

/// Deflection moves Shock off its target onto another legal creature.
#[test]
fn test_deflection_changes_target() {
    let mut game = GameBuilder::new()
        .with_player("alice")
        .with_player("bob")
        .with_permanent(ALICE, card("Mountain"))
        .with_permanent(ALICE, card("Llanowar Elves"))
        .with_permanent(BOB, card("Island"))
        .with_permanent(BOB, card("Island"))
        .with_permanent(BOB, card("Island"))
        .with_permanent(BOB, card("Island"))
        .with_permanent(BOB, card("Grizzly Bears"))
        .with_hand_card(ALICE, card("Shock"))
        .with_hand_card(BOB, card("Deflection"))
        .build()
        .unwrap();
    let elves = game.data().players[ALICE].battlefield[1].id;
    let bears = game.data().players[BOB].battlefield[4].id;

    game.tap_permanent(ALICE, 0).unwrap();
    game.play_card(ALICE, 0, 0, vec![Target::Permanent(bears)], Vec::new()).unwrap();
    let shock = game.data().stack[0].id;
    game.pass_priority(ALICE).unwrap();
    for index in 0..4 {
        game.tap_permanent(BOB, index).unwrap();
    }
    game.play_card(BOB, 0, 0, vec![Target::Spell(shock)], Vec::new()).unwrap();
    both_pass(&mut game);

    match &game.interaction().unwrap().kind {
        InteractionKind::PermanentChoice { valid, .. } => assert_eq!(valid, &vec![elves]),
        other => panic!("unexpected {other:?}"),
    }
    assert!(game.handle_permanent_chosen(BOB, bears).is_err());
    game.handle_permanent_chosen(BOB, elves).unwrap();
    assert!(game.data().log.iter().any(|l| l == "Shock now targets Llanowar Elves."));
    assert_eq!(game.data().players[BOB].graveyard[0].name(), "Deflection");

    both_pass(&mut game);
    assert!(game.data().stack.is_empty());
    assert!(game.data().permanent(elves).is_none());
    assert_eq!(game.data().permanent(bears).unwrap().damage, 0);
}
