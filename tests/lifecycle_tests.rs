//! Match lifecycle integration tests.
//!
//! Creating and joining a table, the mulligan phase, the end of the game,
//! replay determinism and state snapshots.

use std::sync::Arc;

use mtg_rules_engine::cards::catalog::test_catalog;
use mtg_rules_engine::cards::Card;
use mtg_rules_engine::core::{GameConfig, GameData, GameError, GameStatus, PlayerId};
use mtg_rules_engine::effects::Target;
use mtg_rules_engine::rules::{Game, GameBuilder, Step};
use mtg_rules_engine::EntityId;

const ALICE: PlayerId = PlayerId::new(0);
const BOB: PlayerId = PlayerId::new(1);

fn deck() -> Vec<Arc<Card>> {
    test_catalog()
        .unwrap()
        .deck(&[("Mountain", 12), ("Grizzly Bears", 4), ("Shock", 4)])
        .unwrap()
}

/// Engine diagnostics for `RUST_LOG=mtg_rules_engine=debug cargo test`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_test_writer()
        .try_init();
}

fn table(seed: u64) -> Game {
    init_tracing();
    let config = GameConfig::default().with_seed(seed);
    let mut game = Game::create_game(config, "alice", deck()).unwrap();
    game.join_game("bob", deck()).unwrap();
    game
}

// =============================================================================
// Seating and mulligans
// =============================================================================

/// The table waits for every seat, then deals opening hands.
#[test]
fn test_join_then_deal() {
    let config = GameConfig::default().with_seed(3);
    let mut game = Game::create_game(config, "alice", deck()).unwrap();
    assert_eq!(game.status(), GameStatus::WaitingForPlayers);
    assert!(game.data().players[ALICE].hand.is_empty());

    assert!(game.join_game("alice", deck()).is_err());
    assert_eq!(game.join_game("bob", deck()).unwrap(), BOB);

    assert_eq!(game.status(), GameStatus::Mulligan);
    for (_, player) in game.data().players.iter() {
        assert_eq!(player.hand.len(), 7);
        assert_eq!(player.library.len(), 13);
    }
    assert!(game.join_game("carol", deck()).is_err());
}

/// Priority actions are refused until everyone has kept.
#[test]
fn test_no_priority_during_mulligans() {
    let mut game = table(5);
    let starting = game.data().starting_player;
    assert!(matches!(
        game.pass_priority(starting),
        Err(GameError::GameNotRunning)
    ));
}

/// A mulligan costs one card on the bottom once the hand is kept.
#[test]
fn test_mulligan_to_six() {
    let mut game = table(11);
    game.mulligan(ALICE).unwrap();
    game.keep_hand(ALICE).unwrap();
    assert_eq!(game.data().players[ALICE].cards_to_bottom, 1);
    assert!(game.mulligan(ALICE).is_err());

    game.keep_hand(BOB).unwrap();
    assert_eq!(game.status(), GameStatus::Mulligan);

    assert!(game.bottom_cards(ALICE, vec![0, 1]).is_err());
    let bottomed = game.data().players[ALICE].hand[3].id;
    game.bottom_cards(ALICE, vec![3]).unwrap();

    let alice = &game.data().players[ALICE];
    assert_eq!(alice.hand.len(), 6);
    assert_eq!(alice.library.back().map(|c| c.id), Some(bottomed));
    assert_eq!(game.status(), GameStatus::Running);
    assert_eq!(game.data().turn_number, 1);
    assert_eq!(game.data().step, Step::PrecombatMain);
}

/// The first player does not draw on their first turn.
#[test]
fn test_first_player_skips_draw() {
    let mut game = table(17);
    game.keep_hand(ALICE).unwrap();
    game.keep_hand(BOB).unwrap();

    let starting = game.data().starting_player;
    assert_eq!(game.data().players[starting].hand.len(), 7);
    assert!(game
        .data()
        .log
        .iter()
        .any(|l| l.ends_with("skips the draw (first turn).")));
}

// =============================================================================
// End of game
// =============================================================================

/// A player at zero life loses and the game refuses further actions.
#[test]
fn test_lethal_damage_ends_game() {
    let mountain = test_catalog().unwrap().get_by_name("Mountain").unwrap();
    let bolt = test_catalog().unwrap().get_by_name("Lightning Bolt").unwrap();
    let mut game = GameBuilder::new()
        .with_player("alice")
        .with_player("bob")
        .with_permanent(ALICE, mountain)
        .with_hand_card(ALICE, bolt)
        .with_life(BOB, 3)
        .build()
        .unwrap();

    game.tap_permanent(ALICE, 0).unwrap();
    game.play_card(ALICE, 0, 0, vec![Target::Player(BOB)], Vec::new()).unwrap();
    game.pass_priority(ALICE).unwrap();
    game.pass_priority(BOB).unwrap();

    assert_eq!(game.status(), GameStatus::Finished { winner: Some(ALICE) });
    assert!(game.data().players[BOB].has_lost);
    assert!(matches!(
        game.pass_priority(ALICE),
        Err(GameError::GameNotRunning)
    ));
}

// =============================================================================
// Determinism and snapshots
// =============================================================================

/// The same seed and the same actions give the same game.
#[test]
fn test_replay_is_deterministic() {
    let play = |seed| {
        let mut game = table(seed);
        game.mulligan(BOB).unwrap();
        game.keep_hand(ALICE).unwrap();
        game.keep_hand(BOB).unwrap();
        game.bottom_cards(BOB, vec![0]).unwrap();
        game
    };
    let a = play(42);
    let b = play(42);

    assert_eq!(a.data().starting_player, b.data().starting_player);
    assert_eq!(a.data().log, b.data().log);
    for player in [ALICE, BOB] {
        let ids = |game: &Game| -> Vec<EntityId> {
            game.data().players[player].hand.iter().map(|c| c.id).collect()
        };
        assert_eq!(ids(&a), ids(&b));
    }
    assert_eq!(a.data().history, b.data().history);
}

/// Game state survives a JSON round trip and a binary snapshot.
#[test]
fn test_snapshot_round_trip() {
    let mut game = table(8);
    game.keep_hand(ALICE).unwrap();
    game.keep_hand(BOB).unwrap();

    let json = serde_json::to_string(game.data()).unwrap();
    let restored: GameData = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.step, game.data().step);
    assert_eq!(restored.players[ALICE].library, game.data().players[ALICE].library);
    assert_eq!(restored.history, game.data().history);

    let bytes = game.data().snapshot().unwrap();
    let restored = GameData::restore(&bytes).unwrap();
    assert_eq!(restored.log, game.data().log);
    assert_eq!(restored.players[BOB].hand, game.data().players[BOB].hand);
    assert_eq!(restored.status, GameStatus::Running);
}
