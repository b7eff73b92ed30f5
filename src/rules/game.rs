//! The `Game` facade: one match and its public operations.
//!
//! Every inbound operation is transactional. It runs against a clone of
//! the current `GameData` (O(1) thanks to `im`), then lets the engine
//! settle: parked continuations run, state-based actions apply and
//! auto-pass skips windows nobody wants. Only when all of that succeeds
//! is the clone committed and the action appended to the history. An
//! error leaves the match exactly as it was.
//!
//! ## Example
//!
//! ```
//! use mtg_rules_engine::cards::catalog::test_catalog;
//! use mtg_rules_engine::core::{GameConfig, GameStatus};
//! use mtg_rules_engine::rules::Game;
//!
//! let catalog = test_catalog().unwrap();
//! let deck = catalog.deck(&[("Forest", 20), ("Grizzly Bears", 20)]).unwrap();
//!
//! let mut game = Game::create_game(GameConfig::default(), "alice", deck.clone()).unwrap();
//! assert_eq!(game.status(), GameStatus::WaitingForPlayers);
//!
//! let bob = game.join_game("bob", deck).unwrap();
//! assert_eq!(game.status(), GameStatus::Mulligan);
//! assert_eq!(game.data().players[bob].hand.len(), 7);
//! ```

use std::sync::Arc;

use smallvec::SmallVec;

use crate::cards::{Card, CardInstance, Permanent};
use crate::combat;
use crate::core::{
    Action, ActionRecord, EntityId, GameConfig, GameData, GameError, GameStatus, PlayerId, Result,
};
use crate::effects::{EffectResolver, StandardResolver, Target};
use crate::interaction::Interaction;
use crate::mana::Color;

use super::step::Step;
use super::{casting, handlers, mulligan, turn};

/// One match.
#[derive(Clone)]
pub struct Game {
    data: GameData,
    resolver: Arc<dyn EffectResolver>,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("status", &self.data.status)
            .field("turn", &self.data.turn_number)
            .field("step", &self.data.step)
            .finish_non_exhaustive()
    }
}

impl Game {
    // === Lifecycle ===

    /// Open a table with its first player seated.
    pub fn create_game(config: GameConfig, creator: &str, deck: Vec<Arc<Card>>) -> Result<Self> {
        config.validate()?;
        let mut data = GameData::new(config);
        data.add_player(creator, deck);
        tracing::info!(creator, seats = data.config.player_count, "game created");
        Ok(Self {
            data,
            resolver: Arc::new(StandardResolver),
        })
    }

    /// Use a different effect resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn EffectResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Seat a player. The last seat starts the mulligan phase.
    pub fn join_game(&mut self, name: &str, deck: Vec<Arc<Card>>) -> Result<PlayerId> {
        if self.data.status != GameStatus::WaitingForPlayers {
            return Err(GameError::illegal("The game has already started"));
        }
        if self.data.players.iter().any(|(_, state)| state.name == name) {
            return Err(GameError::illegal(format!("{name} is already seated")));
        }
        let mut draft = self.data.clone();
        let player = draft.add_player(name, deck);
        draft.push_log(format!("{name} joins the game."));
        if draft.player_count() == draft.config.player_count {
            mulligan::begin_mulligans(&mut draft);
        }
        self.data = draft;
        Ok(player)
    }

    pub fn keep_hand(&mut self, player: PlayerId) -> Result<()> {
        self.apply(player, Action::KeepHand)
    }

    pub fn mulligan(&mut self, player: PlayerId) -> Result<()> {
        self.apply(player, Action::Mulligan)
    }

    pub fn bottom_cards(&mut self, player: PlayerId, indices: Vec<usize>) -> Result<()> {
        self.apply(player, Action::BottomCards(indices))
    }

    // === Priority and casting ===

    pub fn play_card(
        &mut self,
        player: PlayerId,
        hand_index: usize,
        x_value: u32,
        targets: Vec<Target>,
        damage_assignments: Vec<(Target, i32)>,
    ) -> Result<()> {
        self.apply(
            player,
            Action::PlayCard {
                hand_index,
                x_value,
                targets: SmallVec::from_vec(targets),
                damage_assignments,
            },
        )
    }

    pub fn activate_ability(
        &mut self,
        player: PlayerId,
        permanent_index: usize,
        ability_index: usize,
        x_value: u32,
        targets: Vec<Target>,
    ) -> Result<()> {
        self.apply(
            player,
            Action::ActivateAbility {
                permanent_index,
                ability_index,
                x_value,
                targets: SmallVec::from_vec(targets),
            },
        )
    }

    pub fn tap_permanent(&mut self, player: PlayerId, permanent_index: usize) -> Result<()> {
        self.apply(player, Action::TapPermanent { permanent_index })
    }

    pub fn pass_priority(&mut self, player: PlayerId) -> Result<()> {
        self.apply(player, Action::PassPriority)
    }

    pub fn set_auto_stops(&mut self, player: PlayerId, steps: Vec<Step>) -> Result<()> {
        self.apply(player, Action::SetAutoStops(steps))
    }

    // === Combat ===

    pub fn declare_attackers(&mut self, player: PlayerId, indices: Vec<usize>) -> Result<()> {
        self.apply(player, Action::DeclareAttackers(indices))
    }

    /// `(blocker_index, attacker_index)` pairs.
    pub fn declare_blockers(&mut self, player: PlayerId, pairs: Vec<(usize, usize)>) -> Result<()> {
        self.apply(player, Action::DeclareBlockers(pairs))
    }

    pub fn assign_combat_damage(
        &mut self,
        player: PlayerId,
        attacker_index: usize,
        assignments: Vec<(Target, i32)>,
    ) -> Result<()> {
        self.apply(
            player,
            Action::AssignCombatDamage {
                attacker_index,
                assignments,
            },
        )
    }

    // === Interaction handlers ===

    pub fn handle_color_chosen(&mut self, player: PlayerId, color: Color) -> Result<()> {
        self.apply(player, Action::ChooseColor(color))
    }

    pub fn handle_card_chosen(&mut self, player: PlayerId, hand_index: usize) -> Result<()> {
        self.apply(player, Action::ChooseCard(hand_index))
    }

    pub fn handle_permanent_chosen(&mut self, player: PlayerId, permanent: EntityId) -> Result<()> {
        self.apply(player, Action::ChoosePermanent(permanent))
    }

    pub fn handle_multiple_permanents_chosen(&mut self, player: PlayerId, permanents: Vec<EntityId>) -> Result<()> {
        self.apply(player, Action::ChoosePermanents(permanents))
    }

    pub fn handle_graveyard_card_chosen(&mut self, player: PlayerId, index: usize) -> Result<()> {
        self.apply(player, Action::ChooseGraveyardCard(index))
    }

    pub fn handle_library_cards_reordered(&mut self, player: PlayerId, order: Vec<usize>) -> Result<()> {
        self.apply(player, Action::ReorderLibrary(order))
    }

    pub fn handle_library_card_searched(&mut self, player: PlayerId, index: Option<usize>) -> Result<()> {
        self.apply(player, Action::SearchLibrary(index))
    }

    pub fn handle_revealed_hand_card_chosen(&mut self, player: PlayerId, index: usize) -> Result<()> {
        self.apply(player, Action::ChooseRevealedCard(index))
    }

    pub fn handle_may_ability_chosen(&mut self, player: PlayerId, accept: bool) -> Result<()> {
        self.apply(player, Action::ChooseMay(accept))
    }

    // === Dispatch ===

    /// Apply one action atomically and record it in the history.
    pub fn apply(&mut self, player: PlayerId, action: Action) -> Result<()> {
        if !self.data.players.contains(player) {
            return Err(GameError::illegal(format!("{player} is not in this game")));
        }
        let mut draft = self.data.clone();
        let (turn_number, step) = (draft.turn_number, draft.step);
        let resolver = self.resolver.as_ref();

        let outcome = perform(&mut draft, resolver, player, &action).and_then(|()| turn::settle(&mut draft, resolver));
        if let Err(err) = outcome {
            tracing::debug!(player = %player, action = action.name(), error = %err, "action rejected");
            return Err(err);
        }

        let sequence = draft.history.len() as u32;
        draft
            .history
            .push_back(ActionRecord::new(player, action, turn_number, step, sequence));
        self.data = draft;
        Ok(())
    }

    // === Queries ===

    #[must_use]
    pub fn data(&self) -> &GameData {
        &self.data
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.data.status
    }

    /// The decision the game is waiting for, if any.
    #[must_use]
    pub fn interaction(&self) -> Option<&Interaction> {
        self.data.interaction.current()
    }

    #[must_use]
    pub fn priority_holder(&self) -> Option<PlayerId> {
        self.data.priority_holder()
    }

    #[must_use]
    pub fn playable_card_indices(&self, player: PlayerId) -> Vec<usize> {
        if !self.data.players.contains(player) {
            return Vec::new();
        }
        casting::playable_card_indices(&self.data, player)
    }
}

fn perform(data: &mut GameData, resolver: &dyn EffectResolver, player: PlayerId, action: &Action) -> Result<()> {
    match action {
        Action::KeepHand => mulligan::keep_hand(data, player),
        Action::Mulligan => mulligan::mulligan(data, player),
        Action::BottomCards(indices) => mulligan::bottom_cards(data, player, indices),
        Action::PlayCard {
            hand_index,
            x_value,
            targets,
            damage_assignments,
        } => casting::play_card(data, player, *hand_index, *x_value, targets, damage_assignments),
        Action::ActivateAbility {
            permanent_index,
            ability_index,
            x_value,
            targets,
        } => casting::activate_ability(data, resolver, player, *permanent_index, *ability_index, *x_value, targets),
        Action::TapPermanent { permanent_index } => casting::tap_permanent(data, player, *permanent_index),
        Action::PassPriority => turn::pass_priority(data, resolver, player),
        Action::SetAutoStops(steps) => turn::set_auto_stops(data, player, steps),
        Action::DeclareAttackers(indices) => combat::declare_attackers(data, player, indices),
        Action::DeclareBlockers(pairs) => combat::declare_blockers(data, player, pairs),
        Action::AssignCombatDamage {
            attacker_index,
            assignments,
        } => combat::assign_combat_damage(data, player, *attacker_index, assignments),
        Action::ChooseColor(color) => handlers::handle_color_chosen(data, player, *color),
        Action::ChooseCard(index) => handlers::handle_card_chosen(data, player, *index),
        Action::ChoosePermanent(id) => handlers::handle_permanent_chosen(data, player, *id),
        Action::ChoosePermanents(ids) => handlers::handle_multiple_permanents_chosen(data, player, ids),
        Action::ChooseGraveyardCard(index) => handlers::handle_graveyard_card_chosen(data, player, *index),
        Action::ReorderLibrary(order) => handlers::handle_library_cards_reordered(data, player, order),
        Action::SearchLibrary(index) => handlers::handle_library_card_searched(data, player, *index),
        Action::ChooseRevealedCard(index) => handlers::handle_revealed_hand_card_chosen(data, player, *index),
        Action::ChooseMay(accept) => handlers::handle_may_ability_chosen(data, resolver, player, *accept),
    }
}

/// Builds a running game at an arbitrary point, skipping lifecycle and
/// mulligans.
///
/// ```
/// use mtg_rules_engine::cards::catalog::test_catalog;
/// use mtg_rules_engine::core::PlayerId;
/// use mtg_rules_engine::rules::{GameBuilder, Step};
///
/// let catalog = test_catalog().unwrap();
/// let game = GameBuilder::new()
///     .with_player("alice")
///     .with_player("bob")
///     .with_permanent(PlayerId::new(0), catalog.get_by_name("Grizzly Bears").unwrap())
///     .at_step(Step::PrecombatMain)
///     .build()
///     .unwrap();
///
/// assert_eq!(game.data().players[PlayerId::new(0)].battlefield.len(), 1);
/// assert_eq!(game.priority_holder(), Some(PlayerId::new(0)));
/// ```
#[derive(Clone)]
pub struct GameBuilder {
    config: GameConfig,
    players: Vec<String>,
    libraries: Vec<(PlayerId, Vec<Arc<Card>>)>,
    permanents: Vec<(PlayerId, Arc<Card>)>,
    hand: Vec<(PlayerId, Arc<Card>)>,
    life: Vec<(PlayerId, i32)>,
    step: Step,
    active: PlayerId,
    resolver: Arc<dyn EffectResolver>,
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            players: Vec::new(),
            libraries: Vec::new(),
            permanents: Vec::new(),
            hand: Vec::new(),
            life: Vec::new(),
            step: Step::PrecombatMain,
            active: PlayerId::new(0),
            resolver: Arc::new(StandardResolver),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_player(mut self, name: impl Into<String>) -> Self {
        self.players.push(name.into());
        self
    }

    /// Cards in library order, top first.
    #[must_use]
    pub fn with_library(mut self, player: PlayerId, cards: Vec<Arc<Card>>) -> Self {
        self.libraries.push((player, cards));
        self
    }

    /// A permanent that has been under its controller's control since the
    /// start of the turn.
    #[must_use]
    pub fn with_permanent(mut self, player: PlayerId, card: Arc<Card>) -> Self {
        self.permanents.push((player, card));
        self
    }

    #[must_use]
    pub fn with_hand_card(mut self, player: PlayerId, card: Arc<Card>) -> Self {
        self.hand.push((player, card));
        self
    }

    #[must_use]
    pub fn with_life(mut self, player: PlayerId, life: i32) -> Self {
        self.life.push((player, life));
        self
    }

    #[must_use]
    pub fn at_step(mut self, step: Step) -> Self {
        self.step = step;
        self
    }

    #[must_use]
    pub fn with_active_player(mut self, player: PlayerId) -> Self {
        self.active = player;
        self
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn EffectResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn build(self) -> Result<Game> {
        let config = self.config.with_player_count(self.players.len());
        config.validate()?;
        let mut data = GameData::new(config);
        for name in self.players {
            data.add_player(name, Vec::new());
        }
        let seated = |player: PlayerId| {
            if data.players.contains(player) {
                Ok(player)
            } else {
                Err(GameError::Config(format!("{player} is not seated")))
            }
        };
        let active = seated(self.active)?;
        let mentioned = self
            .libraries
            .iter()
            .map(|(p, _)| *p)
            .chain(self.permanents.iter().map(|(p, _)| *p))
            .chain(self.hand.iter().map(|(p, _)| *p))
            .chain(self.life.iter().map(|(p, _)| *p));
        for player in mentioned {
            seated(player)?;
        }

        for (player, cards) in self.libraries {
            for card in cards {
                let id = data.ids.next_id();
                data.players[player].library.push_back(CardInstance::new(id, card, player));
            }
        }
        for (player, card) in self.permanents {
            let object = data.ids.next_id();
            let id = data.ids.next_id();
            let mut permanent = Permanent::new(id, CardInstance::new(object, card, player));
            permanent.summoning_sick = false;
            data.players[player].battlefield.push_back(permanent);
        }
        for (player, card) in self.hand {
            let id = data.ids.next_id();
            data.players[player].hand.push_back(CardInstance::new(id, card, player));
        }
        for (player, life) in self.life {
            data.players[player].life = life;
        }

        data.status = GameStatus::Running;
        data.turn_number = 1;
        data.step = self.step;
        data.active_player = active;
        data.starting_player = active;
        for (_, state) in data.players.iter_mut() {
            state.kept_hand = true;
        }
        Ok(Game {
            data,
            resolver: self.resolver,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::catalog::test_catalog;
    use crate::cards::CardRegistry;

    fn catalog() -> CardRegistry {
        test_catalog().unwrap()
    }

    fn card(name: &str) -> Arc<Card> {
        catalog().get_by_name(name).unwrap()
    }

    fn main_phase() -> Game {
        GameBuilder::new()
            .with_player("alice")
            .with_player("bob")
            .with_permanent(PlayerId::new(0), card("Mountain"))
            .with_hand_card(PlayerId::new(0), card("Shock"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_lifecycle_to_first_turn() {
        let deck = catalog().deck(&[("Forest", 20), ("Grizzly Bears", 20)]).unwrap();
        let mut game = Game::create_game(GameConfig::default().with_seed(11), "alice", deck.clone()).unwrap();
        assert!(game.keep_hand(PlayerId::new(0)).is_err());

        game.join_game("bob", deck.clone()).unwrap();
        assert!(game.join_game("carol", deck).is_err());

        for player in [PlayerId::new(0), PlayerId::new(1)] {
            game.keep_hand(player).unwrap();
        }
        assert_eq!(game.status(), GameStatus::Running);
        assert_eq!(game.data().turn_number, 1);
        assert!(game.data().step.is_main());
        assert_eq!(game.data().history.len(), 2);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut game = Game::create_game(GameConfig::default(), "alice", Vec::new()).unwrap();
        assert!(game.join_game("alice", Vec::new()).is_err());
        assert_eq!(game.data().player_count(), 1);
    }

    #[test]
    fn test_failed_action_changes_nothing() {
        let mut game = main_phase();
        let before = game.data().clone();

        let err = game
            .play_card(PlayerId::new(0), 0, 0, vec![Target::Player(PlayerId::new(1))], Vec::new())
            .unwrap_err();
        assert_eq!(err, GameError::InsufficientMana);
        assert_eq!(game.data().players[PlayerId::new(0)].hand, before.players[PlayerId::new(0)].hand);
        assert_eq!(game.data().log, before.log);
        assert!(game.data().history.is_empty());
    }

    #[test]
    fn test_history_records_turn_and_step() {
        let mut game = main_phase();
        let alice = PlayerId::new(0);
        game.tap_permanent(alice, 0).unwrap();
        game.play_card(alice, 0, 0, vec![Target::Player(PlayerId::new(1))], Vec::new())
            .unwrap();

        let history = &game.data().history;
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].action.name(), "PlayCard");
        assert_eq!(history[1].step, Step::PrecombatMain);
        assert_eq!(history[1].sequence, 1);
    }

    #[test]
    fn test_apply_matches_named_operation() {
        let mut game = main_phase();
        let alice = PlayerId::new(0);
        game.apply(alice, Action::TapPermanent { permanent_index: 0 }).unwrap();
        assert_eq!(game.data().players[alice].mana_pool.get(Color::Red), 1);
        assert!(game.apply(PlayerId::new(7), Action::PassPriority).is_err());
    }

    #[test]
    fn test_shock_resolves_after_both_pass() {
        let mut game = main_phase();
        let (alice, bob) = (PlayerId::new(0), PlayerId::new(1));
        game.tap_permanent(alice, 0).unwrap();
        game.play_card(alice, 0, 0, vec![Target::Player(bob)], Vec::new()).unwrap();

        assert!(matches!(game.pass_priority(bob), Err(GameError::NotYourPriority(_))));
        game.pass_priority(alice).unwrap();
        game.pass_priority(bob).unwrap();
        assert_eq!(game.data().players[bob].life, 18);
        assert!(game.data().stack.is_empty());
        assert_eq!(game.priority_holder(), Some(alice));
    }

    #[test]
    fn test_builder_rejects_unseated_player() {
        let result = GameBuilder::new()
            .with_player("alice")
            .with_player("bob")
            .with_life(PlayerId::new(3), 5)
            .build();
        assert!(matches!(result, Err(GameError::Config(_))));
    }
}
