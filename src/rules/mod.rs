//! Turn structure and the public game surface.
//!
//! ## Key Types
//!
//! - `Step`: the twelve steps of a turn, in order
//! - `Game`: one match; every inbound operation is a transactional method
//! - `GameBuilder`: a running game at any step, for tests and tools
//!
//! The free functions operate on `GameData` directly and do not settle;
//! `Game` wraps each one with a clone-and-commit and a `settle` pass.

mod casting;
mod game;
mod handlers;
mod mulligan;
mod sba;
mod step;
mod turn;

pub use casting::{
    activate_ability, can_tap_for_ability, play_card, playable_card_indices, potential_mana,
    tap_permanent,
};
pub use game::{Game, GameBuilder};
pub use handlers::{
    handle_card_chosen, handle_color_chosen, handle_graveyard_card_chosen,
    handle_library_card_searched, handle_library_cards_reordered, handle_may_ability_chosen,
    handle_multiple_permanents_chosen, handle_permanent_chosen, handle_revealed_hand_card_chosen,
};
pub use mulligan::{begin_mulligans, bottom_cards, keep_hand, mulligan};
pub use sba::check_state_based_actions;
pub use step::Step;
pub use turn::{advance_step, auto_pass, pass_priority, perform_step_action, set_auto_stops, settle};
