//! The stack and priority.
//!
//! Spells and abilities wait on a shared LIFO stack; the last entry
//! pushed resolves first. Priority decides when: the top entry resolves
//! only after every player has passed in succession with nothing pushed
//! in between.
//!
//! ## Example
//!
//! ```
//! use mtg_rules_engine::core::{GameConfig, GameData, GameStatus, PlayerId};
//! use mtg_rules_engine::rules::Step;
//!
//! let mut data = GameData::new(GameConfig::default());
//! data.add_player("alice", Vec::new());
//! data.add_player("bob", Vec::new());
//! data.status = GameStatus::Running;
//! data.step = Step::PrecombatMain;
//!
//! assert_eq!(data.priority_holder(), Some(PlayerId::new(0)));
//! assert!(!data.record_pass(PlayerId::new(0)));
//! assert!(data.record_pass(PlayerId::new(1)));
//! ```

mod entry;
mod priority;
mod resolve;

pub use entry::{StackEntry, StackEntryId, StackEntryType};
pub use resolve::{
    counter_entry, finish_resolution, fizzles, next_stack_id, push_entry, resolve_top,
    resume_resolution,
};
