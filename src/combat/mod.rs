//! Combat: declaring attackers and blockers, and dealing combat damage.
//!
//! ## Key Types
//!
//! - `DamageSubStep`: first-strike or regular damage
//! - `CombatProgress`: the damage step state carried across assignment
//!   interactions
//!
//! Every declaration is answered through an interaction; the turn engine
//! raises them when the matching step begins.

mod damage;
mod declare;

pub use damage::{
    assign_combat_damage, begin_combat_damage, run_combat_damage, trample_split,
    validate_assignment, CombatHit, CombatProgress, DamagePass, DamageSubStep,
};
pub use declare::{
    begin_declare_attackers, begin_declare_blockers, declare_attackers, declare_blockers,
    end_combat,
};
