//! Suspension of engine work until a player answers.
//!
//! ## Key Types
//!
//! - `Interaction`: which player must respond, and the `InteractionKind`
//!   payload with the legal choice set
//! - `AwaitingInput`: the kind discriminant, used in error messages
//! - `InteractionState`: one current interaction, a FIFO queue behind it,
//!   and the parked `Continuation`s to run when both are empty
//!
//! Handlers for each kind live in `rules::handlers`.

pub mod kind;
pub mod state;

pub use kind::{
    AwaitingInput, BlockerLethal, CardChoicePurpose, Interaction, InteractionKind, MayOrigin,
    PermanentChoicePurpose,
};
pub use state::{Continuation, InteractionState};
