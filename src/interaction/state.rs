//! The "what are we waiting for" register.
//!
//! At most one interaction is current. Effects that need several
//! sequential choices (every player returning a permanent, several
//! attackers assigning damage) request them all; the extras wait in a
//! FIFO queue and are promoted one at a time as each is answered.
//!
//! Work that must continue after the choices are made is parked as a
//! [`Continuation`]. Continuations run once the current interaction and
//! the queue are both empty, most recent first.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::kind::{AwaitingInput, Interaction};
use crate::combat::CombatProgress;
use crate::core::{GameError, PlayerId, Result};
use crate::effects::{Effect, ResolverContext};
use crate::stack::StackEntry;

/// A resume point for suspended engine work.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Continuation {
    /// A stack entry stopped resolving at `effects[next]`.
    Resolution {
        entry: StackEntry,
        effects: Vec<Effect>,
        next: usize,
        ctx: ResolverContext,
    },
    /// The rest of an accepted "may" effect list. Unlike `Resolution`,
    /// finishing it does not finish any stack entry.
    Effects {
        effects: Vec<Effect>,
        next: usize,
        ctx: ResolverContext,
    },
    /// Combat damage is waiting for assignments.
    CombatDamage(CombatProgress),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionState {
    current: Option<Interaction>,
    queue: Vector<Interaction>,
    resume: Vec<Continuation>,
}

impl InteractionState {
    /// Raise an interaction, or queue it behind the current one.
    pub fn request(&mut self, interaction: Interaction) {
        tracing::debug!(
            player = %interaction.player,
            awaiting = %interaction.awaiting(),
            queued = self.current.is_some(),
            "interaction requested"
        );
        if self.current.is_none() {
            self.current = Some(interaction);
        } else {
            self.queue.push_back(interaction);
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Interaction> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn awaiting(&self) -> Option<AwaitingInput> {
        self.current.as_ref().map(Interaction::awaiting)
    }

    /// Nothing pending, queued, or parked.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.queue.is_empty() && self.resume.is_empty()
    }

    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// The current interaction, if it is `expected` and belongs to
    /// `player`.
    pub fn expect(&self, player: PlayerId, expected: AwaitingInput) -> Result<&Interaction> {
        let current = self.current.as_ref().ok_or_else(|| GameError::WrongInteraction {
            expected: "no interaction".into(),
            got: expected.to_string(),
        })?;
        if current.awaiting() != expected {
            return Err(GameError::WrongInteraction {
                expected: current.awaiting().to_string(),
                got: expected.to_string(),
            });
        }
        if current.player != player {
            return Err(GameError::illegal(format!(
                "Waiting for {} to make a {}",
                current.player,
                current.awaiting()
            )));
        }
        Ok(current)
    }

    /// Remove and return the current interaction without promoting the
    /// next one.
    pub fn take_current(&mut self) -> Option<Interaction> {
        self.current.take()
    }

    /// Promote the next queued interaction if nothing is current.
    pub fn advance(&mut self) -> bool {
        if self.current.is_none() {
            self.current = self.queue.pop_front();
        }
        self.current.is_some()
    }

    pub fn suspend(&mut self, continuation: Continuation) {
        self.resume.push(continuation);
    }

    pub fn pop_continuation(&mut self) -> Option<Continuation> {
        self.resume.pop()
    }

    pub fn top_continuation_mut(&mut self) -> Option<&mut Continuation> {
        self.resume.last_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityId;
    use crate::interaction::InteractionKind;

    fn color_choice(player: u8) -> Interaction {
        Interaction::new(
            PlayerId::new(player),
            InteractionKind::ColorChoice {
                permanent: EntityId(1),
            },
        )
    }

    #[test]
    fn test_only_one_current() {
        let mut state = InteractionState::default();
        state.request(color_choice(0));
        state.request(color_choice(1));

        assert_eq!(state.current().map(|i| i.player), Some(PlayerId::new(0)));
        assert_eq!(state.queued(), 1);

        state.take_current();
        assert!(!state.is_pending());
        assert!(state.advance());
        assert_eq!(state.current().map(|i| i.player), Some(PlayerId::new(1)));
        assert_eq!(state.queued(), 0);
    }

    #[test]
    fn test_expect_checks_kind_and_player() {
        let mut state = InteractionState::default();
        assert!(matches!(
            state.expect(PlayerId::new(0), AwaitingInput::ColorChoice),
            Err(GameError::WrongInteraction { .. })
        ));

        state.request(color_choice(0));
        assert!(state.expect(PlayerId::new(0), AwaitingInput::ColorChoice).is_ok());
        assert!(matches!(
            state.expect(PlayerId::new(0), AwaitingInput::CardChoice),
            Err(GameError::WrongInteraction { .. })
        ));
        assert!(matches!(
            state.expect(PlayerId::new(1), AwaitingInput::ColorChoice),
            Err(GameError::IllegalAction(_))
        ));
    }

    #[test]
    fn test_idle() {
        let mut state = InteractionState::default();
        assert!(state.is_idle());
        state.request(color_choice(0));
        assert!(!state.is_idle());
        state.take_current();
        assert!(state.is_idle());
    }
}
