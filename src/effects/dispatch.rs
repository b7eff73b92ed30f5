//! Running an effect list.
//!
//! Costs were paid on announcement and statics are queried elsewhere, so
//! both are skipped. If an effect leaves an interaction pending, the run
//! stops and reports where to pick up once the answer arrives.

use crate::core::{GameData, Result};

use super::effect::Effect;
use super::resolver::{EffectResolver, Outcome, ResolverContext};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunResult {
    Completed,
    /// Stopped waiting for a player; resume at `effects[next]`.
    Suspended { next: usize },
}

/// Run `effects[start..]` in order.
pub fn run_effects(
    data: &mut GameData,
    resolver: &dyn EffectResolver,
    effects: &[Effect],
    start: usize,
    ctx: &ResolverContext,
) -> Result<RunResult> {
    for (i, effect) in effects.iter().enumerate().skip(start) {
        if effect.is_cost() || effect.is_static() {
            continue;
        }
        let outcome = resolver.apply(effect, ctx, data)?;
        if outcome == Outcome::Suspended || data.interaction.is_pending() {
            tracing::trace!(source = %ctx.source_name, next = i + 1, "effect run suspended");
            return Ok(RunResult::Suspended { next: i + 1 });
        }
    }
    Ok(RunResult::Completed)
}
