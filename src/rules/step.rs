//! Turn steps in their fixed cyclic order.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Step {
    Untap,
    Upkeep,
    Draw,
    PrecombatMain,
    BeginCombat,
    DeclareAttackers,
    DeclareBlockers,
    CombatDamage,
    EndCombat,
    PostcombatMain,
    EndStep,
    Cleanup,
}

impl Step {
    pub const ALL: [Step; 12] = [
        Step::Untap,
        Step::Upkeep,
        Step::Draw,
        Step::PrecombatMain,
        Step::BeginCombat,
        Step::DeclareAttackers,
        Step::DeclareBlockers,
        Step::CombatDamage,
        Step::EndCombat,
        Step::PostcombatMain,
        Step::EndStep,
        Step::Cleanup,
    ];

    /// The following step, or `None` after cleanup (the turn ends).
    ///
    /// ```
    /// use mtg_rules_engine::rules::Step;
    ///
    /// assert_eq!(Step::Draw.next(), Some(Step::PrecombatMain));
    /// assert_eq!(Step::Cleanup.next(), None);
    /// ```
    #[must_use]
    pub fn next(self) -> Option<Step> {
        Self::ALL.get(self as usize + 1).copied()
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Step::Untap => "Untap",
            Step::Upkeep => "Upkeep",
            Step::Draw => "Draw",
            Step::PrecombatMain => "Precombat Main",
            Step::BeginCombat => "Beginning of Combat",
            Step::DeclareAttackers => "Declare Attackers",
            Step::DeclareBlockers => "Declare Blockers",
            Step::CombatDamage => "Combat Damage",
            Step::EndCombat => "End of Combat",
            Step::PostcombatMain => "Postcombat Main",
            Step::EndStep => "End Step",
            Step::Cleanup => "Cleanup",
        }
    }

    #[must_use]
    pub const fn is_main(self) -> bool {
        matches!(self, Step::PrecombatMain | Step::PostcombatMain)
    }

    /// Players receive priority in every step except untap and cleanup.
    #[must_use]
    pub const fn has_priority(self) -> bool {
        !matches!(self, Step::Untap | Step::Cleanup)
    }

    #[must_use]
    pub const fn is_combat(self) -> bool {
        matches!(
            self,
            Step::BeginCombat
                | Step::DeclareAttackers
                | Step::DeclareBlockers
                | Step::CombatDamage
                | Step::EndCombat
        )
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
