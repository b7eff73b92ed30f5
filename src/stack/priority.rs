//! Priority passing.
//!
//! Priority goes around the table in APNAP order. The holder is the first
//! player, starting from the active player, who has not passed since the
//! last state change. When every player has passed in succession, the top
//! of the stack resolves, or the step ends if the stack is empty.
//!
//! Any stack push or step change clears the recorded passes.

use crate::core::{GameData, GameError, PlayerId, Result};

impl GameData {
    /// The player who may act now, if anyone.
    ///
    /// Nobody holds priority while the game is not running, while an
    /// interaction is pending, or during untap and cleanup.
    #[must_use]
    pub fn priority_holder(&self) -> Option<PlayerId> {
        if !self.is_running() || self.interaction.is_pending() || !self.step.has_priority() {
            return None;
        }
        self.apnap_order()
            .into_iter()
            .find(|player| !self.priority_passed.contains(player))
    }

    /// Fail unless `player` holds priority.
    pub fn require_priority(&self, player: PlayerId) -> Result<()> {
        self.require_running()?;
        if let Some(interaction) = self.interaction.current() {
            return Err(GameError::illegal(format!(
                "Waiting for {} to make a {}",
                self.player_name(interaction.player),
                interaction.awaiting()
            )));
        }
        if self.priority_holder() != Some(player) {
            return Err(GameError::NotYourPriority(player));
        }
        Ok(())
    }

    /// Record a pass. Returns whether every player has now passed.
    pub fn record_pass(&mut self, player: PlayerId) -> bool {
        self.priority_passed.insert(player);
        self.all_passed()
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.apnap_order()
            .iter()
            .all(|player| self.priority_passed.contains(player))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{GameConfig, GameData, GameStatus, PlayerId};
    use crate::rules::Step;

    fn running(players: usize) -> GameData {
        let mut data = GameData::new(GameConfig::default().with_player_count(players));
        for i in 0..players {
            data.add_player(format!("p{i}"), Vec::new());
        }
        data.status = GameStatus::Running;
        data.step = Step::PrecombatMain;
        data
    }

    #[test]
    fn test_holder_follows_apnap() {
        let mut data = running(3);
        data.active_player = PlayerId::new(1);
        assert_eq!(data.priority_holder(), Some(PlayerId::new(1)));

        assert!(!data.record_pass(PlayerId::new(1)));
        assert_eq!(data.priority_holder(), Some(PlayerId::new(2)));
        assert!(!data.record_pass(PlayerId::new(2)));
        assert_eq!(data.priority_holder(), Some(PlayerId::new(0)));
        assert!(data.record_pass(PlayerId::new(0)));
        assert_eq!(data.priority_holder(), None);

        data.clear_priority_passes();
        assert_eq!(data.priority_holder(), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_no_priority_in_untap_or_cleanup() {
        let mut data = running(2);
        data.step = Step::Untap;
        assert_eq!(data.priority_holder(), None);
        data.step = Step::Cleanup;
        assert_eq!(data.priority_holder(), None);
    }

    #[test]
    fn test_require_priority() {
        let data = running(2);
        assert!(data.require_priority(PlayerId::new(0)).is_ok());
        assert!(data.require_priority(PlayerId::new(1)).is_err());
    }
}
