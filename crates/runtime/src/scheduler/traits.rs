use initiative_core::{CombatantId, EncounterId};

use crate::api::Result;

use super::NextTurnOutcome;

/// Turn-order hooks a combat host drives.
pub trait TurnScheduler {
    /// Starts combat: rolls everyone and freezes the first order.
    fn setup_turns(&self, encounter: &EncounterId) -> Result<()>;

    /// Moves to the next combatant, or advances the pass or round when the
    /// current pass is exhausted.
    fn next_turn(&self, encounter: &EncounterId) -> Result<NextTurnOutcome>;

    /// Starts the next round regardless of remaining actions.
    fn next_round(&self, encounter: &EncounterId) -> Result<NextTurnOutcome>;

    /// Rolls fresh initiative for the given combatants.
    fn roll_initiative(&self, encounter: &EncounterId, combatants: &[CombatantId]) -> Result<()>;
}
