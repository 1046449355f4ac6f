//! Collaborators the engine reads but never owns.
//!
//! Oracles expose resolved actor attributes and dice outcomes. The
//! [`EncounterEnv`] aggregate bundles them with the configuration so the
//! engine can access everything it needs without hard coupling to concrete
//! implementations.
mod attributes;
mod dice;

pub use attributes::{ActorAttributes, AttributeOracle, StaticAttributes};
pub use dice::{DiceOracle, PcgDice, ScriptedDice};

use crate::config::InitiativeConfig;
use crate::rules::ScoreRules;
use crate::state::{ActorId, Combatant};

/// Read-only collaborators handed to every transition.
#[derive(Clone, Copy)]
pub struct EncounterEnv<'a> {
    attributes: &'a dyn AttributeOracle,
    dice: &'a dyn DiceOracle,
    config: &'a InitiativeConfig,
}

impl<'a> EncounterEnv<'a> {
    pub fn new(
        attributes: &'a dyn AttributeOracle,
        dice: &'a dyn DiceOracle,
        config: &'a InitiativeConfig,
    ) -> Self {
        Self {
            attributes,
            dice,
            config,
        }
    }

    pub fn attributes(&self) -> &'a dyn AttributeOracle {
        self.attributes
    }

    pub fn dice(&self) -> &'a dyn DiceOracle {
        self.dice
    }

    pub fn config(&self) -> &'a InitiativeConfig {
        self.config
    }

    pub fn rules(&self) -> ScoreRules {
        ScoreRules::from_config(self.config)
    }

    /// Attributes of an actor; unknown actors resolve to all zeros.
    pub fn attributes_of(&self, actor: ActorId) -> ActorAttributes {
        self.attributes.attributes(actor).unwrap_or_default()
    }

    /// Rolls a fresh initiative score: reaction + intuition + Nd6.
    pub fn roll_initiative(&self, combatant: &Combatant) -> f64 {
        let attributes = self.attributes_of(combatant.actor);
        let dice: u32 = (0..attributes.initiative_dice)
            .map(|_| self.dice.roll_d6())
            .sum();
        f64::from(attributes.initiative_base()) + f64::from(dice)
    }
}

impl core::fmt::Debug for EncounterEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EncounterEnv")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
