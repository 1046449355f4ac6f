use std::collections::HashMap;

use crate::state::ActorId;

/// Resolved numeric attributes the scheduler reads for one actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActorAttributes {
    pub edge: i32,
    pub reaction: i32,
    pub intuition: i32,
    /// Number of d6 added to reaction + intuition when rolling initiative.
    pub initiative_dice: u32,
}

impl ActorAttributes {
    pub const fn new(edge: i32, reaction: i32, intuition: i32) -> Self {
        Self {
            edge,
            reaction,
            intuition,
            initiative_dice: 1,
        }
    }

    #[must_use]
    pub const fn with_initiative_dice(mut self, dice: u32) -> Self {
        self.initiative_dice = dice;
        self
    }

    /// Flat part of an initiative roll.
    pub const fn initiative_base(&self) -> i32 {
        self.reaction + self.intuition
    }
}

impl Default for ActorAttributes {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

/// Read-only view of the character-sheet pipeline.
pub trait AttributeOracle: Send + Sync {
    /// Returns the resolved attributes of an actor, if known.
    fn attributes(&self, actor: ActorId) -> Option<ActorAttributes>;

    /// Looks up any other base attribute by name.
    fn base_attribute(&self, actor: ActorId, name: &str) -> Option<i32> {
        let attributes = self.attributes(actor)?;
        match name {
            "edge" => Some(attributes.edge),
            "reaction" => Some(attributes.reaction),
            "intuition" => Some(attributes.intuition),
            _ => None,
        }
    }
}

/// Attribute table held in memory.
#[derive(Clone, Debug, Default)]
pub struct StaticAttributes {
    actors: HashMap<ActorId, ActorAttributes>,
}

impl StaticAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, actor: ActorId, attributes: ActorAttributes) {
        self.actors.insert(actor, attributes);
    }

    #[must_use]
    pub fn with(mut self, actor: ActorId, attributes: ActorAttributes) -> Self {
        self.insert(actor, attributes);
        self
    }
}

impl FromIterator<(ActorId, ActorAttributes)> for StaticAttributes {
    fn from_iter<T: IntoIterator<Item = (ActorId, ActorAttributes)>>(iter: T) -> Self {
        Self {
            actors: iter.into_iter().collect(),
        }
    }
}

impl AttributeOracle for StaticAttributes {
    fn attributes(&self, actor: ActorId) -> Option<ActorAttributes> {
        self.actors.get(&actor).copied()
    }
}
