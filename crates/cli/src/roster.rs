//! Encounter documents authored by hand.
//!
//! The file carries the roster together with the resolved attributes of each
//! combatant, since the driver has no character-sheet pipeline of its own.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use initiative_core::{
    ActorAttributes, ActorId, Combatant, CombatantId, Controller, EncounterState,
    StaticAttributes,
};

const DEMO: &str = include_str!("../../../demos/bridge.json");

#[derive(Debug, Deserialize)]
struct EncounterFile {
    id: String,
    combatants: Vec<CombatantEntry>,
}

#[derive(Debug, Deserialize)]
struct CombatantEntry {
    id: u32,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    controller: Controller,
    #[serde(default)]
    initiative: Option<f64>,
    #[serde(default)]
    defeated: bool,
    #[serde(default)]
    attributes: ActorAttributes,
}

/// A loaded encounter with everything the scheduler needs to run it.
#[derive(Debug)]
pub struct Roster {
    pub state: EncounterState,
    pub attributes: StaticAttributes,
    names: HashMap<CombatantId, String>,
}

impl Roster {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                Self::parse(&raw).with_context(|| format!("parsing {}", path.display()))
            }
            None => Self::parse(DEMO).context("parsing bundled demo encounter"),
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let file: EncounterFile = serde_json::from_str(raw)?;
        ensure!(!file.id.trim().is_empty(), "encounter id is empty");

        let mut attributes = StaticAttributes::new();
        let mut names = HashMap::new();
        let mut combatants = Vec::with_capacity(file.combatants.len());

        for entry in file.combatants {
            let id = CombatantId(entry.id);
            ensure!(!names.contains_key(&id), "combatant {id} listed twice");

            // Each combatant is its own actor.
            let actor = ActorId(entry.id);
            attributes.insert(actor, entry.attributes);
            names.insert(id, entry.name.unwrap_or_else(|| format!("#{}", entry.id)));

            let mut combatant = Combatant::new(id, actor, entry.controller);
            combatant.initiative = entry.initiative;
            combatant.defeated = entry.defeated;
            combatants.push(combatant);
        }

        Ok(Self {
            state: EncounterState::with_combatants(file.id, combatants),
            attributes,
            names,
        })
    }

    pub fn name_of(&self, id: CombatantId) -> &str {
        self.names.get(&id).map(String::as_str).unwrap_or("?")
    }
}
