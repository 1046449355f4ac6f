//! In-memory EncounterRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use initiative_core::{EncounterId, EncounterState};

use crate::api::Result;
use crate::repository::{EncounterRepository, RepositoryError};

/// In-memory implementation of EncounterRepository.
///
/// Stores documents keyed by encounter id. Shared between parties by wrapping
/// it in an `Arc`.
pub struct InMemoryEncounterRepo {
    encounters: RwLock<HashMap<EncounterId, EncounterState>>,
}

impl InMemoryEncounterRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            encounters: RwLock::new(HashMap::new()),
        }
    }

    /// Create with the given encounters already stored.
    pub fn with_encounters(encounters: impl IntoIterator<Item = EncounterState>) -> Self {
        let encounters = encounters
            .into_iter()
            .map(|state| (state.id.clone(), state))
            .collect();
        Self {
            encounters: RwLock::new(encounters),
        }
    }
}

impl Default for InMemoryEncounterRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl EncounterRepository for InMemoryEncounterRepo {
    fn load(&self, id: &EncounterId) -> Result<Option<EncounterState>> {
        let encounters = self
            .encounters
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(encounters.get(id).cloned())
    }

    fn save(&self, state: &EncounterState) -> Result<()> {
        let mut encounters = self
            .encounters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        encounters.insert(state.id.clone(), state.clone());
        Ok(())
    }

    fn delete(&self, id: &EncounterId) -> Result<()> {
        let mut encounters = self
            .encounters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        encounters.remove(id);
        Ok(())
    }

    fn list_encounters(&self) -> Result<Vec<EncounterId>> {
        let encounters = self
            .encounters
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut ids: Vec<EncounterId> = encounters.keys().cloned().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
