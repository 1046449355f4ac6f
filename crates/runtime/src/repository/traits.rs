//! Repository contract for the persisted encounter document.

use initiative_core::{EncounterId, EncounterState};

use crate::api::Result;
use crate::repository::RepositoryError;

/// Persisted-document store for encounters.
///
/// Implementations must make `save` atomic: a concurrent `load` observes
/// either the previous document or the new one, never a mix.
pub trait EncounterRepository: Send + Sync {
    /// Load an encounter by id.
    fn load(&self, id: &EncounterId) -> Result<Option<EncounterState>>;

    /// Save an encounter, replacing any previous document with the same id.
    fn save(&self, state: &EncounterState) -> Result<()>;

    /// Delete an encounter. Deleting a missing encounter is not an error.
    fn delete(&self, id: &EncounterId) -> Result<()>;

    /// List the ids of every stored encounter, sorted.
    fn list_encounters(&self) -> Result<Vec<EncounterId>> {
        Ok(vec![])
    }

    /// Load an encounter that must exist.
    fn require(&self, id: &EncounterId) -> Result<EncounterState> {
        self.load(id)?
            .ok_or_else(|| RepositoryError::EncounterNotFound(id.clone()).into())
    }
}
