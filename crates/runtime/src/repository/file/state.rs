//! File-based EncounterRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use initiative_core::{EncounterId, EncounterState};

use crate::api::Result;
use crate::repository::{EncounterRepository, RepositoryError};

/// File-based implementation of EncounterRepository.
///
/// Stores each encounter as an individual JSON document named after its id.
///
/// # File Format
///
/// Documents are stored as `encounter_{hex}.json`, where `{hex}` is the
/// lowercase hex encoding of the id's UTF-8 bytes. Distinct ids always map to
/// distinct files and no id can name a path outside the base directory. JSON
/// keeps the documents readable by every party and by hand, which matters
/// more than size for a few dozen combatants.
pub struct FileEncounterRepository {
    base_dir: PathBuf,
}

impl FileEncounterRepository {
    const PREFIX: &'static str = "encounter_";
    const EXTENSION: &'static str = "json";

    /// Create a new file-based encounter repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to an encounter file.
    fn encounter_path(&self, id: &EncounterId) -> PathBuf {
        let file_stem = hex::encode(id.as_str());
        self.base_dir
            .join(format!("{}{}.{}", Self::PREFIX, file_stem, Self::EXTENSION))
    }

    /// Recovers the id from a file stem, `None` for foreign files.
    fn decode_stem(stem: &str) -> Option<EncounterId> {
        let encoded = stem.strip_prefix(Self::PREFIX)?;
        let bytes = hex::decode(encoded).ok()?;
        String::from_utf8(bytes).ok().map(EncounterId::from)
    }
}

impl EncounterRepository for FileEncounterRepository {
    fn load(&self, id: &EncounterId) -> Result<Option<EncounterState>> {
        let path = self.encounter_path(id);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let state: EncounterState = serde_json::from_slice(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        if state.id != *id {
            return Err(RepositoryError::IdMismatch {
                expected: id.clone(),
                found: state.id,
            }
            .into());
        }

        tracing::debug!("Loaded encounter[{}] from {}", id, path.display());

        Ok(Some(state))
    }

    fn save(&self, state: &EncounterState) -> Result<()> {
        let path = self.encounter_path(&state.id);
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(state)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        // Write to temp file
        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;

        // Atomic rename
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!("Saved encounter[{}] to {}", state.id, path.display());

        Ok(())
    }

    fn delete(&self, id: &EncounterId) -> Result<()> {
        let path = self.encounter_path(id);

        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!("Deleted encounter[{}]", id);
        }

        Ok(())
    }

    fn list_encounters(&self) -> Result<Vec<EncounterId>> {
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)? {
            let path = entry.map_err(RepositoryError::Io)?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(Self::EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match Self::decode_stem(stem) {
                Some(id) => ids.push(id),
                None => tracing::debug!("Skipping foreign file {}", path.display()),
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use initiative_core::{ActorId, Combatant, CombatantId, Controller, RoundState};
    use tempfile::TempDir;

    #[test]
    fn ids_with_path_separators_stay_inside_base_dir() {
        let dir = TempDir::new().unwrap();
        let repo = FileEncounterRepository::new(dir.path()).unwrap();

        let path = repo.encounter_path(&EncounterId::from("../escape"));
        assert_eq!(path.parent(), Some(dir.path()));
    }

    #[test]
    fn ids_differing_only_in_punctuation_get_separate_documents() {
        let dir = TempDir::new().unwrap();
        let repo = FileEncounterRepository::new(dir.path()).unwrap();

        let spaced = EncounterState::new("a b");
        let mut underscored = EncounterState::new("a_b");
        underscored.round = RoundState::new(4, 1, 0);

        repo.save(&spaced).unwrap();
        repo.save(&underscored).unwrap();

        assert_ne!(
            repo.encounter_path(&spaced.id),
            repo.encounter_path(&underscored.id)
        );
        assert_eq!(
            repo.load(&spaced.id).unwrap().unwrap().round,
            RoundState::NOT_STARTED
        );
        assert_eq!(
            repo.load(&underscored.id).unwrap().unwrap().round,
            RoundState::new(4, 1, 0)
        );
        assert_eq!(
            repo.list_encounters().unwrap(),
            vec![EncounterId::from("a b"), EncounterId::from("a_b")]
        );
    }

    #[test]
    fn listing_skips_files_that_are_not_encounter_documents() {
        let dir = TempDir::new().unwrap();
        let repo = FileEncounterRepository::new(dir.path()).unwrap();
        repo.save(&EncounterState::new("cave")).unwrap();
        std::fs::write(dir.path().join("encounter_zz.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.json"), "{}").unwrap();

        assert_eq!(repo.list_encounters().unwrap(), vec![EncounterId::from("cave")]);
    }

    #[test]
    fn document_holding_another_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        let repo = FileEncounterRepository::new(dir.path()).unwrap();
        let cave = EncounterState::new("cave");
        repo.save(&cave).unwrap();

        let bridge = EncounterId::from("bridge");
        std::fs::copy(repo.encounter_path(&cave.id), repo.encounter_path(&bridge)).unwrap();

        let err = repo.load(&bridge).unwrap_err();
        assert!(matches!(
            err,
            crate::api::RuntimeError::Repository(RepositoryError::IdMismatch { ref found, .. })
                if *found == cave.id
        ));
    }

    #[test]
    fn document_survives_round_trip_without_acted_flags() {
        let dir = TempDir::new().unwrap();
        let repo = FileEncounterRepository::new(dir.path()).unwrap();

        let mut goblin = Combatant::new(CombatantId(1), ActorId(7), Controller::GameMaster)
            .with_initiative(-2.5);
        goblin.acted_this_pass = true;
        let mut state = EncounterState::with_combatants("cave", [goblin]);
        state.round = RoundState::new(2, 3, 0);

        repo.save(&state).unwrap();
        let loaded = repo.load(&state.id).unwrap().unwrap();

        assert_eq!(loaded.round, state.round);
        assert_eq!(loaded.turn_order, state.turn_order);
        let loaded_goblin = loaded.combatants.get(CombatantId(1)).unwrap();
        assert_eq!(loaded_goblin.score(), Some(-2.5));
        assert!(!loaded_goblin.acted_this_pass);
        let temp = repo.encounter_path(&state.id).with_extension("json.tmp");
        assert!(!temp.exists());
    }
}
