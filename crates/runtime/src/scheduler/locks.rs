//! Per-encounter write locks.
//!
//! A scheduler call loads the document, runs one transition, and saves the
//! result. The lock makes that sequence atomic against every other scheduler
//! built from the same context, such as the relay worker and direct game
//! master calls sharing one runtime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use initiative_core::EncounterId;

use crate::api::Result;
use crate::repository::RepositoryError;

/// Lock table shared by clones of a scheduler context.
#[derive(Clone, Default)]
pub struct EncounterLocks {
    table: Arc<Mutex<HashMap<EncounterId, Arc<Mutex<()>>>>>,
}

impl EncounterLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock guarding one encounter, creating it on first use.
    pub fn lock_for(&self, encounter: &EncounterId) -> Result<Arc<Mutex<()>>> {
        let mut table = self
            .table
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(Arc::clone(table.entry(encounter.clone()).or_default()))
    }
}

/// Acquires `lock`, reporting poisoning as a repository failure.
pub(crate) fn acquire(lock: &Mutex<()>) -> Result<MutexGuard<'_, ()>> {
    lock.lock()
        .map_err(|_| RepositoryError::LockPoisoned.into())
}
