//! Repository layer for the shared encounter document.
//!
//! Every party reads and writes the same [`EncounterState`] documents keyed by
//! encounter id. Each call is atomic on its own; the scheduler performs one
//! load and at most one save per operation.
//!
//! [`EncounterState`]: initiative_core::EncounterState

mod error;
mod file;
mod memory;
mod traits;

pub use error::RepositoryError;
pub use file::FileEncounterRepository;
pub use memory::InMemoryEncounterRepo;
pub use traits::EncounterRepository;
