//! Turn scheduling over the shared encounter store.
//!
//! [`EncounterScheduler`] is the only writer of encounter documents in the
//! runtime. Every operation loads the current document, runs one transition
//! through the round engine, and saves the result; rejected transitions save
//! nothing.

mod context;
mod encounter;
mod locks;
mod traits;

pub use context::{NoopClock, RoundClock, SchedulerContext};
pub use encounter::{EncounterScheduler, NextTurnOutcome};
pub use locks::EncounterLocks;
pub use traits::TurnScheduler;
