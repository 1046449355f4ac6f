//! Runtime orchestration for the initiative scheduler.
//!
//! This crate wires the pure rules of `initiative-core` to a shared document
//! store, a relay channel between parties, and an event bus. Consumers embed
//! [`Runtime`] on each party and drive turns through [`EncounterScheduler`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the error types downstream clients interact with
//! - [`scheduler`] loads, transitions, and saves encounters
//! - [`relay`] carries advance requests to the privileged party
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`repository`] provides the document stores
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod relay;
pub mod repository;
pub mod runtime;
pub mod scheduler;

mod workers;

pub use api::{Result, RuntimeError};
pub use events::{Event, EventBus, Topic, TurnEvent};
pub use relay::{
    AuthorityGate, BroadcastRelay, GateOutcome, Privilege, RelayChannel, RelayKind, RelayMessage,
    RelayPayload, Role,
};
pub use repository::{
    EncounterRepository, FileEncounterRepository, InMemoryEncounterRepo, RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use scheduler::{
    EncounterLocks, EncounterScheduler, NextTurnOutcome, NoopClock, RoundClock, SchedulerContext,
    TurnScheduler,
};
pub use workers::RelayWorker;
