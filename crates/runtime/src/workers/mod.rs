//! Worker tasks that back the runtime orchestration.
//!
//! The relay worker runs only on the privileged party and commits advance
//! requests sent by everyone else.

mod relay;

pub use relay::RelayWorker;
