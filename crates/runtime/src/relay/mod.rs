//! Request/commit split between privileged and non-privileged parties.
//!
//! Only the privileged party writes pass and round advances. Everyone else
//! asks for them through a [`RelayMessage`] on a [`RelayChannel`]; the
//! [`AuthorityGate`] makes that choice per call.

mod channel;
mod gate;
mod message;

pub use channel::{BroadcastRelay, RelayChannel};
pub use gate::{AuthorityGate, GateOutcome, Privilege, Role};
pub use message::{RelayKind, RelayMessage, RelayPayload};
