//! Connection gateway
//!
//! Rooms fan events out to session members; the coordinator is the single
//! task that owns all session state and routes client events through the
//! lifecycle state machine.

mod coordinator;
mod rooms;

pub use coordinator::{Coordinator, CoordinatorHandle, StopOutcome};
pub use rooms::{Outbound, Rooms};
