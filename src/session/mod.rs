//! Session registry and transcript accumulation
//!
//! This module provides the in-memory state of live sessions:
//! - `SessionRegistry` - session id to session map
//! - `Session` - lifecycle state, member set, and transcript
//! - `Transcript` - ordered fragment buffer and snapshotting
//! - `SessionStats` - read-only view for the HTTP API

mod registry;
mod session;
mod stats;
mod transcript;

pub use registry::SessionRegistry;
pub use session::{ConnectionId, Session, SessionState};
pub use stats::SessionStats;
pub use transcript::{Transcript, TranscriptFragment};
