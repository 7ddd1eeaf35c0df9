use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session::SessionState;

/// Point-in-time view of a session, served by the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Session identifier
    pub session_id: String,

    /// Current lifecycle state
    pub state: SessionState,

    /// When the session was created (first join)
    pub created_at: DateTime<Utc>,

    /// Time since creation in seconds
    pub duration_secs: f64,

    /// Number of transcript fragments accumulated
    pub fragment_count: usize,

    /// Number of connections currently in the session's room
    pub member_count: usize,
}
