use super::stats::SessionStats;
use super::transcript::Transcript;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Identifier of one transport connection, unique for its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Accepting transcript chunks
    Active,
    /// Transcript frozen, summary in flight
    Summarizing,
    /// Summary broadcast; the registry entry is about to be removed
    Terminated,
}

/// A live transcription session and its fan-out group
#[derive(Debug)]
pub struct Session {
    id: String,
    state: SessionState,
    transcript: Transcript,
    members: HashSet<ConnectionId>,
    created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: SessionState::Active,
            transcript: Transcript::new(),
            members: HashSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Append a transcript fragment
    ///
    /// Returns false when the fragment was dropped, either because it was blank
    /// or because the session no longer accepts transcript.
    pub fn append(&mut self, text: &str) -> bool {
        if !self.is_active() {
            return false;
        }
        self.transcript.push(text)
    }

    /// Freeze transcript intake. Returns false if the session was not active.
    pub fn begin_summarizing(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = SessionState::Summarizing;
        true
    }

    /// Mark the summary as delivered. Returns false unless the session was summarizing.
    pub fn terminate(&mut self) -> bool {
        if self.state != SessionState::Summarizing {
            return false;
        }
        self.state = SessionState::Terminated;
        true
    }

    pub fn members(&self) -> &HashSet<ConnectionId> {
        &self.members
    }

    pub fn add_member(&mut self, connection: ConnectionId) -> bool {
        self.members.insert(connection)
    }

    pub fn remove_member(&mut self, connection: &ConnectionId) -> bool {
        self.members.remove(connection)
    }

    pub fn stats(&self) -> SessionStats {
        let duration = Utc::now().signed_duration_since(self.created_at);

        SessionStats {
            session_id: self.id.clone(),
            state: self.state,
            created_at: self.created_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            fragment_count: self.transcript.len(),
            member_count: self.members.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_active_and_empty() {
        let session = Session::new("s1");

        assert_eq!(session.id(), "s1");
        assert_eq!(session.state(), SessionState::Active);
        assert!(session.transcript().is_empty());
        assert!(session.members().is_empty());
    }

    #[test]
    fn test_append_dropped_after_summarizing() {
        let mut session = Session::new("s1");
        assert!(session.append("before"));
        assert!(session.begin_summarizing());

        assert!(!session.append("after"));
        assert_eq!(session.transcript().joined(), "before");
    }

    #[test]
    fn test_state_transitions_are_one_way() {
        let mut session = Session::new("s1");

        assert!(!session.terminate());
        assert!(session.begin_summarizing());
        assert!(!session.begin_summarizing());
        assert!(session.terminate());
        assert!(!session.begin_summarizing());
        assert_eq!(session.state(), SessionState::Terminated);
    }

    #[test]
    fn test_stats_reflect_session() {
        let mut session = Session::new("s1");
        session.append("one");
        session.append("two");
        session.add_member(ConnectionId::new());

        let stats = session.stats();
        assert_eq!(stats.session_id, "s1");
        assert_eq!(stats.state, SessionState::Active);
        assert_eq!(stats.fragment_count, 2);
        assert_eq!(stats.member_count, 1);
        assert!(stats.duration_secs >= 0.0);
    }
}
