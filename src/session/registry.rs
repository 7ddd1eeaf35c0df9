use super::session::Session;
use std::collections::HashMap;
use tracing::info;

/// In-memory map of active sessions
///
/// Owned by a single coordinator task, so no interior locking is needed.
/// Each coordinator (and each test) gets its own registry.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the session for `id`, creating an active one if absent
    pub fn get_or_create(&mut self, id: &str) -> &mut Session {
        self.sessions.entry(id.to_string()).or_insert_with(|| {
            info!("Created session {}", id);
            Session::new(id)
        })
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    /// Remove a session. Absent ids are a no-op.
    pub fn delete(&mut self, id: &str) -> Option<Session> {
        let removed = self.sessions.remove(id);
        if removed.is_some() {
            info!("Removed session {}", id);
        }
        removed
    }

    /// Append a transcript fragment to an active session
    ///
    /// Unknown sessions are ignored and never created here.
    pub fn append(&mut self, id: &str, text: &str) -> bool {
        self.sessions
            .get_mut(id)
            .map_or(false, |session| session.append(text))
    }

    /// Summarization input for a session, honoring a client override
    pub fn snapshot(&self, id: &str, client_override: Option<&str>) -> Option<String> {
        self.sessions
            .get(id)
            .map(|session| session.transcript().snapshot(client_override))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
