use crate::protocol::ServerEvent;
use crate::session::{ConnectionId, SessionRegistry};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Outbound queue of one connection; FIFO per connection
pub type Outbound = mpsc::UnboundedSender<ServerEvent>;

struct ConnectionEntry {
    outbound: Outbound,
    /// Session this connection last joined
    session_id: Option<String>,
}

/// Connection table and per-session fan-out
///
/// Membership is stored on the session itself; this table maps each
/// connection to its outbound queue and its current session.
#[derive(Default)]
pub struct Rooms {
    connections: HashMap<ConnectionId, ConnectionEntry>,
}

impl Rooms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, connection: ConnectionId, outbound: Outbound) {
        self.connections.insert(
            connection,
            ConnectionEntry {
                outbound,
                session_id: None,
            },
        );
    }

    /// Forget a connection and drop it from its session's members
    ///
    /// The session itself stays alive for the remaining members.
    pub fn disconnect(&mut self, registry: &mut SessionRegistry, connection: ConnectionId) {
        let Some(entry) = self.connections.remove(&connection) else {
            return;
        };

        if let Some(session_id) = entry.session_id {
            if let Some(session) = registry.get_mut(&session_id) {
                session.remove_member(&connection);
            }
        }
    }

    /// Add a connection to a session's room, creating the session if absent
    ///
    /// A connection belongs to at most one room; joining another one leaves
    /// the previous membership.
    pub fn join(
        &mut self,
        registry: &mut SessionRegistry,
        connection: ConnectionId,
        session_id: &str,
    ) -> bool {
        let Some(entry) = self.connections.get_mut(&connection) else {
            warn!("Join from unknown connection {}", connection);
            return false;
        };

        if let Some(previous) = entry.session_id.take() {
            if previous != session_id {
                if let Some(session) = registry.get_mut(&previous) {
                    session.remove_member(&connection);
                }
                debug!("Connection {} left session {}", connection, previous);
            }
        }

        registry.get_or_create(session_id).add_member(connection);
        entry.session_id = Some(session_id.to_string());
        info!("Connection {} joined session {}", connection, session_id);
        true
    }

    /// Remove a connection from a session's room
    pub fn leave(
        &mut self,
        registry: &mut SessionRegistry,
        connection: ConnectionId,
        session_id: &str,
    ) {
        if let Some(session) = registry.get_mut(session_id) {
            session.remove_member(&connection);
        }

        if let Some(entry) = self.connections.get_mut(&connection) {
            if entry.session_id.as_deref() == Some(session_id) {
                entry.session_id = None;
            }
        }
    }

    /// Deliver an event to every current member of a session
    ///
    /// Best effort: members whose queue is closed are skipped. Returns the
    /// number of connections the event was queued for.
    pub fn broadcast(
        &self,
        registry: &SessionRegistry,
        session_id: &str,
        event: &ServerEvent,
    ) -> usize {
        let Some(session) = registry.get(session_id) else {
            return 0;
        };

        let mut delivered = 0;
        for member in session.members() {
            let Some(entry) = self.connections.get(member) else {
                continue;
            };
            if entry.outbound.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                debug!("Outbound queue closed for connection {}", member);
            }
        }

        debug!(
            "Broadcast {:?} to {} member(s) of session {}",
            event, delivered, session_id
        );
        delivered
    }

    pub fn session_of(&self, connection: &ConnectionId) -> Option<&str> {
        self.connections
            .get(connection)
            .and_then(|entry| entry.session_id.as_deref())
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connect(rooms: &mut Rooms) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let id = ConnectionId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        rooms.connect(id, tx);
        (id, rx)
    }

    #[test]
    fn test_broadcast_reaches_all_members() {
        let mut registry = SessionRegistry::new();
        let mut rooms = Rooms::new();
        let (a, mut rx_a) = connect(&mut rooms);
        let (b, mut rx_b) = connect(&mut rooms);
        let (_outsider, mut rx_c) = connect(&mut rooms);

        rooms.join(&mut registry, a, "s1");
        rooms.join(&mut registry, b, "s1");

        let event = ServerEvent::summarizing();
        assert_eq!(rooms.broadcast(&registry, "s1", &event), 2);

        assert_eq!(rx_a.try_recv().unwrap(), event);
        assert_eq!(rx_b.try_recv().unwrap(), event);
        assert!(rx_c.try_recv().is_err());
    }

    #[test]
    fn test_broadcast_preserves_order() {
        let mut registry = SessionRegistry::new();
        let mut rooms = Rooms::new();
        let (a, mut rx) = connect(&mut rooms);
        rooms.join(&mut registry, a, "s1");

        rooms.broadcast(&registry, "s1", &ServerEvent::summarizing());
        rooms.broadcast(&registry, "s1", &ServerEvent::complete("done"));

        assert_eq!(rx.try_recv().unwrap(), ServerEvent::summarizing());
        assert_eq!(rx.try_recv().unwrap(), ServerEvent::complete("done"));
    }

    #[test]
    fn test_rejoin_moves_membership() {
        let mut registry = SessionRegistry::new();
        let mut rooms = Rooms::new();
        let (a, _rx) = connect(&mut rooms);

        rooms.join(&mut registry, a, "s1");
        rooms.join(&mut registry, a, "s2");

        assert!(!registry.get("s1").unwrap().members().contains(&a));
        assert!(registry.get("s2").unwrap().members().contains(&a));
        assert_eq!(rooms.session_of(&a), Some("s2"));
    }

    #[test]
    fn test_rejoin_same_session_keeps_membership() {
        let mut registry = SessionRegistry::new();
        let mut rooms = Rooms::new();
        let (a, _rx) = connect(&mut rooms);

        rooms.join(&mut registry, a, "s1");
        rooms.join(&mut registry, a, "s1");

        assert_eq!(registry.get("s1").unwrap().members().len(), 1);
    }

    #[test]
    fn test_disconnect_keeps_session() {
        let mut registry = SessionRegistry::new();
        let mut rooms = Rooms::new();
        let (a, _rx_a) = connect(&mut rooms);
        let (b, _rx_b) = connect(&mut rooms);
        rooms.join(&mut registry, a, "s1");
        rooms.join(&mut registry, b, "s1");

        rooms.disconnect(&mut registry, a);

        let session = registry.get("s1").unwrap();
        assert!(!session.members().contains(&a));
        assert!(session.members().contains(&b));
        assert_eq!(rooms.len(), 1);
    }

    #[test]
    fn test_leave_removes_membership() {
        let mut registry = SessionRegistry::new();
        let mut rooms = Rooms::new();
        let (a, mut rx) = connect(&mut rooms);
        rooms.join(&mut registry, a, "s1");

        rooms.leave(&mut registry, a, "s1");

        assert_eq!(rooms.broadcast(&registry, "s1", &ServerEvent::summarizing()), 0);
        assert!(rx.try_recv().is_err());
        assert_eq!(rooms.session_of(&a), None);
    }

    #[test]
    fn test_join_from_unknown_connection_is_rejected() {
        let mut registry = SessionRegistry::new();
        let mut rooms = Rooms::new();

        assert!(!rooms.join(&mut registry, ConnectionId::new(), "s1"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_broadcast_to_closed_queue_is_skipped() {
        let mut registry = SessionRegistry::new();
        let mut rooms = Rooms::new();
        let (a, rx) = connect(&mut rooms);
        rooms.join(&mut registry, a, "s1");
        drop(rx);

        assert_eq!(rooms.broadcast(&registry, "s1", &ServerEvent::summarizing()), 0);
    }
}
