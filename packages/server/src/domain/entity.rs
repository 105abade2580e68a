//! Domain entities: the identity of a connected client and the registry of
//! every live session.

use std::collections::HashMap;

use super::value_object::{ClientId, CursorColor, DisplayName, Timestamp};

/// Identity handed out to a connection: id, display name and cursor color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: ClientId,
    pub name: DisplayName,
    pub color: CursorColor,
}

impl Identity {
    pub fn new(id: ClientId, name: DisplayName, color: CursorColor) -> Self {
        Self { id, name, color }
    }
}

/// A registered connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: Identity,
    pub connected_at: Timestamp,
    /// Join sequence number, used to keep the roster in join order.
    join_seq: u64,
}

/// Process-wide registry of connected clients.
///
/// Holds at most one session per `ClientId`. Registering an id that is
/// already present supersedes the previous session.
#[derive(Debug, Default)]
pub struct Registry {
    sessions: HashMap<ClientId, Session>,
    next_join_seq: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `identity` and return the identities of every *other* session,
    /// in join order.
    pub fn register(&mut self, identity: Identity, connected_at: Timestamp) -> Vec<Identity> {
        let join_seq = self.next_join_seq;
        self.next_join_seq += 1;

        let id = identity.id.clone();
        let superseded = self.sessions.insert(
            id.clone(),
            Session {
                identity,
                connected_at,
                join_seq,
            },
        );
        if superseded.is_some() {
            tracing::debug!("Session '{}' superseded by a new registration", id.as_str());
        }

        self.ordered()
            .into_iter()
            .filter(|session| session.identity.id != id)
            .map(|session| session.identity.clone())
            .collect()
    }

    /// Remove a session. Returns the removed identity, or `None` if the id
    /// was not registered.
    pub fn unregister(&mut self, client_id: &ClientId) -> Option<Identity> {
        self.sessions
            .remove(client_id)
            .map(|session| session.identity)
    }

    /// Identities of every registered session, in join order.
    pub fn snapshot(&self) -> Vec<Identity> {
        self.ordered()
            .into_iter()
            .map(|session| session.identity.clone())
            .collect()
    }

    /// Every registered session, in join order.
    pub fn sessions(&self) -> Vec<Session> {
        self.ordered().into_iter().cloned().collect()
    }

    pub fn find(&self, client_id: &ClientId) -> Option<&Identity> {
        self.sessions.get(client_id).map(|session| &session.identity)
    }

    pub fn connected_ids(&self) -> Vec<ClientId> {
        self.ordered()
            .into_iter()
            .map(|session| session.identity.id.clone())
            .collect()
    }

    pub fn connected_count(&self) -> usize {
        self.sessions.len()
    }

    fn ordered(&self) -> Vec<&Session> {
        let mut sessions: Vec<&Session> = self.sessions.values().collect();
        sessions.sort_by_key(|session| session.join_seq);
        sessions
    }
}
