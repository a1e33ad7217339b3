use axum::extract::ws::Message;
use dashmap::DashMap;
use huddle_services::room::Participant;
use serde_json::Value;
use tokio::sync::mpsc;

/// Outbox of one connection, drained by that connection's writer task.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// The room and identity a connection bound itself to with `room:join`.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub room_id: String,
    pub participant: Participant,
}

struct Connection {
    sender: WsSender,
    session: Option<Session>,
}

/// Tracks all live WebSocket connections and which room each has joined.
///
/// Presence is never stored on its own: the roster of a room is whatever
/// the joined connections carry, so dropping a connection drops its
/// presence with it.
pub struct WsStorage {
    /// connection_id -> sender + bound session
    connections: DashMap<String, Connection>,
    /// room_id -> connection ids in join order
    rooms: DashMap<String, Vec<String>>,
}

impl WsStorage {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            rooms: DashMap::new(),
        }
    }

    pub fn add(&self, connection_id: String, sender: WsSender) {
        self.connections.insert(
            connection_id,
            Connection {
                sender,
                session: None,
            },
        );
    }

    /// Forgets a connection, returning the session it had bound, if any.
    pub fn remove(&self, connection_id: &str) -> Option<Session> {
        let (_, connection) = self.connections.remove(connection_id)?;
        let session = connection.session?;
        self.detach(&session.room_id, connection_id);
        Some(session)
    }

    /// Binds a connection to a room and identity. Returns the previous
    /// session when the connection was already in a room; it has been left
    /// by the time this returns. Unknown connections are ignored.
    pub fn join(
        &self,
        connection_id: &str,
        room_id: &str,
        participant: Participant,
    ) -> Option<Session> {
        let previous = {
            let mut connection = self.connections.get_mut(connection_id)?;
            connection.session.replace(Session {
                room_id: room_id.to_string(),
                participant,
            })
        };

        if let Some(prev) = &previous
            && prev.room_id != room_id
        {
            self.detach(&prev.room_id, connection_id);
        }

        let mut members = self.rooms.entry(room_id.to_string()).or_default();
        if !members.iter().any(|id| id == connection_id) {
            members.push(connection_id.to_string());
        }
        previous
    }

    fn detach(&self, room_id: &str, connection_id: &str) {
        if let Some(mut members) = self.rooms.get_mut(room_id) {
            members.retain(|id| id != connection_id);
            if members.is_empty() {
                drop(members);
                self.rooms.remove_if(room_id, |_, members| members.is_empty());
            }
        }
    }

    pub fn session(&self, connection_id: &str) -> Option<Session> {
        self.connections
            .get(connection_id)
            .and_then(|c| c.session.clone())
    }

    /// Replaces the avatar of the participant bound to a connection and
    /// returns the updated participant.
    pub fn set_avatar(&self, connection_id: &str, avatar: Value) -> Option<Participant> {
        let mut connection = self.connections.get_mut(connection_id)?;
        let session = connection.session.as_mut()?;
        session.participant.avatar = avatar;
        Some(session.participant.clone())
    }

    pub fn get_sender(&self, connection_id: &str) -> Option<WsSender> {
        self.connections.get(connection_id).map(|c| c.sender.clone())
    }

    /// Connection ids currently joined to a room, in join order.
    pub fn room_connection_ids(&self, room_id: &str) -> Vec<String> {
        self.rooms
            .get(room_id)
            .map(|members| members.clone())
            .unwrap_or_default()
    }

    /// Participants of a room's connections, optionally leaving one out.
    pub fn roster(&self, room_id: &str, except: Option<&str>) -> Vec<Participant> {
        self.room_connection_ids(room_id)
            .into_iter()
            .filter(|id| Some(id.as_str()) != except)
            .filter_map(|id| self.session(&id))
            .filter(|s| s.room_id == room_id)
            .map(|s| s.participant)
            .collect()
    }

    /// First connection in `room_id` whose participant id is `user_id`.
    pub fn find_connection(&self, room_id: &str, user_id: &str) -> Option<String> {
        self.room_connection_ids(room_id).into_iter().find(|id| {
            self.session(id)
                .is_some_and(|s| s.room_id == room_id && s.participant.id == user_id)
        })
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for WsStorage {
    fn default() -> Self {
        Self::new()
    }
}
