//! Connection Endpoints
//!
//! A session targets either a room or a subroom within a room. The server
//! routes by URL path, with a trailing slash on every route.

use std::fmt;

/// Target of a WebSocket session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Owning room
    pub room_id: String,
    /// Subroom within the room, when connected one level down
    pub subroom_id: Option<String>,
}

impl Endpoint {
    /// Endpoint for a top-level room
    pub fn room(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            subroom_id: None,
        }
    }

    /// Endpoint for a subroom within a room
    pub fn subroom(room_id: impl Into<String>, subroom_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            subroom_id: Some(subroom_id.into()),
        }
    }

    /// Wire path relative to the host, e.g. `ws/room/42/subroom/7/`
    pub fn path(&self) -> String {
        match &self.subroom_id {
            Some(subroom_id) => format!("ws/room/{}/subroom/{}/", self.room_id, subroom_id),
            None => format!("ws/room/{}/", self.room_id),
        }
    }

    /// Full connection URL for the given host
    pub fn url(&self, host: &str, tls: bool) -> String {
        let scheme = if tls { "wss" } else { "ws" };
        format!("{}://{}/{}", scheme, host, self.path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subroom_id {
            Some(subroom_id) => write!(f, "{}#{}", self.room_id, subroom_id),
            None => write!(f, "{}", self.room_id),
        }
    }
}
