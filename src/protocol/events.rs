//! Event Types
//!
//! Typed views over the JSON frames exchanged with the chat backend.
//! Inbound frames that fail to parse into [`InboundEvent`] are dropped by
//! the session controller; they are never a fatal condition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Frames received from the server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A chat message posted to the current room
    Message(ChatMessage),
    /// Another participant started or stopped typing
    Typing {
        /// Whether the participant is currently typing
        is_typing: bool,
        /// Username of the participant
        user: String,
    },
    /// A participant joined the room
    UserJoined {
        /// Username of the participant
        user: String,
    },
    /// A participant left the room
    UserLeft {
        /// Username of the participant
        user: String,
    },
    /// Server-side error to surface as a notification
    Error {
        /// Error description
        message: String,
    },
}

/// Frames sent to the server
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEvent {
    /// Post a chat message to a room
    Message {
        /// Message body, already trimmed
        content: String,
        /// Room the message belongs to
        room_id: String,
    },
    /// Typing indicator for the current room
    Typing {
        /// Whether this client is typing
        is_typing: bool,
    },
    /// Share an uploaded file in a room
    FileMessage {
        /// Descriptor returned by the upload endpoint
        file_data: FileDescriptor,
        /// Room the file belongs to
        room_id: String,
    },
}

/// A chat message as delivered by the server
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    /// Message body
    pub content: String,
    /// Server-side creation time
    pub created_at: DateTime<Utc>,
    /// Who posted it
    pub author: Author,
    /// Files attached to the message
    #[serde(default)]
    pub attachments: Vec<FileDescriptor>,
}

/// Message author metadata
#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    /// Display name
    pub username: String,
    /// Room owners get a badge in rendered output
    #[serde(default)]
    pub is_owner: bool,
    /// Optional avatar reference
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Descriptor for an uploaded file
///
/// Returned by the HTTP upload endpoint and embedded in `file_message`
/// frames and message attachments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Original file name
    pub name: String,
    /// Where the file was stored
    pub url: String,
    /// Size in bytes, when the server reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// MIME type, when the server reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// A join or leave notification, handed to the renderer
#[derive(Debug, Clone)]
pub struct PresenceChange {
    /// Username of the participant
    pub user: String,
    /// True for a join, false for a leave
    pub joined: bool,
}
