//! Wire Protocol
//!
//! Defines the JSON frame shapes exchanged with the chat backend and the
//! endpoint paths a session connects to.
//!
//! All frames are UTF-8 JSON objects tagged by a `type` field. Inbound and
//! outbound frames are distinct tagged unions: the server never echoes the
//! client shapes back verbatim.

mod endpoint;
mod events;

pub use endpoint::Endpoint;
pub use events::{
    Author, ChatMessage, FileDescriptor, InboundEvent, OutboundEvent, PresenceChange,
};
