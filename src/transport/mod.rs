//! Transport Abstraction
//!
//! The session controller talks to the network through the [`Transport`]
//! and [`TransportFactory`] traits so that tests can drive the lifecycle
//! with an in-memory implementation. The production implementation,
//! [`WsConnector`], dials over tokio-tungstenite.

mod ws;

use async_trait::async_trait;
use thiserror::Error;

pub use ws::{WsConnector, WsTransport};

/// Events surfaced by an open transport, in delivery order
#[derive(Debug)]
pub enum TransportEvent {
    /// A complete text frame from the peer
    Frame(String),
    /// A transport-level error; the transport closes afterwards
    Error(String),
    /// The connection closed; no further events follow
    Closed,
}

/// A single message-oriented, full-duplex connection
#[async_trait]
pub trait Transport: Send {
    /// Write one text frame to the peer
    async fn send(&mut self, frame: String) -> Result<(), TransportError>;

    /// Next event from the peer
    ///
    /// Yields [`TransportEvent::Closed`] exactly once when the connection
    /// ends, then `None`.
    async fn next_event(&mut self) -> Option<TransportEvent>;

    /// Close the connection without waiting for the close acknowledgment
    async fn close(&mut self);
}

/// Opens transports for the session controller
#[async_trait]
pub trait TransportFactory: Send + Sync + 'static {
    /// Dial the given URL and return an open transport
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, TransportError>;
}

/// Errors from the transport layer
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("connection is closed")]
    Closed,

    #[error("failed to send frame: {0}")]
    Send(String),
}
