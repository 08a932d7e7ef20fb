//! # Palaver
//!
//! Realtime chat-room client core: owns the WebSocket session lifecycle,
//! parses inbound frames into typed events, dispatches them to a render
//! sink, and drives room/subroom navigation.
//!
//! ## Design
//!
//! - **One live session per client**: navigating to a room or subroom
//!   closes the current connection before dialing the new endpoint, so at
//!   most one session is ever connecting or open.
//! - **Fixed-delay reconnect**: an unexpected close is always retried
//!   after a fixed delay, forever. No backoff, no retry cap.
//! - **Forgiving dispatch**: malformed frames are logged and dropped;
//!   sending with no open session is a silent no-op.
//! - **Injected seams**: the transport factory, the render sink, and the
//!   session capability the navigator holds are all traits, so the whole
//!   lifecycle is testable without a network or a display.
//!
//! ## Modules
//!
//! - [`protocol`]: frame shapes and connection endpoints
//! - [`transport`]: transport traits and the tokio-tungstenite implementation
//! - [`session`]: the session controller actor and its handle
//! - [`rooms`]: room directory, navigation state, typing debounce
//! - [`render`]: render sink trait and the terminal renderer
//! - [`upload`]: client for the HTTP upload endpoint
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use palaver::config::Config;
//! use palaver::render::TerminalRenderer;
//! use palaver::rooms::{RoomDirectory, RoomNavigator};
//! use palaver::session::{SessionConfig, SessionController};
//! use palaver::transport::WsConnector;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let directory = RoomDirectory::from_json(&std::fs::read_to_string("rooms.json")?)?;
//!
//!     let (session, _task) = SessionController::spawn(
//!         Arc::new(WsConnector),
//!         TerminalRenderer,
//!         SessionConfig {
//!             host: config.server.host.clone(),
//!             tls: config.server.tls,
//!             reconnect_delay: config.session.reconnect_delay(),
//!         },
//!     );
//!
//!     let mut navigator =
//!         RoomNavigator::new(directory, session, config.session.typing_idle());
//!     navigator.select_room("lobby");
//!     navigator.push_input("hello!");
//!     navigator.send_message();
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod protocol;
pub mod render;
pub mod rooms;
pub mod session;
pub mod transport;
pub mod upload;

// Re-export top-level types for convenience
pub use protocol::{
    Author, ChatMessage, Endpoint, FileDescriptor, InboundEvent, OutboundEvent, PresenceChange,
};

pub use session::{
    ChatSession, ConnectionState, SessionCommand, SessionConfig, SessionController, SessionHandle,
};

pub use transport::{Transport, TransportError, TransportEvent, TransportFactory, WsConnector};

pub use rooms::{NavigationState, RoomDirectory, RoomNavigator, TypingTracker};

pub use render::{RenderSink, TerminalRenderer};

pub use upload::{UploadClient, UploadError};

pub use config::{Config, ConfigError, LoggingConfig, ServerConfig, SessionSettings};
