//! Session Lifecycle
//!
//! One session controller owns the single live connection per client.
//! Opening a new endpoint closes the prior connection before dialing, so
//! at most one session is ever connecting or open. Unexpected closes are
//! retried forever with a fixed delay.
//!
//! The controller runs as a task; callers hold a cloneable
//! [`SessionHandle`] and talk to it through the [`ChatSession`] capability.

mod controller;

pub use controller::{
    ConnectionState, SessionCommand, SessionConfig, SessionController, SessionHandle,
};

use crate::protocol::{Endpoint, OutboundEvent};

/// Capability for requesting session operations
///
/// The room navigator depends on this abstraction rather than on the
/// controller itself, so tests can substitute a recorder.
pub trait ChatSession: Clone + Send + Sync + 'static {
    /// Switch the live connection to the given endpoint
    fn connect(&self, endpoint: Endpoint);

    /// Send an event over the live connection
    ///
    /// A silent no-op when no session is open.
    fn send(&self, event: OutboundEvent);
}
