//! Session Controller
//!
//! Actor that owns the transport: commands, transport events, and the
//! reconnect timer are multiplexed in one loop, so all session state is
//! mutated from a single place.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Sleep;

use super::ChatSession;
use crate::protocol::{Endpoint, InboundEvent, OutboundEvent, PresenceChange};
use crate::render::RenderSink;
use crate::transport::{Transport, TransportError, TransportEvent, TransportFactory};

/// Connection state of the one live session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// A dial is in flight
    Connecting,
    /// The transport is open and frames flow
    Open,
    /// No transport; a reconnect may be pending
    Closed,
}

/// Commands accepted by the controller task
#[derive(Debug)]
pub enum SessionCommand {
    /// Close the current session (if any) and dial the endpoint
    Connect(Endpoint),
    /// Serialize and send an outbound event
    Send(OutboundEvent),
    /// Stop the controller task
    Shutdown,
}

/// Controller configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Host the endpoints are resolved against, e.g. `chat.example.com`
    pub host: String,
    /// Use `wss://` instead of `ws://`
    pub tls: bool,
    /// Fixed delay before retrying after an unexpected close
    pub reconnect_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: "localhost:8000".to_string(),
            tls: false,
            reconnect_delay: Duration::from_secs(3),
        }
    }
}

/// Cloneable handle for requesting session operations
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    /// Stop the controller task
    pub fn shutdown(&self) {
        let _ = self.commands.send(SessionCommand::Shutdown);
    }
}

impl ChatSession for SessionHandle {
    fn connect(&self, endpoint: Endpoint) {
        let _ = self.commands.send(SessionCommand::Connect(endpoint));
    }

    fn send(&self, event: OutboundEvent) {
        let _ = self.commands.send(SessionCommand::Send(event));
    }
}

type Dial = BoxFuture<'static, Result<Box<dyn Transport>, TransportError>>;
type ReconnectTimer = Pin<Box<Sleep>>;

/// Owns the single live transport and dispatches its frames
pub struct SessionController<R: RenderSink> {
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    factory: Arc<dyn TransportFactory>,
    renderer: R,
    config: SessionConfig,
    state: ConnectionState,
    /// Last endpoint asked for; reconnects always target it
    endpoint: Option<Endpoint>,
    transport: Option<Box<dyn Transport>>,
}

impl<R: RenderSink> SessionController<R> {
    /// Create a controller and the handle that feeds it
    pub fn new(
        factory: Arc<dyn TransportFactory>,
        renderer: R,
        config: SessionConfig,
    ) -> (SessionHandle, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            commands: rx,
            factory,
            renderer,
            config,
            state: ConnectionState::Closed,
            endpoint: None,
            transport: None,
        };
        (SessionHandle { commands: tx }, controller)
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Create a controller and run it as a task
    pub fn spawn(
        factory: Arc<dyn TransportFactory>,
        renderer: R,
        config: SessionConfig,
    ) -> (SessionHandle, JoinHandle<()>) {
        let (handle, controller) = Self::new(factory, renderer, config);
        (handle, tokio::spawn(controller.run()))
    }

    /// Drive the session until shutdown
    pub async fn run(mut self) {
        // At most one of these is armed alongside the live transport:
        // an in-flight dial, or a pending reconnect timer. Disarmed slots
        // poll as pending, so no branch needs a guard.
        let mut dial: Option<Dial> = None;
        let mut reconnect: Option<ReconnectTimer> = None;

        loop {
            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    Some(SessionCommand::Connect(endpoint)) => {
                        self.start_connect(endpoint, &mut dial, &mut reconnect).await;
                    }
                    Some(SessionCommand::Send(event)) => {
                        self.send_event(event).await;
                    }
                    Some(SessionCommand::Shutdown) | None => {
                        if let Some(mut transport) = self.transport.take() {
                            transport.close().await;
                        }
                        self.state = ConnectionState::Closed;
                        tracing::info!("session controller stopped");
                        return;
                    }
                },
                result = poll_dial(&mut dial) => {
                    dial = None;
                    self.on_dial_result(result, &mut reconnect);
                }
                event = poll_transport(&mut self.transport) => {
                    self.on_transport_event(event, &mut reconnect);
                }
                _ = poll_reconnect(&mut reconnect) => {
                    reconnect = None;
                    if let Some(endpoint) = self.endpoint.clone() {
                        tracing::info!(endpoint = %endpoint, "reconnecting");
                        self.start_connect(endpoint, &mut dial, &mut reconnect).await;
                    }
                }
            }
        }
    }

    /// Close-before-open: abandon whatever is live or pending, then dial
    async fn start_connect(
        &mut self,
        endpoint: Endpoint,
        dial: &mut Option<Dial>,
        reconnect: &mut Option<ReconnectTimer>,
    ) {
        *reconnect = None;
        *dial = None;
        if let Some(mut transport) = self.transport.take() {
            // The old transport is dropped after the close frame goes out;
            // any late frames on it have nowhere to land.
            transport.close().await;
        }

        let url = endpoint.url(&self.config.host, self.config.tls);
        self.endpoint = Some(endpoint);
        self.state = ConnectionState::Connecting;
        tracing::info!(%url, "connecting");

        let factory = Arc::clone(&self.factory);
        *dial = Some(Box::pin(async move { factory.connect(&url).await }));
    }

    fn on_dial_result(
        &mut self,
        result: Result<Box<dyn Transport>, TransportError>,
        reconnect: &mut Option<ReconnectTimer>,
    ) {
        match result {
            Ok(transport) => {
                self.transport = Some(transport);
                self.state = ConnectionState::Open;
                tracing::info!("session open");
            }
            Err(e) => {
                self.state = ConnectionState::Closed;
                tracing::warn!(
                    error = %e,
                    delay_ms = self.config.reconnect_delay.as_millis() as u64,
                    "connect failed, retry scheduled"
                );
                *reconnect = Some(Box::pin(tokio::time::sleep(self.config.reconnect_delay)));
            }
        }
    }

    fn on_transport_event(
        &mut self,
        event: Option<TransportEvent>,
        reconnect: &mut Option<ReconnectTimer>,
    ) {
        match event {
            Some(TransportEvent::Frame(raw)) => self.dispatch(&raw),
            Some(TransportEvent::Error(e)) => {
                // Logged only; the transport delivers a close afterwards and
                // that close drives reconnection.
                tracing::warn!(error = %e, "transport error");
            }
            Some(TransportEvent::Closed) | None => {
                self.transport = None;
                self.state = ConnectionState::Closed;
                tracing::info!(
                    delay_ms = self.config.reconnect_delay.as_millis() as u64,
                    "connection closed, reconnect scheduled"
                );
                *reconnect = Some(Box::pin(tokio::time::sleep(self.config.reconnect_delay)));
            }
        }
    }

    /// Parse a raw frame and route it to the renderer
    fn dispatch(&self, raw: &str) {
        let event = match serde_json::from_str::<InboundEvent>(raw) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed frame");
                return;
            }
        };

        match event {
            InboundEvent::Message(message) => self.renderer.render_message(&message),
            InboundEvent::Typing { is_typing, user } => {
                self.renderer.render_typing(&user, is_typing);
            }
            InboundEvent::UserJoined { user } => {
                self.renderer.render_presence(&PresenceChange { user, joined: true });
            }
            InboundEvent::UserLeft { user } => {
                self.renderer.render_presence(&PresenceChange { user, joined: false });
            }
            InboundEvent::Error { message } => self.renderer.show_error(&message),
        }
    }

    async fn send_event(&mut self, event: OutboundEvent) {
        let Some(transport) = self.transport.as_mut() else {
            // Transient disconnect window; dropping is the contract.
            tracing::debug!("no open session, dropping outbound event");
            return;
        };

        match serde_json::to_string(&event) {
            Ok(frame) => {
                if let Err(e) = transport.send(frame).await {
                    tracing::warn!(error = %e, "failed to send frame");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize outbound event"),
        }
    }
}

/// Await the in-flight dial; pending while disarmed
async fn poll_dial(dial: &mut Option<Dial>) -> Result<Box<dyn Transport>, TransportError> {
    match dial {
        Some(fut) => fut.await,
        None => std::future::pending().await,
    }
}

/// Await the next transport event; pending while no transport is live
async fn poll_transport(transport: &mut Option<Box<dyn Transport>>) -> Option<TransportEvent> {
    match transport {
        Some(transport) => transport.next_event().await,
        None => std::future::pending().await,
    }
}

/// Await the reconnect timer; pending while none is scheduled
async fn poll_reconnect(reconnect: &mut Option<ReconnectTimer>) {
    match reconnect {
        Some(timer) => timer.as_mut().await,
        None => std::future::pending().await,
    }
}
