//! WebSocket Transport
//!
//! Production [`Transport`] over tokio-tungstenite. The chat protocol is
//! JSON text frames only; binary frames are skipped and ping/pong frames
//! are answered by the library.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::{Transport, TransportError, TransportEvent, TransportFactory};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Dials chat endpoints over tokio-tungstenite
#[derive(Debug, Clone, Default)]
pub struct WsConnector;

#[async_trait]
impl TransportFactory for WsConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, TransportError> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|e| TransportError::Connect {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Box::new(WsTransport {
            stream,
            closing: false,
            closed: false,
        }))
    }
}

/// An open WebSocket connection
pub struct WsTransport {
    stream: WsStream,
    /// An error was surfaced; the next event is `Closed`
    closing: bool,
    /// `Closed` has been delivered; only `None` follows
    closed: bool,
}

#[async_trait]
impl Transport for WsTransport {
    async fn send(&mut self, frame: String) -> Result<(), TransportError> {
        if self.closing || self.closed {
            return Err(TransportError::Closed);
        }
        self.stream
            .send(Message::Text(frame))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    async fn next_event(&mut self) -> Option<TransportEvent> {
        if self.closed {
            return None;
        }
        if self.closing {
            self.closed = true;
            return Some(TransportEvent::Closed);
        }

        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Some(TransportEvent::Frame(text)),
                // Control frames are handled by tungstenite; binary frames
                // are not part of the chat protocol.
                Some(Ok(Message::Ping(_)))
                | Some(Ok(Message::Pong(_)))
                | Some(Ok(Message::Binary(_)))
                | Some(Ok(Message::Frame(_))) => continue,
                Some(Ok(Message::Close(_))) | None => {
                    self.closed = true;
                    return Some(TransportEvent::Closed);
                }
                Some(Err(e)) => {
                    // The stream ends after an error; surface it first and
                    // let the Closed that follows drive reconnection.
                    self.closing = true;
                    return Some(TransportEvent::Error(e.to_string()));
                }
            }
        }
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closing = true;
            self.closed = true;
            // Fire-and-forget close frame; the session is already abandoned
            // from the caller's point of view.
            let _ = self.stream.close(None).await;
        }
    }
}
