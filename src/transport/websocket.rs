//! WebSocket transport.
//!
//! One TCP/WebSocket link per `WsConnection`. The outbound half is shared by
//! every session and producer opened on the connection; the inbound half is
//! owned by a reader task whose only job is to notice that the link died.
//!
//! Sessions are logical: the broker has no session concept, so opening one
//! only validates the requested mode.

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::transport::client::{
    AckMode, Connection, ConnectionFactory, FaultListener, Producer, Session,
};
use crate::transport::message::{ClientFrame, Delivery, Destination, OutboundMessage};
use crate::utils::error::TransportError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;

/// Opens WebSocket connections to a broker URL such as `ws://127.0.0.1:8080`.
#[derive(Debug, Clone)]
pub struct WsConnectionFactory {
    url: String,
}

impl WsConnectionFactory {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ConnectionFactory for WsConnectionFactory {
    async fn create_connection(&self) -> Result<Box<dyn Connection>, TransportError> {
        let (ws_stream, _response) =
            connect_async(self.url.as_str())
                .await
                .map_err(|e| TransportError::Connect {
                    url: self.url.clone(),
                    reason: e.to_string(),
                })?;

        info!(url = %self.url, "connected to broker");

        let (ws_sender, ws_receiver) = ws_stream.split();
        Ok(Box::new(WsConnection::start(
            self.url.clone(),
            ws_sender,
            ws_receiver,
        )))
    }
}

/// State shared between a connection, its sessions/producers and the reader task.
struct Link {
    sink: Mutex<WsSink>,
    closed: AtomicBool,
    listener: StdMutex<Option<FaultListener>>,
}

impl Link {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Marks the link dead and fires the listener, at most once per link.
    fn fault(&self, err: TransportError) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let listener = self
            .listener
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        match listener {
            Some(listener) => listener.notify(err),
            None => warn!(error = %err, "connection lost with no fault listener registered"),
        }
    }

    async fn write(&self, msg: WsMessage) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        let mut sink = self.sink.lock().await;
        sink.send(msg).await.map_err(TransportError::from)
    }
}

pub struct WsConnection {
    url: String,
    link: Arc<Link>,
    reader: JoinHandle<()>,
    released: bool,
}

impl WsConnection {
    fn start(url: String, ws_sender: WsSink, ws_receiver: SplitStream<WsStream>) -> Self {
        let link = Arc::new(Link {
            sink: Mutex::new(ws_sender),
            closed: AtomicBool::new(false),
            listener: StdMutex::new(None),
        });
        let reader = tokio::spawn(watch_inbound(link.clone(), ws_receiver));
        Self {
            url,
            link,
            reader,
            released: false,
        }
    }
}

/// Drains broker → client traffic until the link goes away.
async fn watch_inbound(link: Arc<Link>, mut ws_receiver: SplitStream<WsStream>) {
    while let Some(frame) = ws_receiver.next().await {
        match frame {
            Ok(WsMessage::Close(reason)) => {
                debug!(?reason, "broker closed the connection");
                link.fault(TransportError::Closed);
                return;
            }
            Ok(other) => {
                debug!(len = other.len(), "ignoring inbound frame");
            }
            Err(e) => {
                link.fault(TransportError::from(e));
                return;
            }
        }
    }
    link.fault(TransportError::Closed);
}

#[async_trait]
impl Connection for WsConnection {
    fn set_fault_listener(&mut self, listener: FaultListener) {
        *self
            .link
            .listener
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(listener);
    }

    async fn create_session(
        &mut self,
        transacted: bool,
        ack_mode: AckMode,
    ) -> Result<Box<dyn Session>, TransportError> {
        if self.released || self.link.is_closed() {
            return Err(TransportError::Closed);
        }
        if transacted {
            return Err(TransportError::Unsupported(
                "transacted sessions".to_string(),
            ));
        }
        debug!(url = %self.url, ?ack_mode, "session opened");
        Ok(Box::new(WsSession {
            link: self.link.clone(),
            released: false,
        }))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        // Silence the reader before the close frame so a local close never
        // looks like a fault.
        let already_dead = self.link.closed.swap(true, Ordering::SeqCst);
        self.reader.abort();

        if already_dead {
            return Ok(());
        }
        let mut sink = self.link.sink.lock().await;
        sink.close().await.map_err(TransportError::from)
    }
}

impl Drop for WsConnection {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

struct WsSession {
    link: Arc<Link>,
    released: bool,
}

#[async_trait]
impl Session for WsSession {
    async fn create_producer(
        &mut self,
        destination: &Destination,
    ) -> Result<Box<dyn Producer>, TransportError> {
        if self.released || self.link.is_closed() {
            return Err(TransportError::Closed);
        }
        Ok(Box::new(WsProducer {
            link: self.link.clone(),
            topic: destination.name().to_string(),
            released: false,
        }))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.released = true;
        Ok(())
    }
}

struct WsProducer {
    link: Arc<Link>,
    topic: String,
    released: bool,
}

#[async_trait]
impl Producer for WsProducer {
    async fn send(&mut self, message: &OutboundMessage) -> Result<Delivery, TransportError> {
        if self.released {
            return Err(TransportError::Closed);
        }
        let frame = ClientFrame::publish(&self.topic, message);
        let text = serde_json::to_string(&frame)?;
        self.link.write(WsMessage::text(text)).await?;

        // QoS 0 publishes are not acknowledged, so there is no broker id.
        Ok(Delivery::default())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.released = true;
        Ok(())
    }
}
