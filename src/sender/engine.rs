//! Sender engine
//!
//! This module contains the `Sender`, responsible for:
//! - opening a connection, a non-transacted auto-ack session and a producer
//!   bound to the configured destination
//! - sending text messages through that producer
//! - releasing the handles on `close`
//! - reacting to connection faults with a single reconnect attempt
//!
//! Concurrency and usage notes:
//! - The connection, session and producer live together in one
//!   `ConnectionState` behind a single async mutex, so send, close and
//!   reconnect never interleave. A send issued during a reconnect waits for
//!   the reconnect to finish.
//! - Faults reported by the transport are drained by a background task that
//!   only holds a weak reference; it stops once every `Sender` clone is gone.
//! - Every opened connection gets its own fault generation. A fault still
//!   queued from a connection that was already replaced is ignored.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, warn};

use crate::config::ProfileResolver;
use crate::sender::message;
use crate::transport::{
    AckMode, Connection, ConnectionFactory, Destination, Fault, FaultListener, Producer, Session,
};
use crate::utils::error::{SendError, SenderError, TransportError};

/// Outcome of a successful send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Locally generated, advisory id (`"ID:<n>"`).
    pub message_id: String,
    /// The broker's delivery id, when the transport reports one.
    pub broker_message_id: Option<String>,
}

/// Externally visible connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Uninitialized,
    Connected,
    Broken,
}

struct Handles {
    generation: u64,
    connection: Box<dyn Connection>,
    session: Box<dyn Session>,
    producer: Box<dyn Producer>,
}

enum ConnectionState {
    Uninitialized,
    Connected(Handles),
    Broken,
}

impl ConnectionState {
    fn status(&self) -> ConnectionStatus {
        match self {
            ConnectionState::Uninitialized => ConnectionStatus::Uninitialized,
            ConnectionState::Connected(_) => ConnectionStatus::Connected,
            ConnectionState::Broken => ConnectionStatus::Broken,
        }
    }
}

struct Inner {
    factory: Arc<dyn ConnectionFactory>,
    destination: Destination,
    faults: FaultListener,
    generations: AtomicU64,
    state: Mutex<ConnectionState>,
}

impl Inner {
    /// Connection, fault listener, session, producer; in that order.
    ///
    /// Whatever was opened before a failing step is released again.
    async fn open(&self) -> Result<Handles, TransportError> {
        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        let mut connection = self.factory.create_connection().await?;
        connection.set_fault_listener(self.faults.with_generation(generation));

        let mut session = match connection.create_session(false, AckMode::Auto).await {
            Ok(session) => session,
            Err(e) => {
                let _ = connection.close().await;
                return Err(e);
            }
        };

        let producer = match session.create_producer(&self.destination).await {
            Ok(producer) => producer,
            Err(e) => {
                let _ = session.close().await;
                let _ = connection.close().await;
                return Err(e);
            }
        };

        Ok(Handles {
            generation,
            connection,
            session,
            producer,
        })
    }
}

/// Releases producer, session and connection, in that order.
///
/// Handles that are already gone (or whose link is broken) fail to close;
/// that is expected and only logged at debug level.
async fn release(mut handles: Handles) {
    if let Err(e) = handles.producer.close().await {
        debug!(error = %e, "producer already released");
    }
    if let Err(e) = handles.session.close().await {
        debug!(error = %e, "session already released");
    }
    if let Err(e) = handles.connection.close().await {
        debug!(error = %e, "connection already released");
    }
}

/// Sends text messages to one destination over a self-healing connection.
///
/// Cloning is cheap and every clone drives the same connection.
#[derive(Clone)]
pub struct Sender {
    inner: Arc<Inner>,
}

impl Sender {
    /// Resolves `profile` and connects to it.
    pub async fn connect(
        resolver: &dyn ProfileResolver,
        profile: &str,
    ) -> Result<Self, SenderError> {
        let resolved = resolver.resolve(profile)?;
        debug!(profile, destination = resolved.destination.name(), "resolved sender profile");
        Ok(Self::from_parts(resolved.factory, resolved.destination).await?)
    }

    /// Connects with an already resolved factory and destination.
    pub async fn from_parts(
        factory: Arc<dyn ConnectionFactory>,
        destination: Destination,
    ) -> Result<Self, TransportError> {
        let (faults, fault_rx) = FaultListener::channel();
        let inner = Arc::new(Inner {
            factory,
            destination,
            faults,
            generations: AtomicU64::new(0),
            state: Mutex::new(ConnectionState::Uninitialized),
        });

        {
            let mut state = inner.state.lock().await;
            *state = ConnectionState::Connected(inner.open().await?);
        }

        spawn_fault_watcher(Arc::downgrade(&inner), fault_rx);
        info!(destination = inner.destination.name(), "sender is ready");

        Ok(Self { inner })
    }

    pub fn destination(&self) -> &Destination {
        &self.inner.destination
    }

    pub async fn status(&self) -> ConnectionStatus {
        self.inner.state.lock().await.status()
    }

    /// Sends `text` as one message.
    ///
    /// Fails without touching the transport when sending is disabled or
    /// `text` is blank. Transport failures are logged here and returned,
    /// not propagated any further.
    pub async fn send(&self, text: &str) -> Result<Receipt, SendError> {
        let mut state = self.inner.state.lock().await;

        let ConnectionState::Connected(handles) = &mut *state else {
            debug!("send refused, sender is not connected");
            return Err(SendError::Disabled);
        };
        if text.trim().is_empty() {
            debug!("send refused, empty message body");
            return Err(SendError::EmptyBody);
        }

        let message = message::build(&self.inner.destination, text);
        match handles.producer.send(&message).await {
            Ok(delivery) => {
                info!(
                    message_id = %message.message_id,
                    destination = %message.destination,
                    "sent message"
                );
                if let Some(broker_id) = &delivery.broker_message_id {
                    info!(
                        message_id = %message.message_id,
                        broker_message_id = %broker_id,
                        "broker accepted message"
                    );
                }
                Ok(Receipt {
                    message_id: message.message_id,
                    broker_message_id: delivery.broker_message_id,
                })
            }
            Err(e) => {
                error!(
                    message_id = %message.message_id,
                    error = %e,
                    "failed to send message"
                );
                Err(SendError::Transport(e))
            }
        }
    }

    /// Releases producer, session and connection. Safe to call repeatedly.
    pub async fn close(&self) {
        let mut state = self.inner.state.lock().await;
        let previous = std::mem::replace(&mut *state, ConnectionState::Uninitialized);
        if let ConnectionState::Connected(handles) = previous {
            release(handles).await;
            info!("sender closed");
        }
    }

    /// Drops whatever connection is held and opens a fresh one.
    ///
    /// On failure the sender is left `Broken` and sending stays disabled.
    pub async fn reconnect(&self) -> Result<(), TransportError> {
        let mut state = self.inner.state.lock().await;
        self.reopen(&mut state).await
    }

    /// Fault callback: one reconnect attempt, no retry scheduling.
    ///
    /// A sender that was closed on purpose stays closed.
    pub async fn on_fault(&self, err: TransportError) {
        self.recover(None, err).await;
    }

    /// Runs the fault callback for a fault reported by a connection.
    ///
    /// Faults from a connection that has since been replaced are dropped,
    /// so they never tear down the healthy one.
    async fn on_transport_fault(&self, fault: Fault) {
        self.recover(Some(fault.generation), fault.error).await;
    }

    async fn recover(&self, generation: Option<u64>, err: TransportError) {
        let mut state = self.inner.state.lock().await;
        match &*state {
            ConnectionState::Uninitialized => {
                debug!(error = %err, "ignoring fault on a closed sender");
                return;
            }
            ConnectionState::Connected(handles)
                if generation.is_some_and(|g| g != handles.generation) =>
            {
                debug!(
                    error = %err,
                    fault_generation = generation,
                    current_generation = handles.generation,
                    "ignoring fault from a replaced connection"
                );
                return;
            }
            _ => {}
        }
        warn!(error = %err, "error in sender connection, retrying to connect");
        let _ = self.reopen(&mut state).await;
    }

    async fn reopen(&self, state: &mut ConnectionState) -> Result<(), TransportError> {
        if let ConnectionState::Connected(handles) =
            std::mem::replace(state, ConnectionState::Broken)
        {
            release(handles).await;
        }

        match self.inner.open().await {
            Ok(handles) => {
                *state = ConnectionState::Connected(handles);
                info!("sender connection successful");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "unable to re-connect");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sender")
            .field("destination", &self.inner.destination)
            .finish()
    }
}

fn spawn_fault_watcher(inner: Weak<Inner>, mut faults: UnboundedReceiver<Fault>) {
    tokio::spawn(async move {
        while let Some(fault) = faults.recv().await {
            let Some(inner) = inner.upgrade() else {
                break;
            };
            Sender { inner }.on_transport_fault(fault).await;
        }
    });
}
