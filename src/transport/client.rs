use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::transport::message::{Delivery, Destination, OutboundMessage};
use crate::utils::error::TransportError;

/// Acknowledgement mode requested when opening a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckMode {
    Auto,
    Client,
    DupsOk,
}

/// A connection-level fault, tagged with the generation of the listener
/// that reported it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub generation: u64,
    pub error: TransportError,
}

/// Handle a connection uses to report a connection-level fault.
///
/// Cloning is cheap; every clone feeds the same receiver. The owner hands
/// each connection a listener with its own generation so faults from a
/// replaced connection can be told apart from current ones.
#[derive(Debug, Clone)]
pub struct FaultListener {
    tx: UnboundedSender<Fault>,
    generation: u64,
}

impl FaultListener {
    /// Creates a generation 0 listener together with the receiving end its owner drains.
    pub fn channel() -> (Self, UnboundedReceiver<Fault>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, generation: 0 }, rx)
    }

    /// A listener on the same channel that tags its faults with `generation`.
    pub fn with_generation(&self, generation: u64) -> Self {
        Self {
            tx: self.tx.clone(),
            generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Reports a fault. Notifications after the owner has gone away are dropped.
    pub fn notify(&self, error: TransportError) {
        let _ = self.tx.send(Fault {
            generation: self.generation,
            error,
        });
    }
}

/// Opens connections to a broker.
#[async_trait]
pub trait ConnectionFactory: Send + Sync {
    async fn create_connection(&self) -> Result<Box<dyn Connection>, TransportError>;
}

/// A live link to the broker.
///
/// `close` must be idempotent: closing a released connection succeeds.
#[async_trait]
pub trait Connection: Send {
    /// Registers the callback fired when the link is lost underneath us.
    fn set_fault_listener(&mut self, listener: FaultListener);

    async fn create_session(
        &mut self,
        transacted: bool,
        ack_mode: AckMode,
    ) -> Result<Box<dyn Session>, TransportError>;

    async fn close(&mut self) -> Result<(), TransportError>;
}

#[async_trait]
pub trait Session: Send {
    async fn create_producer(
        &mut self,
        destination: &Destination,
    ) -> Result<Box<dyn Producer>, TransportError>;

    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Submits messages to the destination it was created for.
#[async_trait]
pub trait Producer: Send {
    async fn send(&mut self, message: &OutboundMessage) -> Result<Delivery, TransportError>;

    async fn close(&mut self) -> Result<(), TransportError>;
}
