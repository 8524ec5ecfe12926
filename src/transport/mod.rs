//! The `transport` module is the client side of the messaging link.
//!
//! It defines the handles a sender works with (connection factory,
//! connection, session, producer), the fault listener a connection uses to
//! report that it has been lost, and a WebSocket implementation that
//! speaks the JSON publish envelope of the broker.

pub mod client;
pub mod message;
pub mod websocket;

pub use client::{
    AckMode, Connection, ConnectionFactory, Fault, FaultListener, Producer, Session,
};
pub use message::{ClientFrame, Delivery, Destination, OutboundMessage};
pub use websocket::WsConnectionFactory;

#[cfg(test)]
mod tests;
