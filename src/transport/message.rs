//! Message definitions for the transport.
//!
//! `OutboundMessage` is what a sender hands to a producer; `ClientFrame`
//! is how the WebSocket producer puts it on the wire.
//!
//! Notes on fields:
//! - `message_id`: locally generated and advisory only. It is not
//!   guaranteed unique and must not be used for deduplication.
//! - `timestamp`: milliseconds since UNIX epoch, set when the message is built.

use serde::{Deserialize, Serialize};

/// The named queue or topic a producer is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    name: String,
}

impl Destination {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub message_id: String,
    pub destination: String,
    pub body: String,
    pub timestamp: i64,
}

/// What the transport reports back for a submitted message.
///
/// `broker_message_id` is the broker's own identifier, when the protocol
/// exposes one. It is the identifier to trust over `message_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    pub broker_message_id: Option<String>,
}

/// Frames the WebSocket producer writes to the broker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ClientFrame {
    #[serde(rename = "publish")]
    Publish {
        topic: String,
        payload: String,
        message_id: String,
        qos: u8,
        timestamp: i64,
    },
}

impl ClientFrame {
    /// Wraps `msg` in a QoS 0 publish envelope for `topic`.
    pub fn publish(topic: &str, msg: &OutboundMessage) -> Self {
        ClientFrame::Publish {
            topic: topic.to_string(),
            payload: msg.body.clone(),
            message_id: msg.message_id.clone(),
            qos: 0,
            timestamp: msg.timestamp,
        }
    }
}
