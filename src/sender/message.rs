use crate::transport::{Destination, OutboundMessage};

/// Builds the message for `body`, stamped with a fresh local id.
pub fn build(destination: &Destination, body: &str) -> OutboundMessage {
    OutboundMessage {
        message_id: local_message_id(),
        destination: destination.name().to_string(),
        body: body.to_string(),
        timestamp: chrono::Utc::now().timestamp_millis(),
    }
}

/// `"ID:"` followed by a random non-negative 63-bit number.
///
/// Only a log-correlation aid: collisions are possible.
pub fn local_message_id() -> String {
    let value = rand::random::<u64>() >> 1;
    format!("ID:{value}")
}
