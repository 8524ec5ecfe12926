//! The `sender` module keeps one live connection to a broker and sends text
//! messages over it, one at a time.
//!
//! Sends are best-effort: a failed send is logged and returned to the caller
//! as a `SendError`, never raised further. A lost connection gets exactly one
//! reconnect attempt per fault notification; if that attempt fails, sending
//! stays disabled until another fault arrives or `reconnect` is called.

pub mod engine;
pub mod message;

pub use engine::{ConnectionStatus, Receipt, Sender};
