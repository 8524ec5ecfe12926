//! # Courier
//!
//! `courier` bundles two small, independent adapters:
//!
//! - a message `Sender` that keeps one connection to a broker, sends text
//!   messages over it and reconnects once whenever the link is lost;
//! - a `PersonEditHandler` that reads a person record for editing and
//!   applies submitted edits, served over HTTP.
//!
//! ## Core Modules
//!
//! - `config`: Loads layered settings and resolves named sender profiles.
//! - `transport`: Connection/session/producer abstractions and the WebSocket client.
//! - `sender`: Connection lifecycle, best-effort sends and reconnect-on-fault.
//! - `persistence`: The `PersonDao` trait and its `sled` store.
//! - `person`: The `Person` model, views and the edit handler.
//! - `web`: The HTTP routes for the edit form.
//! - `utils`: Error types and logging setup.

pub mod config;
pub mod persistence;
pub mod person;
pub mod sender;
pub mod transport;
pub mod utils;
pub mod web;
