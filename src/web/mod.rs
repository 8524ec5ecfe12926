//! The `web` module binds the person edit handler to HTTP.
//!
//! - `GET /editPerson?id=<id>` renders the edit form
//! - `POST /editPerson` with urlencoded `id`, `name`, `country` applies it
//!
//! Both answer with the forwarded view (template name and context) as JSON.

pub mod error;
pub mod routes;

pub use routes::{router, serve};

#[cfg(test)]
mod tests;
