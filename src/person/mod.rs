//! The `person` module serves and processes the edit form for a single
//! `Person` record.
//!
//! The handler is transport-agnostic: it takes already-parsed request
//! parameters and answers with the `View` to forward to. The HTTP binding
//! lives in `web`.

pub mod handler;
pub mod model;
pub mod view;

pub use handler::{EditForm, EditQuery, PersonEditHandler};
pub use model::Person;
pub use view::View;
