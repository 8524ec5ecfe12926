//! The `persistence` module provides the data-access layer for `Person`
//! documents.
//!
//! Callers depend on the `PersonDao` trait; `SledPersonStore` keeps each
//! person as a JSON document in an embedded `sled` tree keyed by id.

pub mod sled_store;

use crate::person::Person;
use crate::utils::error::StorageError;

pub use sled_store::SledPersonStore;

/// Reads and writes `Person` records.
///
/// Implementations must be safe to share between concurrent requests.
pub trait PersonDao: Send + Sync {
    fn read_by_id(&self, id: &str) -> Result<Option<Person>, StorageError>;

    /// Replaces the stored record with `person` in full. Last writer wins.
    fn update(&self, person: &Person) -> Result<(), StorageError>;
}
