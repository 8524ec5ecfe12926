use sled::{Db, Tree};
use tracing::debug;

use crate::persistence::PersonDao;
use crate::person::Person;
use crate::utils::error::StorageError;

const PERSONS_TREE: &str = "persons";

#[derive(Clone)]
pub struct SledPersonStore {
    db: Db,
    persons: Tree,
}

impl SledPersonStore {
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Self::with_db(db)
    }

    pub fn with_db(db: Db) -> Result<Self, StorageError> {
        let persons = db.open_tree(PERSONS_TREE)?;
        Ok(Self { db, persons })
    }

    /// Stores a new record, or replaces an existing one with the same id.
    pub fn insert(&self, person: &Person) -> Result<(), StorageError> {
        let serialized = serde_json::to_vec(person)?;
        self.persons.insert(person.id.as_bytes(), serialized)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}

impl PersonDao for SledPersonStore {
    fn read_by_id(&self, id: &str) -> Result<Option<Person>, StorageError> {
        match self.persons.get(id.as_bytes())? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => {
                debug!(id, "no person stored under id");
                Ok(None)
            }
        }
    }

    fn update(&self, person: &Person) -> Result<(), StorageError> {
        self.insert(person)
    }
}

impl std::fmt::Debug for SledPersonStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledPersonStore")
            .field("db", &"sled::Db")
            .field("persons", &self.persons.len())
            .finish()
    }
}
