use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A stored person. The `id` never changes once the record exists; `name`
/// and `country` are replaced together on every edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub country: String,
}

impl Person {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            country: country.into(),
        }
    }

    /// The record as a view context value.
    pub fn to_value(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "country": self.country,
        })
    }
}
