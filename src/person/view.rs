use serde::Serialize;
use serde_json::{Map, Value};

/// The edit form template.
pub const EDIT_VIEW: &str = "editPerson";
/// The template a successful edit forwards to.
pub const SEARCH_VIEW: &str = "searchPerson";

/// A named template plus the values it is rendered with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub name: String,
    pub context: Map<String, Value>,
}

impl View {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            context: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }
}
