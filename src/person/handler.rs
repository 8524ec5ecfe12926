use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::persistence::PersonDao;
use crate::person::model::Person;
use crate::person::view::{EDIT_VIEW, SEARCH_VIEW, View};
use crate::utils::error::HandlerError;

pub const VALIDATION_MESSAGE: &str = "Name and Country Can't be empty";
pub const SUCCESS_MESSAGE: &str = "Person edited successfully";

/// Query parameters of the read path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditQuery {
    pub id: Option<String>,
}

/// Submitted fields of the write path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditForm {
    pub id: Option<String>,
    pub name: Option<String>,
    pub country: Option<String>,
}

/// Serves and applies the edit form of one person record.
///
/// Holds nothing but the shared store, so one handler can serve any number
/// of concurrent requests.
#[derive(Clone)]
pub struct PersonEditHandler {
    dao: Arc<dyn PersonDao>,
}

impl PersonEditHandler {
    pub fn new(dao: Arc<dyn PersonDao>) -> Self {
        Self { dao }
    }

    /// Looks the record up and forwards to the edit form.
    ///
    /// An unknown id still renders the form, with `person` set to null.
    pub fn fetch_for_edit(&self, query: &EditQuery) -> Result<View, HandlerError> {
        let id = required_id(query.id.as_deref())?;
        info!(id, "person edit requested");

        let person = self.dao.read_by_id(id)?;
        Ok(View::new(EDIT_VIEW).with(
            "person",
            person.map_or(Value::Null, |p| p.to_value()),
        ))
    }

    /// Validates the submission and, when it is complete, replaces the
    /// stored name and country.
    pub fn submit_edit(&self, form: &EditForm) -> Result<View, HandlerError> {
        let id = required_id(form.id.as_deref())?;
        let name = form.name.as_deref().unwrap_or_default();
        let country = form.country.as_deref().unwrap_or_default();
        let person = Person::new(id, name, country);

        if name.is_empty() || country.is_empty() {
            warn!(id, "rejected person edit with empty fields");
            return Ok(View::new(EDIT_VIEW)
                .with("error", VALIDATION_MESSAGE)
                .with("person", person.to_value()));
        }

        self.dao.update(&person)?;
        info!(id, "person edited successfully");

        Ok(View::new(SEARCH_VIEW)
            .with("success", SUCCESS_MESSAGE)
            .with("person", person.to_value()))
    }
}

fn required_id(id: Option<&str>) -> Result<&str, HandlerError> {
    match id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(HandlerError::MissingId),
    }
}
