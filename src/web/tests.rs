use super::router;
use crate::persistence::{PersonDao, SledPersonStore};
use crate::utils::error::StorageError;
use crate::person::{Person, PersonEditHandler};

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn seeded_store() -> (Arc<SledPersonStore>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SledPersonStore::open(dir.path().to_str().unwrap()).unwrap());
    store.insert(&Person::new("42", "Old", "UK")).unwrap();
    (store, dir)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_form(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/editPerson")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn get_renders_edit_view() {
    let (store, _dir) = seeded_store();
    let app = router(PersonEditHandler::new(store));

    let request = Request::builder()
        .uri("/editPerson?id=42")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let view = body_json(response).await;
    assert_eq!(view["name"], "editPerson");
    assert_eq!(view["context"]["person"]["name"], "Old");
}

#[tokio::test]
async fn get_without_id_is_bad_request() {
    let (store, _dir) = seeded_store();
    let app = router(PersonEditHandler::new(store));

    let request = Request::builder()
        .uri("/editPerson")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(body["message"], "id missing for edit operation");
}

#[tokio::test]
async fn post_applies_edit() {
    let (store, _dir) = seeded_store();
    let app = router(PersonEditHandler::new(store.clone()));

    let response = app
        .oneshot(post_form("id=42&name=Ann&country=US"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let view = body_json(response).await;
    assert_eq!(view["name"], "searchPerson");
    assert_eq!(view["context"]["success"], "Person edited successfully");
    assert_eq!(
        store.read_by_id("42").unwrap(),
        Some(Person::new("42", "Ann", "US"))
    );
}

#[tokio::test]
async fn post_with_blank_name_rerenders_form() {
    let (store, _dir) = seeded_store();
    let app = router(PersonEditHandler::new(store.clone()));

    let response = app
        .oneshot(post_form("id=42&name=&country=US"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let view = body_json(response).await;
    assert_eq!(view["name"], "editPerson");
    assert_eq!(view["context"]["error"], "Name and Country Can't be empty");
    assert_eq!(
        store.read_by_id("42").unwrap(),
        Some(Person::new("42", "Old", "UK"))
    );
}

/// Store whose every call fails.
struct BrokenDao;

impl PersonDao for BrokenDao {
    fn read_by_id(&self, _id: &str) -> Result<Option<Person>, StorageError> {
        Err(serde_json::from_str::<Person>("{").unwrap_err().into())
    }

    fn update(&self, _person: &Person) -> Result<(), StorageError> {
        Err(serde_json::from_str::<Person>("{").unwrap_err().into())
    }
}

#[tokio::test]
async fn get_with_failing_store_is_internal_error() {
    let app = router(PersonEditHandler::new(Arc::new(BrokenDao)));

    let request = Request::builder()
        .uri("/editPerson?id=42")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], "STORAGE_ERROR");
}

#[tokio::test]
async fn post_with_failing_store_is_internal_error() {
    let app = router(PersonEditHandler::new(Arc::new(BrokenDao)));

    let response = app
        .oneshot(post_form("id=42&name=Ann&country=US"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], "STORAGE_ERROR");
}
