use axum::extract::{Form, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerSettings;
use crate::person::{EditForm, EditQuery, PersonEditHandler, View};
use crate::utils::error::HandlerError;

pub fn router(handler: PersonEditHandler) -> Router {
    Router::new()
        .route("/editPerson", get(edit_form).post(apply_edit))
        .with_state(handler)
}

/// Serves the edit routes on `server.host:server.port` until the future is dropped.
pub async fn serve(server: &ServerSettings, handler: PersonEditHandler) -> std::io::Result<()> {
    let addr = format!("{}:{}", server.host, server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "person edit server listening");
    axum::serve(listener, router(handler)).await
}

async fn edit_form(
    State(handler): State<PersonEditHandler>,
    Query(query): Query<EditQuery>,
) -> Result<Json<View>, HandlerError> {
    handler.fetch_for_edit(&query).map(Json)
}

async fn apply_edit(
    State(handler): State<PersonEditHandler>,
    Form(form): Form<EditForm>,
) -> Result<Json<View>, HandlerError> {
    handler.submit_edit(&form).map(Json)
}
