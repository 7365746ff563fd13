//! Form builder session endpoints (JSON)

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::AppState;
use crate::error::AppResult;
use crate::models::AnswerInputs;
use crate::services::{EditorAction, Submission};
use crate::workflow::FormPage;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/templates", get(list_templates))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session).delete(delete_session))
        .route("/sessions/:id/actions", post(apply_action))
        .route("/sessions/:id/submit", post(submit_answers))
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateSession {
    #[serde(default)]
    pub template: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub answers: AnswerInputs,
}

pub async fn list_templates(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.sessions.template_names())
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CreateSession>>,
) -> AppResult<(StatusCode, Json<FormPage>)> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let page = state.sessions.create(request.template.as_deref())?;
    Ok((StatusCode::CREATED, Json(page)))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FormPage>> {
    Ok(Json(state.sessions.page(id)?))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.sessions.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Applies one editor action and returns the re-derived page
pub async fn apply_action(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(action): Json<EditorAction>,
) -> AppResult<Json<FormPage>> {
    Ok(Json(state.sessions.apply(id, action)?))
}

pub async fn submit_answers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitRequest>,
) -> AppResult<Json<Submission>> {
    Ok(Json(state.sessions.submit(id, &request.answers)?))
}
