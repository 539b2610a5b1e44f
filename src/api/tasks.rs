//! RESTful resource over the `tasks` table.
//!
//! None of these handlers check ownership: any caller can read, edit or
//! delete any task by id. Only the slash-command surface scopes by creator.

use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::models::task::{Task, TaskStatus};

#[derive(Debug, Deserialize)]
pub struct CreateTaskForm {
    pub content: String,
    pub creator_id: i32,
    /// Defaults to `ToDo` when absent; unknown names are rejected.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskForm {
    pub content: Option<String>,
}

/// Only `content` is applied; other submitted fields are ignored.
#[derive(Debug, Deserialize)]
pub struct ReplaceTaskForm {
    pub content: String,
}

/// `GET /tasks`
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.store.list_tasks().await?;
    Ok(Json(tasks))
}

/// `POST /tasks`
pub async fn store(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<CreateTaskForm>,
) -> Result<Json<Task>, ApiError> {
    let status = payload
        .status
        .as_deref()
        .map(str::parse::<TaskStatus>)
        .transpose()?
        .unwrap_or_default();

    let task = state
        .store
        .create_task(&payload.content, status, payload.creator_id)
        .await?;
    Ok(Json(task))
}

/// `GET /tasks/{id}`
pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Task>, ApiError> {
    state
        .store
        .get_task(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Task", id))
}

/// `PATCH /tasks/{id}`
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(payload): Form<UpdateTaskForm>,
) -> Result<Json<Task>, ApiError> {
    let task = match payload.content {
        Some(content) => state.store.update_task_content(id, &content).await?,
        None => state.store.get_task(id).await?,
    };

    task.map(Json).ok_or_else(|| ApiError::not_found("Task", id))
}

/// `PUT /tasks/{id}`
pub async fn replace(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(payload): Form<ReplaceTaskForm>,
) -> Result<Json<Task>, ApiError> {
    state
        .store
        .update_task_content(id, &payload.content)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Task", id))
}

/// `DELETE /tasks/{id}`
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_task(id).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::not_found("Task", id))
    }
}

/// `DELETE /tasks`
pub async fn clear(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    state.store.clear_tasks().await?;
    Ok(StatusCode::OK)
}
