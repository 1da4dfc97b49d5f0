/// Project, task and subtask endpoints
///
/// # Endpoints
///
/// - `GET, POST /projects`
/// - `GET, PUT, DELETE /projects/:id`
/// - `GET, POST /projects/:id/tasks`
/// - `GET, PUT, DELETE /tasks/:id` - `PUT` toggles status
/// - `POST /tasks/:id/subtasks`
/// - `GET, PUT, DELETE /subtasks/:id` - `PUT` toggles status
///
/// Toggling a task to Completed completes all of its subtasks.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use construct_shared::models::{Project, Subtask, Task, WorkStatus};
use construct_shared::services::project::{
    NewSubtask, NewTask, ProjectDetails, ProjectInput, TaskDetails,
};
use construct_shared::tenant::TenantScope;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ProjectRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    pub client_id: Uuid,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    /// Free-form status; defaults to "active"
    #[serde(default)]
    #[validate(length(max = 50, message = "Status must be at most 50 characters"))]
    pub status: String,

    #[serde(default)]
    pub is_public: bool,
}

impl From<ProjectRequest> for ProjectInput {
    fn from(req: ProjectRequest) -> Self {
        Self {
            name: req.name,
            client_id: req.client_id,
            address: req.address,
            summary: req.summary,
            start_date: req.start_date,
            status: req.status,
            is_public: req.is_public,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct TaskRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[serde(default)]
    pub status: WorkStatus,

    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubtaskRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[serde(default)]
    pub status: WorkStatus,
}

/// Creates a project for a client of the caller's company
///
/// # Errors
///
/// - `404 Not Found`: Client not in the caller's company
pub async fn create_project(
    State(state): State<AppState>,
    scope: TenantScope,
    Json(req): Json<ProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    req.validate()?;

    let project = state
        .services
        .projects
        .create_project(&scope, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn list_projects(
    State(state): State<AppState>,
    scope: TenantScope,
) -> ApiResult<Json<Vec<ProjectDetails>>> {
    Ok(Json(state.services.projects.list_projects(&scope).await?))
}

pub async fn get_project(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectDetails>> {
    Ok(Json(state.services.projects.get_project(&scope, id).await?))
}

pub async fn update_project(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
    Json(req): Json<ProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate()?;

    let project = state
        .services
        .projects
        .update_project(&scope, id, req.into())
        .await?;
    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.projects.delete_project(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_tasks(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<TaskDetails>>> {
    Ok(Json(
        state.services.projects.list_tasks(&scope, project_id).await?,
    ))
}

pub async fn add_task(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(project_id): Path<Uuid>,
    Json(req): Json<TaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    let task = state
        .services
        .projects
        .add_task(
            &scope,
            project_id,
            NewTask {
                name: req.name,
                status: req.status,
                due_date: req.due_date,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskDetails>> {
    Ok(Json(state.services.projects.get_task(&scope, id).await?))
}

pub async fn toggle_task(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.services.projects.toggle_task(&scope, id).await?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.projects.delete_task(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_subtask(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(task_id): Path<Uuid>,
    Json(req): Json<SubtaskRequest>,
) -> ApiResult<(StatusCode, Json<Subtask>)> {
    req.validate()?;

    let subtask = state
        .services
        .projects
        .add_subtask(
            &scope,
            task_id,
            NewSubtask {
                name: req.name,
                status: req.status,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(subtask)))
}

pub async fn get_subtask(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Subtask>> {
    Ok(Json(state.services.projects.get_subtask(&scope, id).await?))
}

pub async fn toggle_subtask(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Subtask>> {
    Ok(Json(
        state.services.projects.toggle_subtask(&scope, id).await?,
    ))
}

pub async fn delete_subtask(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.projects.delete_subtask(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
