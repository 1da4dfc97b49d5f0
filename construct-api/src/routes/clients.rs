/// Client endpoints
///
/// - `GET, POST /clients`
/// - `GET, PUT, DELETE /clients/:id`
/// - `POST /clients/:id/comments`

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use construct_shared::models::{Client, Comment};
use construct_shared::services::client::{ClientDetails, ClientInput};
use construct_shared::tenant::TenantScope;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ClientRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub summary: String,
}

impl From<ClientRequest> for ClientInput {
    fn from(req: ClientRequest) -> Self {
        Self {
            name: req.name,
            phone: req.phone,
            address: req.address,
            summary: req.summary,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 5000, message = "Comment must be 1-5000 characters"))]
    pub content: String,
}

pub async fn create_client(
    State(state): State<AppState>,
    scope: TenantScope,
    Json(req): Json<ClientRequest>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    req.validate()?;

    let client = state.services.clients.create_client(&scope, req.into()).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn list_clients(
    State(state): State<AppState>,
    scope: TenantScope,
) -> ApiResult<Json<Vec<Client>>> {
    Ok(Json(state.services.clients.list_clients(&scope).await?))
}

pub async fn get_client(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ClientDetails>> {
    Ok(Json(state.services.clients.get_client(&scope, id).await?))
}

pub async fn update_client(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
    Json(req): Json<ClientRequest>,
) -> ApiResult<Json<Client>> {
    req.validate()?;

    let client = state
        .services
        .clients
        .update_client(&scope, id, req.into())
        .await?;
    Ok(Json(client))
}

pub async fn delete_client(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.clients.delete_client(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_comment(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
    Json(req): Json<CommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    req.validate()?;

    let comment = state
        .services
        .clients
        .add_comment(&scope, id, &req.content)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
