/// Link endpoints
///
/// - `GET, POST /links`
/// - `PUT, DELETE /links/:id`
///
/// Click tracking is anonymous and lives in `public`.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use construct_shared::models::Link;
use construct_shared::tenant::TenantScope;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LinkRequest {
    #[validate(url(message = "Invalid URL"))]
    pub url: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,
}

pub async fn create_link(
    State(state): State<AppState>,
    scope: TenantScope,
    Json(req): Json<LinkRequest>,
) -> ApiResult<(StatusCode, Json<Link>)> {
    req.validate()?;

    let link = state
        .services
        .links
        .create_link(&scope, &req.url, &req.description)
        .await?;
    Ok((StatusCode::CREATED, Json(link)))
}

pub async fn list_links(
    State(state): State<AppState>,
    scope: TenantScope,
) -> ApiResult<Json<Vec<Link>>> {
    Ok(Json(state.services.links.list_links(&scope).await?))
}

pub async fn update_link(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
    Json(req): Json<LinkRequest>,
) -> ApiResult<Json<Link>> {
    req.validate()?;

    let link = state
        .services
        .links
        .update_link(&scope, id, &req.url, &req.description)
        .await?;
    Ok(Json(link))
}

pub async fn delete_link(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.links.delete_link(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
