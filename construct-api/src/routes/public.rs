/// Anonymous endpoints
///
/// - `GET /public/profile/:username` - Profile and company links
/// - `GET /public/projects/:id` - Project marked public, with its task tree
/// - `POST /public/links/:id/click` - Record a link click
///
/// Missing and non-public resources both return `404`.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use construct_shared::models::LinkClick;
use construct_shared::services::project::ProjectDetails;
use construct_shared::services::user::PublicProfile;
use uuid::Uuid;

pub async fn get_public_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<PublicProfile>> {
    Ok(Json(state.services.users.get_public_profile(&username).await?))
}

pub async fn get_public_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectDetails>> {
    Ok(Json(state.services.projects.get_public_project(id).await?))
}

pub async fn track_click(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<LinkClick>)> {
    let click = state.services.links.track_click(id).await?;
    Ok((StatusCode::CREATED, Json(click)))
}
