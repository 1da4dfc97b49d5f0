/// Account endpoints for the authenticated user
///
/// These need a valid token but no company, so federated users that have
/// not joined one can still manage their profile.
///
/// # Endpoints
///
/// - `GET /username?username=x` - Check availability
/// - `POST /username` - Change username
/// - `GET /user/username` - Current username
/// - `GET, PUT /user/profile` - Profile
/// - `PUT /user/bio` - Bio
/// - `PUT /user/password` - Change password

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use construct_shared::auth::middleware::AuthContext;
use construct_shared::models::{UpdateProfile, User};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct UsernameRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsernameAvailability {
    pub username: String,
    pub available: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsernameResponse {
    pub username: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    pub phone: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBioRequest {
    #[validate(length(max = 1000, message = "Bio must be at most 1000 characters"))]
    pub bio: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// Checks that a username is free
///
/// # Errors
///
/// - `409 Conflict`: Taken
/// - `422 Unprocessable Entity`: Not a valid slug
pub async fn verify_username(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(req): Query<UsernameRequest>,
) -> ApiResult<Json<UsernameAvailability>> {
    req.validate()?;

    state.services.users.verify_username(&req.username).await?;
    Ok(Json(UsernameAvailability {
        username: req.username,
        available: true,
    }))
}

pub async fn update_username(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<UsernameRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    let user = state
        .services
        .users
        .update_username(auth.user_id, &req.username)
        .await?;
    Ok(Json(user))
}

pub async fn get_username(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<UsernameResponse>> {
    let username = state.services.users.get_username(auth.user_id).await?;
    Ok(Json(UsernameResponse { username }))
}

pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<User>> {
    Ok(Json(state.services.users.get_profile(auth.user_id).await?))
}

/// Replaces name, email and phone
///
/// # Errors
///
/// - `409 Conflict`: Email belongs to another account
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    let user = state
        .services
        .users
        .update_profile(
            auth.user_id,
            UpdateProfile {
                name: req.name,
                email: req.email,
                phone: req.phone,
            },
        )
        .await?;
    Ok(Json(user))
}

pub async fn update_bio(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<UpdateBioRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    Ok(Json(
        state.services.users.update_bio(auth.user_id, &req.bio).await?,
    ))
}

/// Changes the password
///
/// # Errors
///
/// - `400 Bad Request` (`invalid_old_password`): Current password wrong
pub async fn update_password(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<UpdatePasswordRequest>,
) -> ApiResult<StatusCode> {
    req.validate()?;

    state
        .services
        .users
        .update_password(auth.user_id, &req.old_password, &req.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
