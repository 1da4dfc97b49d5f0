/// Company administration endpoints (admin only)
///
/// - `GET, PUT /company` - Company details
/// - `GET, POST /company/members` - Members
///
/// Non-admins get `403` from the `AdminScope` extractor.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, http::StatusCode, Json};
use construct_shared::auth::middleware::AdminScope;
use construct_shared::models::{Company, UpdateCompany, User, UserRole};
use construct_shared::services::user::NewMember;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// `admin` or `member`
    pub role: String,
}

pub async fn get_company(
    State(state): State<AppState>,
    AdminScope(scope): AdminScope,
) -> ApiResult<Json<Company>> {
    Ok(Json(state.services.companies.get_company(&scope).await?))
}

pub async fn update_company(
    State(state): State<AppState>,
    AdminScope(scope): AdminScope,
    Json(req): Json<UpdateCompanyRequest>,
) -> ApiResult<Json<Company>> {
    req.validate()?;

    let company = state
        .services
        .companies
        .update_company(
            &scope,
            UpdateCompany {
                name: req.name,
                email: req.email,
                phone: req.phone,
                address: req.address,
            },
        )
        .await?;
    Ok(Json(company))
}

pub async fn list_members(
    State(state): State<AppState>,
    AdminScope(scope): AdminScope,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.services.users.list_members(&scope).await?))
}

/// Adds a member to the admin's company
///
/// # Errors
///
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Invalid fields or unknown role
pub async fn add_member(
    State(state): State<AppState>,
    AdminScope(scope): AdminScope,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    req.validate()?;

    let role = req.role.parse::<UserRole>().map_err(|_| {
        ApiError::ValidationError(vec![ValidationErrorDetail::new(
            "role",
            "Role must be 'admin' or 'member'",
        )])
    })?;

    let user = state
        .services
        .users
        .add_member(
            &scope,
            NewMember {
                email: req.email,
                name: req.name,
                password: req.password,
                role,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}
