/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /signup` - Register a company and its admin
/// - `POST /login` - Email and password login
/// - `POST /auth/google`, `POST /signup/google` - Federated login
/// - `POST /auth/verify` - Check a token and echo its identity
///
/// Every success returns the same [`TokenResponse`].

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use construct_shared::auth::jwt::Claims;
use construct_shared::models::UserRole;
use construct_shared::services::auth::{IssuedToken, SignupInput};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 200, message = "Company name must be 1-200 characters"))]
    pub company_name: String,

    #[validate(length(min = 1, max = 50, message = "Tax id must be 1-50 characters"))]
    pub tax_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GoogleLoginRequest {
    /// ID token obtained from Google Sign-In
    #[validate(length(min = 1, message = "ID token is required"))]
    pub id_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// Identity carried by a token
#[derive(Debug, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub company_id: Option<Uuid>,
    pub role: Option<UserRole>,
    pub expires_at: DateTime<Utc>,
}

impl From<&Claims> for Identity {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.user_id,
            company_id: claims.company_id,
            role: claims.role,
            expires_at: claims.expires_at(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer token (24h)
    pub token: String,

    #[serde(flatten)]
    pub identity: Identity,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            identity: Identity::from(&issued.claims),
            token: issued.token,
        }
    }
}

/// Register a company with its first admin
///
/// # Endpoint
///
/// ```text
/// POST /signup
/// Content-Type: application/json
///
/// {
///   "email": "a@x.com",
///   "password": "secret1",
///   "name": "Ada",
///   "company_name": "Acme",
///   "tax_id": "123"
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Email, username or tax id already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    req.validate()?;

    let issued = state
        .services
        .auth
        .signup(SignupInput {
            email: req.email,
            password: req.password,
            name: req.name,
            company_name: req.company_name,
            tax_id: req.tax_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(issued.into())))
}

/// Login with email and password
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials (same body for every cause)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()?;

    let issued = state.services.auth.login(&req.email, &req.password).await?;
    Ok(Json(issued.into()))
}

/// Login or sign up with a Google ID token
///
/// Unknown emails get an account without a company.
///
/// # Errors
///
/// - `401 Unauthorized`: Token rejected, or federated login disabled
pub async fn google_login(
    State(state): State<AppState>,
    Json(req): Json<GoogleLoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()?;

    let issued = state.services.auth.login_with_google(&req.id_token).await?;
    Ok(Json(issued.into()))
}

/// Verify a token
///
/// # Errors
///
/// - `401 Unauthorized`: Bad signature, algorithm, issuer or expiry
pub async fn verify(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> ApiResult<Json<Identity>> {
    req.validate()?;

    let claims = state.services.auth.verify_token(&req.token)?;
    Ok(Json(Identity::from(&claims)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_validation() {
        let req = SignupRequest {
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
            name: "Ada".to_string(),
            company_name: "Acme".to_string(),
            tax_id: "123".to_string(),
        };
        assert!(req.validate().is_ok());

        let req = SignupRequest {
            email: "not-an-email".to_string(),
            password: "123".to_string(),
            ..req
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_token_response_flattens_identity() {
        let claims = Claims::new(Uuid::new_v4(), None, None);
        let body = serde_json::to_value(TokenResponse::from(IssuedToken {
            token: "t".to_string(),
            claims: claims.clone(),
        }))
        .unwrap();

        assert_eq!(body["token"], "t");
        assert_eq!(body["user_id"], claims.user_id.to_string());
        assert!(body["company_id"].is_null());
    }
}
