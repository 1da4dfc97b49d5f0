/// Authentication middleware and extractors for Axum
///
/// The API wraps every authenticated route in a layer that calls
/// [`authenticate`]. That function validates the bearer token and inserts an
/// [`AuthContext`] into the request extensions. Handlers then pull what they
/// need through the extractors defined here:
///
/// - [`AuthContext`]: any authenticated caller, including tenant-less ones
/// - [`TenantScope`]: a caller bound to a company (403 otherwise)
/// - [`AdminScope`]: a company admin (403 otherwise)
///
/// # Example
///
/// ```no_run
/// use construct_shared::auth::middleware::AdminScope;
/// use construct_shared::tenant::TenantScope;
///
/// async fn list_clients(scope: TenantScope) -> String {
///     format!("company {}", scope.company_id())
/// }
///
/// async fn manage_company(AdminScope(scope): AdminScope) -> String {
///     format!("admin {}", scope.user_id())
/// }
/// ```

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::authorization::{require_admin, AuthzError};
use super::jwt::{validate_token, Claims, JwtError};
use crate::models::UserRole;
use crate::tenant::{TenantId, TenantScope};

/// Identity of the caller, taken verbatim from token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub company_id: Option<Uuid>,
    pub role: Option<UserRole>,
}

impl AuthContext {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.user_id,
            company_id: claims.company_id,
            role: claims.role,
        }
    }

    /// Binds the caller to their company
    ///
    /// # Errors
    ///
    /// Returns `AuthzError::NoTenant` when company or role is absent
    pub fn tenant_scope(&self) -> Result<TenantScope, AuthzError> {
        match (self.company_id, self.role) {
            (Some(company_id), Some(role)) => Ok(TenantScope::new(
                self.user_id,
                TenantId::from_company(company_id),
                role,
            )),
            _ => Err(AuthzError::NoTenant),
        }
    }
}

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),

    /// Authenticated but not allowed
    Forbidden(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token has expired".to_string()),
            other => AuthError::InvalidToken(other.to_string()),
        }
    }
}

impl From<AuthzError> for AuthError {
    fn from(err: AuthzError) -> Self {
        AuthError::Forbidden(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AuthError::MissingCredentials => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Missing authorization header".to_string(),
            ),
            AuthError::InvalidFormat(msg) | AuthError::InvalidToken(msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg)
            }
            AuthError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
        };

        (
            status,
            Json(serde_json::json!({ "error": error, "message": message })),
        )
            .into_response()
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("Invalid authorization header".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Empty bearer token".to_string()));
    }

    Ok(token)
}

/// Validates the request's bearer token
///
/// # Errors
///
/// Returns `AuthError` (401) if the header is missing or malformed, or if the
/// token fails validation
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;
    let claims = validate_token(token, secret)?;

    tracing::debug!(user_id = %claims.user_id, "Request authenticated");

    Ok(AuthContext::from_claims(&claims))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TenantScope
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthContext::from_request_parts(parts, state).await?;
        Ok(auth.tenant_scope()?)
    }
}

/// Tenant scope of a company admin
#[derive(Debug, Clone)]
pub struct AdminScope(pub TenantScope);

#[async_trait]
impl<S> FromRequestParts<S> for AdminScope
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let scope = TenantScope::from_request_parts(parts, state).await?;
        require_admin(&scope)?;
        Ok(AdminScope(scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_token;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_authenticate_valid_token() {
        let claims = Claims::new(Uuid::new_v4(), Some(Uuid::new_v4()), Some(UserRole::Member));
        let token = create_token(&claims, SECRET).unwrap();

        let auth = authenticate(&headers_with(&format!("Bearer {}", token)), SECRET).unwrap();
        assert_eq!(auth.user_id, claims.user_id);
        assert_eq!(auth.company_id, claims.company_id);
        assert_eq!(auth.role, Some(UserRole::Member));
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            authenticate(&HeaderMap::new(), SECRET),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_non_bearer_scheme() {
        assert!(matches!(
            authenticate(&headers_with("Basic dXNlcjpwYXNz"), SECRET),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_malformed_token() {
        assert!(matches!(
            authenticate(&headers_with("Bearer abc.def"), SECRET),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_auth_errors_are_unauthorized() {
        for err in [
            AuthError::MissingCredentials,
            AuthError::InvalidFormat("x".to_string()),
            AuthError::InvalidToken("x".to_string()),
        ] {
            assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
        }

        let forbidden: AuthError = AuthzError::NoTenant.into();
        assert_eq!(forbidden.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_tenantless_context_has_no_scope() {
        let auth = AuthContext {
            user_id: Uuid::new_v4(),
            company_id: None,
            role: None,
        };
        assert_eq!(auth.tenant_scope(), Err(AuthzError::NoTenant));
    }
}
