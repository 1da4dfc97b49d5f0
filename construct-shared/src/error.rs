/// Service error taxonomy
///
/// Services return [`ServiceResult`]. The transport layer maps each variant
/// to one stable status code. `NotFoundOrForbidden` intentionally covers
/// both "does not exist" and "belongs to another company".

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::repository::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Duplicate email, username or tax id
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// Login failure; never says which part was wrong
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Bad signature, algorithm, expiry, or failed federated verification
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Session refers to an account that no longer exists
    #[error("Unauthorized")]
    Unauthorized,

    /// Scoped lookup miss
    #[error("Resource not found")]
    NotFoundOrForbidden,

    /// Password change with a wrong current password
    #[error("Invalid old password")]
    InvalidOldPassword,

    /// Input rejected by a business rule
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Backing store failure
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Names the duplicated field from a unique constraint name
    fn already_exists_for(constraint: &str) -> Self {
        let what = if constraint.contains("email") {
            "email"
        } else if constraint.contains("username") {
            "username"
        } else if constraint.contains("tax_id") {
            "tax id"
        } else {
            "record"
        };
        ServiceError::AlreadyExists(what.to_string())
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(constraint) => Self::already_exists_for(&constraint),
            StoreError::MissingReference(_) => ServiceError::NotFoundOrForbidden,
            StoreError::Database(e) => ServiceError::Storage(e.to_string()),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ServiceError::Internal(msg),
            other => ServiceError::InvalidToken(other.to_string()),
        }
    }
}
