/// JWT token generation and validation module
///
/// Tokens are signed with HS256 (HMAC-SHA256) and carry the caller's user id,
/// company id and role. Downstream code trusts these claims for the token's
/// lifetime without re-reading the user, so a role change takes effect only
/// once the old token expires.
///
/// # Security
///
/// - **Algorithm**: HS256 only; tokens declaring any other algorithm
///   (including `none`) are rejected
/// - **Expiration**: fixed 24 hours, no refresh tokens
/// - **Validation**: signature, algorithm, expiration and issuer checks
/// - **Secret Management**: secrets should be at least 32 bytes
///
/// # Example
///
/// ```
/// use construct_shared::auth::jwt::{create_token, validate_token, Claims};
/// use construct_shared::models::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let company_id = Uuid::new_v4();
///
/// let claims = Claims::new(user_id, Some(company_id), Some(UserRole::Admin));
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes!")?;
///
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes!")?;
/// assert_eq!(validated.user_id, user_id);
/// assert_eq!(validated.role, Some(UserRole::Admin));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::UserRole;

/// Issuer written into and required from every token
pub const ISSUER: &str = "construct";

/// Lifetime of every issued token
pub fn token_ttl() -> Duration {
    Duration::hours(24)
}

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was signed with something other than HS256
    #[error("Unexpected signing algorithm")]
    InvalidAlgorithm,

    /// Invalid token format
    #[error("Invalid token format: {0}")]
    InvalidFormat(String),
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `iss`: Issuer (always "construct")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
/// - `nbf`: Not before timestamp
///
/// # Custom Claims
///
/// - `user_id`: Authenticated user
/// - `company_id`: Tenant of the user, absent for federated users without one
/// - `role`: Role inside the company, absent together with `company_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,

    #[serde(default)]
    pub company_id: Option<Uuid>,

    #[serde(default)]
    pub role: Option<UserRole>,

    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
}

impl Claims {
    /// Creates new claims expiring after [`token_ttl`]
    pub fn new(user_id: Uuid, company_id: Option<Uuid>, role: Option<UserRole>) -> Self {
        Self::with_expiration(user_id, company_id, role, token_ttl())
    }

    /// Creates claims with a custom lifetime
    ///
    /// Only used directly by tests; production tokens always use [`Claims::new`].
    pub fn with_expiration(
        user_id: Uuid,
        company_id: Option<Uuid>,
        role: Option<UserRole>,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let exp = now + expires_in;

        Self {
            user_id,
            company_id,
            role,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            nbf: now.timestamp(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Signs claims into an HS256 token
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key).map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Validates a token and returns its claims
///
/// Verifies:
/// - the header declares HS256
/// - the signature matches `secret`
/// - the token is not expired and already valid (`nbf`)
/// - the issuer is "construct"
///
/// # Errors
///
/// - `JwtError::Expired` if the token has expired
/// - `JwtError::InvalidAlgorithm` if the header names another algorithm
/// - `JwtError::InvalidFormat` if the token is not a decodable JWT
/// - `JwtError::ValidationError` for signature or issuer mismatches
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_nbf = true;

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    JwtError::InvalidAlgorithm
                }
                ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) => {
                    JwtError::InvalidFormat(e.to_string())
                }
                _ => JwtError::ValidationError(e.to_string()),
            }
        })
}
