/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 token issuance and validation
/// - [`identity`]: federated ID token verification (Google)
/// - [`middleware`]: bearer extraction and request extractors
/// - [`authorization`]: role checks
///
/// # Example
///
/// ```
/// use construct_shared::auth::password::{hash_password, verify_password};
/// use construct_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), None, None);
/// let token = create_token(&claims, "secret-key-that-is-at-least-32-bytes")?;
/// assert_eq!(validate_token(&token, "secret-key-that-is-at-least-32-bytes")?, claims);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod password;
