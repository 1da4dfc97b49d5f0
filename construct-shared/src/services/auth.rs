/// Authentication service
///
/// This is the only place tokens are minted. Three success paths exist:
/// signup, password login and federated login. Each issues a 24 hour HS256
/// token carrying the user's id, company and role.

use std::sync::Arc;

use super::user::available_username;
use crate::auth::identity::IdentityVerifier;
use crate::auth::jwt::{create_token, validate_token, Claims};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{CreateCompany, CreateUser, User, UserRole};
use crate::repository::{CompanyRepository, UserRepository};

/// Signup request for a new company and its first admin
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub email: String,
    pub password: String,
    pub name: String,
    pub company_name: String,
    pub tax_id: String,
}

/// Token plus the identity it was issued for
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    companies: Arc<dyn CompanyRepository>,
    identity: Arc<dyn IdentityVerifier>,
    jwt_secret: String,
    google_audience: Option<String>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        companies: Arc<dyn CompanyRepository>,
        identity: Arc<dyn IdentityVerifier>,
        jwt_secret: String,
        google_audience: Option<String>,
    ) -> Self {
        Self {
            users,
            companies,
            identity,
            jwt_secret,
            google_audience,
        }
    }

    fn issue(&self, user: &User) -> ServiceResult<IssuedToken> {
        let claims = Claims::new(user.id, user.company_id, user.role);
        let token = create_token(&claims, &self.jwt_secret)?;
        Ok(IssuedToken { token, claims })
    }

    /// Registers a company together with its first admin
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if the email or tax id is taken; nothing is
    ///   persisted in that case
    ///
    /// The admin's username is the slug of their name, numbered when another
    /// user already has it.
    pub async fn signup(&self, input: SignupInput) -> ServiceResult<IssuedToken> {
        if self.users.find_user_by_email(&input.email).await?.is_some() {
            return Err(ServiceError::AlreadyExists("email".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let username = available_username(self.users.as_ref(), &input.name).await?;

        let (company, user) = self
            .companies
            .create_company_with_admin(
                CreateCompany {
                    name: input.company_name,
                    tax_id: input.tax_id,
                    email: input.email.clone(),
                },
                CreateUser {
                    username,
                    email: input.email,
                    password_hash: Some(password_hash),
                    name: input.name,
                    company_id: None,
                    role: Some(UserRole::Admin),
                },
            )
            .await?;

        tracing::info!(user_id = %user.id, company_id = %company.id, "Signup completed");

        self.issue(&user)
    }

    /// Authenticates with email and password
    ///
    /// # Errors
    ///
    /// - `InvalidCredentials` for an unknown email, a wrong password, or an
    ///   account without a local password
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<IssuedToken> {
        let user = self
            .users
            .find_user_by_email(email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        let Some(hash) = user.password_hash.as_deref() else {
            return Err(ServiceError::InvalidCredentials);
        };

        match verify_password(password, hash) {
            Ok(true) => {}
            Ok(false) => return Err(ServiceError::InvalidCredentials),
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Stored password hash unusable");
                return Err(ServiceError::InvalidCredentials);
            }
        }

        tracing::info!(user_id = %user.id, "Login succeeded");
        self.issue(&user)
    }

    /// Authenticates with a federated ID token
    ///
    /// Unknown emails get a new user without company or role.
    ///
    /// # Errors
    ///
    /// - `InvalidToken` if verification fails, no audience is configured, or
    ///   the token carries no verified email
    pub async fn login_with_google(&self, id_token: &str) -> ServiceResult<IssuedToken> {
        let audience = self
            .google_audience
            .as_deref()
            .ok_or_else(|| {
                ServiceError::InvalidToken("federated login is not configured".to_string())
            })?;

        let identity = self
            .identity
            .validate(id_token, audience)
            .await
            .map_err(|e| ServiceError::InvalidToken(e.to_string()))?;

        let email = identity
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ServiceError::InvalidToken("token carries no email".to_string()))?;

        // An unverified email must never resolve to an existing account
        if identity.email_verified != Some(true) {
            tracing::warn!(sub = %identity.sub, "Federated login with unverified email rejected");
            return Err(ServiceError::InvalidToken(
                "token email is not verified".to_string(),
            ));
        }

        let user = match self.users.find_user_by_email(&email).await? {
            Some(user) => user,
            None => {
                let user = self
                    .users
                    .create_user(CreateUser {
                        email,
                        ..Default::default()
                    })
                    .await?;
                tracing::info!(user_id = %user.id, "Provisioned federated user");
                user
            }
        };

        self.issue(&user)
    }

    /// Checks signature, algorithm, issuer and expiry of a token
    pub fn verify_token(&self, token: &str) -> ServiceResult<Claims> {
        Ok(validate_token(token, &self.jwt_secret)?)
    }
}
