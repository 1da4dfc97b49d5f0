/// User account and membership service
///
/// Operations on the caller's own account take the user id from the token.
/// Membership operations take the admin's [`TenantScope`] and always create
/// or list users inside that company.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{CreateUser, Link, UpdateProfile, User, UserRole};
use crate::repository::{LinkRepository, UserRepository};
use crate::tenant::{TenantId, TenantScope};

/// Derives a URL-safe username from a display name
///
/// Lowercases and trims the input, collapses each run of characters outside
/// `[a-z0-9]` into a single `-`, and strips leading and trailing dashes.
///
/// ```
/// use construct_shared::services::user::slugify;
///
/// assert_eq!(slugify("  Ada Lovelace! "), "ada-lovelace");
/// assert_eq!(slugify("José"), "jos");
/// ```
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.trim().to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Numbered variants tried before falling back to a random suffix
const NUMBERED_USERNAME_ATTEMPTS: u32 = 20;

/// Picks a free username for a display name
///
/// Tries the bare slug, then `slug-2`, `slug-3` and so on, and finally the
/// slug with eight random hex digits. Returns `None` when the name has no
/// slug at all. Two concurrent callers can still pick the same variant; the
/// loser's insert then fails on the unique constraint.
pub(crate) async fn available_username(
    users: &dyn UserRepository,
    name: &str,
) -> ServiceResult<Option<String>> {
    let base = slugify(name);
    if base.is_empty() {
        return Ok(None);
    }

    if users.find_user_by_username(&base).await?.is_none() {
        return Ok(Some(base));
    }

    for n in 2..=NUMBERED_USERNAME_ATTEMPTS {
        let candidate = format!("{}-{}", base, n);
        if users.find_user_by_username(&candidate).await?.is_none() {
            return Ok(Some(candidate));
        }
    }

    let suffix = Uuid::new_v4().simple().to_string();
    Ok(Some(format!("{}-{}", base, &suffix[..8])))
}

/// Publicly visible part of a user, with their company's links
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub username: String,
    pub name: String,
    pub bio: String,
    pub avatar: String,
    pub links: Vec<Link>,
}

/// New company member created by an admin
#[derive(Debug, Clone)]
pub struct NewMember {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    links: Arc<dyn LinkRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, links: Arc<dyn LinkRepository>) -> Self {
        Self { users, links }
    }

    async fn current_user(&self, user_id: Uuid) -> ServiceResult<User> {
        self.users
            .find_user(user_id)
            .await?
            .ok_or(ServiceError::Unauthorized)
    }

    /// Checks that a username is well-formed and not taken
    ///
    /// # Errors
    ///
    /// - `Validation` if the value is empty or not already a slug
    /// - `AlreadyExists` if another user has it
    pub async fn verify_username(&self, username: &str) -> ServiceResult<()> {
        if username.is_empty() || slugify(username) != username {
            return Err(ServiceError::Validation(
                "username may only contain lowercase letters, digits and dashes".to_string(),
            ));
        }

        if self.users.find_user_by_username(username).await?.is_some() {
            return Err(ServiceError::AlreadyExists("username".to_string()));
        }

        Ok(())
    }

    pub async fn update_username(&self, user_id: Uuid, username: &str) -> ServiceResult<User> {
        let current = self.current_user(user_id).await?;
        if current.username.as_deref() == Some(username) {
            return Ok(current);
        }

        self.verify_username(username).await?;

        let user = self
            .users
            .update_username(user_id, username)
            .await?
            .ok_or(ServiceError::Unauthorized)?;

        tracing::info!(user_id = %user_id, username = %username, "Username changed");
        Ok(user)
    }

    /// Returns the caller's username, if one has been chosen
    pub async fn get_username(&self, user_id: Uuid) -> ServiceResult<Option<String>> {
        Ok(self.current_user(user_id).await?.username)
    }

    pub async fn get_profile(&self, user_id: Uuid) -> ServiceResult<User> {
        self.current_user(user_id).await
    }

    pub async fn update_profile(&self, user_id: Uuid, data: UpdateProfile) -> ServiceResult<User> {
        self.users
            .update_profile(user_id, data)
            .await?
            .ok_or(ServiceError::Unauthorized)
    }

    pub async fn update_bio(&self, user_id: Uuid, bio: &str) -> ServiceResult<User> {
        self.users
            .update_bio(user_id, bio)
            .await?
            .ok_or(ServiceError::Unauthorized)
    }

    /// Anonymous profile lookup by username
    ///
    /// Links shown are those of the user's company; tenant-less users have none.
    pub async fn get_public_profile(&self, username: &str) -> ServiceResult<PublicProfile> {
        let user = self
            .users
            .find_user_by_username(username)
            .await?
            .ok_or(ServiceError::NotFoundOrForbidden)?;

        let links = match user.company_id {
            Some(company_id) => {
                self.links
                    .list_links(TenantId::from_company(company_id))
                    .await?
            }
            None => Vec::new(),
        };

        Ok(PublicProfile {
            username: username.to_string(),
            name: user.name,
            bio: user.bio,
            avatar: user.avatar,
            links,
        })
    }

    /// Changes the caller's password
    ///
    /// # Errors
    ///
    /// - `InvalidOldPassword` if `old_password` does not match, or the account
    ///   has no local password
    pub async fn update_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> ServiceResult<()> {
        let user = self.current_user(user_id).await?;

        let matches = match user.password_hash.as_deref() {
            Some(hash) => verify_password(old_password, hash)?,
            None => false,
        };
        if !matches {
            return Err(ServiceError::InvalidOldPassword);
        }

        let hash = hash_password(new_password)?;
        if !self.users.update_password_hash(user_id, &hash).await? {
            return Err(ServiceError::Unauthorized);
        }

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    pub async fn list_members(&self, scope: &TenantScope) -> ServiceResult<Vec<User>> {
        Ok(self.users.list_company_members(scope.tenant()).await?)
    }

    /// Creates a user inside the admin's company
    ///
    /// The member's username is derived from their name like at signup.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if the email is taken
    pub async fn add_member(&self, scope: &TenantScope, member: NewMember) -> ServiceResult<User> {
        if self.users.find_user_by_email(&member.email).await?.is_some() {
            return Err(ServiceError::AlreadyExists("email".to_string()));
        }

        let password_hash = hash_password(&member.password)?;
        let username = available_username(self.users.as_ref(), &member.name).await?;
        let user = self
            .users
            .create_user(CreateUser {
                username,
                email: member.email,
                password_hash: Some(password_hash),
                name: member.name,
                company_id: Some(scope.company_id()),
                role: Some(member.role),
            })
            .await?;

        tracing::info!(
            user_id = %user.id,
            company_id = %scope.company_id(),
            role = %member.role,
            added_by = %scope.user_id(),
            "Company member added"
        );
        Ok(user)
    }
}
