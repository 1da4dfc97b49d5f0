/// Business services
///
/// Services hold repository trait objects and carry the rules: tenant
/// scoping for child rows, status toggles, password handling and token
/// issuance. They know nothing about HTTP.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use construct_shared::auth::identity::GoogleIdentityVerifier;
/// use construct_shared::repository::{MemoryRepository, Repositories};
/// use construct_shared::services::{AuthSettings, Services};
/// use construct_shared::services::client::CommentScopePolicy;
///
/// let repos = Repositories::from_store(MemoryRepository::new());
/// let services = Services::new(
///     &repos,
///     Arc::new(GoogleIdentityVerifier::new()),
///     AuthSettings {
///         jwt_secret: "a-secret-that-is-at-least-32-bytes-long".to_string(),
///         google_audience: None,
///     },
///     CommentScopePolicy::default(),
/// );
/// ```

pub mod auth;
pub mod client;
pub mod company;
pub mod link;
pub mod project;
pub mod user;

use std::sync::Arc;

use crate::auth::identity::IdentityVerifier;
use crate::repository::Repositories;

pub use auth::AuthService;
pub use client::{ClientService, CommentScopePolicy};
pub use company::CompanyService;
pub use link::LinkService;
pub use project::ProjectService;
pub use user::UserService;

/// Token settings for [`AuthService`]
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    /// Client id expected in federated ID tokens; federated login is
    /// disabled when unset
    pub google_audience: Option<String>,
}

/// Every service, wired to one set of repositories
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub companies: CompanyService,
    pub users: UserService,
    pub clients: ClientService,
    pub projects: ProjectService,
    pub links: LinkService,
}

impl Services {
    pub fn new(
        repos: &Repositories,
        identity: Arc<dyn IdentityVerifier>,
        settings: AuthSettings,
        comment_policy: CommentScopePolicy,
    ) -> Self {
        Self {
            auth: AuthService::new(
                repos.users.clone(),
                repos.companies.clone(),
                identity,
                settings.jwt_secret,
                settings.google_audience,
            ),
            companies: CompanyService::new(repos.companies.clone()),
            users: UserService::new(repos.users.clone(), repos.links.clone()),
            clients: ClientService::new(repos.clients.clone(), comment_policy),
            projects: ProjectService::new(repos.projects.clone(), repos.clients.clone()),
            links: LinkService::new(repos.links.clone()),
        }
    }
}
