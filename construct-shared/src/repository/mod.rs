/// Repository contracts
///
/// Each trait is the persistence boundary for one aggregate. Every
/// tenant-owned operation takes a [`TenantId`] and must apply it as a query
/// predicate, never as an in-memory comparison after fetching. A row owned by
/// another company must look exactly like a missing row (`None` / `false`).
///
/// The few intentionally unscoped operations have distinct names:
/// `find_public_project`, `add_comment` and `record_click`.
///
/// Two implementations exist:
///
/// - [`postgres::PgRepository`]: sqlx over PostgreSQL
/// - [`memory::MemoryRepository`]: in-process store with the same
///   uniqueness and foreign key rules, used by tests

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Client, Comment, Company, CreateClient, CreateCompany, CreateLink, CreateProject,
    CreateSubtask, CreateTask, CreateUser, Link, LinkClick, Project, Subtask, Task, UpdateClient,
    UpdateCompany, UpdateLink, UpdateProfile, UpdateProject, User, WorkStatus,
};
use crate::tenant::TenantId;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write; holds the constraint name
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    /// A foreign key pointed at a missing row
    #[error("Referenced row does not exist: {0}")]
    MissingReference(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let constraint = db.constraint().unwrap_or("unknown").to_string();
            if db.is_unique_violation() {
                return StoreError::Conflict(constraint);
            }
            if db.is_foreign_key_violation() {
                return StoreError::MissingReference(constraint);
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Creates a company and its admin atomically: both rows or neither
    async fn create_company_with_admin(
        &self,
        company: CreateCompany,
        admin: CreateUser,
    ) -> StoreResult<(Company, User)>;

    async fn find_company(&self, tenant: TenantId) -> StoreResult<Option<Company>>;

    async fn update_company(
        &self,
        tenant: TenantId,
        data: UpdateCompany,
    ) -> StoreResult<Option<Company>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn list_company_members(&self, tenant: TenantId) -> StoreResult<Vec<User>>;

    async fn update_username(&self, id: Uuid, username: &str) -> StoreResult<Option<User>>;

    async fn update_profile(&self, id: Uuid, data: UpdateProfile) -> StoreResult<Option<User>>;

    async fn update_bio(&self, id: Uuid, bio: &str) -> StoreResult<Option<User>>;

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<bool>;
}

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn create_client(&self, tenant: TenantId, data: CreateClient) -> StoreResult<Client>;

    async fn find_client(&self, tenant: TenantId, id: Uuid) -> StoreResult<Option<Client>>;

    async fn list_clients(&self, tenant: TenantId) -> StoreResult<Vec<Client>>;

    /// Clients among `ids` that belong to `tenant`
    async fn find_clients(&self, tenant: TenantId, ids: &[Uuid]) -> StoreResult<Vec<Client>>;

    async fn update_client(
        &self,
        tenant: TenantId,
        id: Uuid,
        data: UpdateClient,
    ) -> StoreResult<Option<Client>>;

    async fn delete_client(&self, tenant: TenantId, id: Uuid) -> StoreResult<bool>;

    /// Attaches a comment by client id alone
    ///
    /// Fails with `MissingReference` if no such client exists in any company.
    async fn add_comment(&self, client_id: Uuid, content: &str) -> StoreResult<Comment>;

    /// Comments of a client the caller has already resolved in its tenant
    async fn list_comments(&self, client_id: Uuid) -> StoreResult<Vec<Comment>>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create_project(&self, tenant: TenantId, data: CreateProject) -> StoreResult<Project>;

    async fn find_project(&self, tenant: TenantId, id: Uuid) -> StoreResult<Option<Project>>;

    /// Finds a project only if `is_public` is set
    async fn find_public_project(&self, id: Uuid) -> StoreResult<Option<Project>>;

    async fn list_projects(&self, tenant: TenantId) -> StoreResult<Vec<Project>>;

    async fn update_project(
        &self,
        tenant: TenantId,
        id: Uuid,
        data: UpdateProject,
    ) -> StoreResult<Option<Project>>;

    async fn delete_project(&self, tenant: TenantId, id: Uuid) -> StoreResult<bool>;

    async fn create_task(&self, tenant: TenantId, data: CreateTask) -> StoreResult<Task>;

    async fn find_task(&self, tenant: TenantId, id: Uuid) -> StoreResult<Option<Task>>;

    async fn list_tasks(&self, tenant: TenantId, project_ids: &[Uuid]) -> StoreResult<Vec<Task>>;

    async fn set_task_status(
        &self,
        tenant: TenantId,
        id: Uuid,
        status: WorkStatus,
    ) -> StoreResult<Option<Task>>;

    async fn delete_task(&self, tenant: TenantId, id: Uuid) -> StoreResult<bool>;

    async fn create_subtask(&self, tenant: TenantId, data: CreateSubtask) -> StoreResult<Subtask>;

    async fn find_subtask(&self, tenant: TenantId, id: Uuid) -> StoreResult<Option<Subtask>>;

    async fn list_subtasks(&self, tenant: TenantId, task_ids: &[Uuid])
        -> StoreResult<Vec<Subtask>>;

    async fn set_subtask_status(
        &self,
        tenant: TenantId,
        id: Uuid,
        status: WorkStatus,
    ) -> StoreResult<Option<Subtask>>;

    /// Bulk-completes every subtask of a task, returning how many rows changed
    async fn complete_subtasks(&self, tenant: TenantId, task_id: Uuid) -> StoreResult<u64>;

    async fn delete_subtask(&self, tenant: TenantId, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait LinkRepository: Send + Sync {
    async fn create_link(&self, tenant: TenantId, data: CreateLink) -> StoreResult<Link>;

    async fn list_links(&self, tenant: TenantId) -> StoreResult<Vec<Link>>;

    async fn update_link(
        &self,
        tenant: TenantId,
        id: Uuid,
        data: UpdateLink,
    ) -> StoreResult<Option<Link>>;

    async fn delete_link(&self, tenant: TenantId, id: Uuid) -> StoreResult<bool>;

    /// Appends a click to any link; `MissingReference` if the link is unknown
    async fn record_click(&self, link_id: Uuid) -> StoreResult<LinkClick>;
}

/// Liveness check for the backing store
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;
}

/// All repositories, shared behind `Arc`s
#[derive(Clone)]
pub struct Repositories {
    pub companies: Arc<dyn CompanyRepository>,
    pub users: Arc<dyn UserRepository>,
    pub clients: Arc<dyn ClientRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub links: Arc<dyn LinkRepository>,
    pub health: Arc<dyn StoreHealth>,
}

impl Repositories {
    /// Uses one store for every repository
    pub fn from_store<S>(store: S) -> Self
    where
        S: CompanyRepository
            + UserRepository
            + ClientRepository
            + ProjectRepository
            + LinkRepository
            + StoreHealth
            + 'static,
    {
        let store = Arc::new(store);
        Self {
            companies: store.clone(),
            users: store.clone(),
            clients: store.clone(),
            projects: store.clone(),
            links: store.clone(),
            health: store,
        }
    }
}
