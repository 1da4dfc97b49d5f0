/// PostgreSQL repository
///
/// Thin adapter from the repository traits to the model queries. sqlx errors
/// are classified into [`StoreError`] here.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    ClientRepository, CompanyRepository, LinkRepository, ProjectRepository, StoreHealth,
    StoreResult, UserRepository,
};
use crate::db::pool::health_check;
use crate::models::{
    Client, Comment, Company, CreateClient, CreateCompany, CreateLink, CreateProject,
    CreateSubtask, CreateTask, CreateUser, Link, LinkClick, Project, Subtask, Task, UpdateClient,
    UpdateCompany, UpdateLink, UpdateProfile, UpdateProject, User, WorkStatus,
};
use crate::tenant::TenantId;

#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CompanyRepository for PgRepository {
    async fn create_company_with_admin(
        &self,
        company: CreateCompany,
        admin: CreateUser,
    ) -> StoreResult<(Company, User)> {
        Ok(Company::create_with_admin(&self.pool, company, admin).await?)
    }

    async fn find_company(&self, tenant: TenantId) -> StoreResult<Option<Company>> {
        Ok(Company::find_by_id(&self.pool, tenant.as_uuid()).await?)
    }

    async fn update_company(
        &self,
        tenant: TenantId,
        data: UpdateCompany,
    ) -> StoreResult<Option<Company>> {
        Ok(Company::update(&self.pool, tenant.as_uuid(), data).await?)
    }
}

#[async_trait]
impl UserRepository for PgRepository {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    async fn list_company_members(&self, tenant: TenantId) -> StoreResult<Vec<User>> {
        Ok(User::list_by_company(&self.pool, tenant.as_uuid()).await?)
    }

    async fn update_username(&self, id: Uuid, username: &str) -> StoreResult<Option<User>> {
        Ok(User::update_username(&self.pool, id, username).await?)
    }

    async fn update_profile(&self, id: Uuid, data: UpdateProfile) -> StoreResult<Option<User>> {
        Ok(User::update_profile(&self.pool, id, data).await?)
    }

    async fn update_bio(&self, id: Uuid, bio: &str) -> StoreResult<Option<User>> {
        Ok(User::update_bio(&self.pool, id, bio).await?)
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<bool> {
        Ok(User::update_password_hash(&self.pool, id, password_hash).await?)
    }
}

#[async_trait]
impl ClientRepository for PgRepository {
    async fn create_client(&self, tenant: TenantId, data: CreateClient) -> StoreResult<Client> {
        Ok(Client::create(&self.pool, tenant, data).await?)
    }

    async fn find_client(&self, tenant: TenantId, id: Uuid) -> StoreResult<Option<Client>> {
        Ok(Client::find(&self.pool, tenant, id).await?)
    }

    async fn list_clients(&self, tenant: TenantId) -> StoreResult<Vec<Client>> {
        Ok(Client::list(&self.pool, tenant).await?)
    }

    async fn find_clients(&self, tenant: TenantId, ids: &[Uuid]) -> StoreResult<Vec<Client>> {
        Ok(Client::list_by_ids(&self.pool, tenant, ids).await?)
    }

    async fn update_client(
        &self,
        tenant: TenantId,
        id: Uuid,
        data: UpdateClient,
    ) -> StoreResult<Option<Client>> {
        Ok(Client::update(&self.pool, tenant, id, data).await?)
    }

    async fn delete_client(&self, tenant: TenantId, id: Uuid) -> StoreResult<bool> {
        Ok(Client::delete(&self.pool, tenant, id).await?)
    }

    async fn add_comment(&self, client_id: Uuid, content: &str) -> StoreResult<Comment> {
        Ok(Comment::create(&self.pool, client_id, content).await?)
    }

    async fn list_comments(&self, client_id: Uuid) -> StoreResult<Vec<Comment>> {
        Ok(Comment::list_for_client(&self.pool, client_id).await?)
    }
}

#[async_trait]
impl ProjectRepository for PgRepository {
    async fn create_project(&self, tenant: TenantId, data: CreateProject) -> StoreResult<Project> {
        Ok(Project::create(&self.pool, tenant, data).await?)
    }

    async fn find_project(&self, tenant: TenantId, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(Project::find(&self.pool, tenant, id).await?)
    }

    async fn find_public_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(Project::find_public(&self.pool, id).await?)
    }

    async fn list_projects(&self, tenant: TenantId) -> StoreResult<Vec<Project>> {
        Ok(Project::list(&self.pool, tenant).await?)
    }

    async fn update_project(
        &self,
        tenant: TenantId,
        id: Uuid,
        data: UpdateProject,
    ) -> StoreResult<Option<Project>> {
        Ok(Project::update(&self.pool, tenant, id, data).await?)
    }

    async fn delete_project(&self, tenant: TenantId, id: Uuid) -> StoreResult<bool> {
        Ok(Project::delete(&self.pool, tenant, id).await?)
    }

    async fn create_task(&self, tenant: TenantId, data: CreateTask) -> StoreResult<Task> {
        Ok(Task::create(&self.pool, tenant, data).await?)
    }

    async fn find_task(&self, tenant: TenantId, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(Task::find(&self.pool, tenant, id).await?)
    }

    async fn list_tasks(&self, tenant: TenantId, project_ids: &[Uuid]) -> StoreResult<Vec<Task>> {
        Ok(Task::list_for_projects(&self.pool, tenant, project_ids).await?)
    }

    async fn set_task_status(
        &self,
        tenant: TenantId,
        id: Uuid,
        status: WorkStatus,
    ) -> StoreResult<Option<Task>> {
        Ok(Task::set_status(&self.pool, tenant, id, status).await?)
    }

    async fn delete_task(&self, tenant: TenantId, id: Uuid) -> StoreResult<bool> {
        Ok(Task::delete(&self.pool, tenant, id).await?)
    }

    async fn create_subtask(&self, tenant: TenantId, data: CreateSubtask) -> StoreResult<Subtask> {
        Ok(Subtask::create(&self.pool, tenant, data).await?)
    }

    async fn find_subtask(&self, tenant: TenantId, id: Uuid) -> StoreResult<Option<Subtask>> {
        Ok(Subtask::find(&self.pool, tenant, id).await?)
    }

    async fn list_subtasks(
        &self,
        tenant: TenantId,
        task_ids: &[Uuid],
    ) -> StoreResult<Vec<Subtask>> {
        Ok(Subtask::list_for_tasks(&self.pool, tenant, task_ids).await?)
    }

    async fn set_subtask_status(
        &self,
        tenant: TenantId,
        id: Uuid,
        status: WorkStatus,
    ) -> StoreResult<Option<Subtask>> {
        Ok(Subtask::set_status(&self.pool, tenant, id, status).await?)
    }

    async fn complete_subtasks(&self, tenant: TenantId, task_id: Uuid) -> StoreResult<u64> {
        Ok(Subtask::complete_all_for_task(&self.pool, tenant, task_id).await?)
    }

    async fn delete_subtask(&self, tenant: TenantId, id: Uuid) -> StoreResult<bool> {
        Ok(Subtask::delete(&self.pool, tenant, id).await?)
    }
}

#[async_trait]
impl LinkRepository for PgRepository {
    async fn create_link(&self, tenant: TenantId, data: CreateLink) -> StoreResult<Link> {
        Ok(Link::create(&self.pool, tenant, data).await?)
    }

    async fn list_links(&self, tenant: TenantId) -> StoreResult<Vec<Link>> {
        Ok(Link::list(&self.pool, tenant).await?)
    }

    async fn update_link(
        &self,
        tenant: TenantId,
        id: Uuid,
        data: UpdateLink,
    ) -> StoreResult<Option<Link>> {
        Ok(Link::update(&self.pool, tenant, id, data).await?)
    }

    async fn delete_link(&self, tenant: TenantId, id: Uuid) -> StoreResult<bool> {
        Ok(Link::delete(&self.pool, tenant, id).await?)
    }

    async fn record_click(&self, link_id: Uuid) -> StoreResult<LinkClick> {
        Ok(LinkClick::record(&self.pool, link_id).await?)
    }
}

#[async_trait]
impl StoreHealth for PgRepository {
    async fn ping(&self) -> StoreResult<()> {
        Ok(health_check(&self.pool).await?)
    }
}
