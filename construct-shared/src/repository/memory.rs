/// In-memory repository
///
/// Implements every repository trait over plain vectors behind a
/// `tokio::sync::RwLock`. It enforces the same rules the PostgreSQL schema
/// does:
///
/// - unique username, email and tax id (`Conflict` with the constraint name)
/// - foreign keys for comments, clicks, projects, tasks and subtasks
///   (`MissingReference`)
/// - cascading deletes
/// - tenant predicates on every scoped query
///
/// Rows are kept in insertion order, which matches `ORDER BY created_at`.
///
/// # Example
///
/// ```
/// use construct_shared::repository::{MemoryRepository, Repositories};
///
/// let repos = Repositories::from_store(MemoryRepository::new());
/// ```

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    ClientRepository, CompanyRepository, LinkRepository, ProjectRepository, StoreError,
    StoreHealth, StoreResult, UserRepository,
};
use crate::models::{
    Client, Comment, Company, CreateClient, CreateCompany, CreateLink, CreateProject,
    CreateSubtask, CreateTask, CreateUser, Link, LinkClick, Project, Subtask, Task, UpdateClient,
    UpdateCompany, UpdateLink, UpdateProfile, UpdateProject, User, WorkStatus,
};
use crate::tenant::TenantId;

#[derive(Debug, Default)]
struct State {
    companies: Vec<Company>,
    users: Vec<User>,
    clients: Vec<Client>,
    comments: Vec<Comment>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    subtasks: Vec<Subtask>,
    links: Vec<Link>,
    clicks: Vec<LinkClick>,
}

impl State {
    fn check_user_unique(&self, email: &str, username: Option<&str>) -> StoreResult<()> {
        for user in &self.users {
            if user.email == email {
                return Err(StoreError::Conflict("users_email_key".to_string()));
            }
            if username.is_some() && user.username.as_deref() == username {
                return Err(StoreError::Conflict("users_username_key".to_string()));
            }
        }
        Ok(())
    }

    fn build_user(&self, data: CreateUser) -> StoreResult<User> {
        self.check_user_unique(&data.email, data.username.as_deref())?;

        if let Some(company_id) = data.company_id {
            if !self.companies.iter().any(|c| c.id == company_id) {
                return Err(StoreError::MissingReference("users_company_id_fkey".to_string()));
            }
        }

        let now = Utc::now();
        Ok(User {
            id: Uuid::new_v4(),
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            name: data.name,
            phone: String::new(),
            company_id: data.company_id,
            role: data.role,
            bio: String::new(),
            avatar: String::new(),
            created_at: now,
            updated_at: now,
        })
    }

    fn link_count(&self, link_id: Uuid) -> i64 {
        self.clicks.iter().filter(|c| c.link_id == link_id).count() as i64
    }

    fn with_count(&self, link: &Link) -> Link {
        Link {
            count: self.link_count(link.id),
            ..link.clone()
        }
    }

    fn remove_tasks(&mut self, task_ids: &[Uuid]) {
        self.subtasks.retain(|s| !task_ids.contains(&s.task_id));
        self.tasks.retain(|t| !task_ids.contains(&t.id));
    }

    fn remove_projects(&mut self, project_ids: &[Uuid]) {
        let task_ids: Vec<Uuid> = self
            .tasks
            .iter()
            .filter(|t| project_ids.contains(&t.project_id))
            .map(|t| t.id)
            .collect();
        self.remove_tasks(&task_ids);
        self.projects.retain(|p| !project_ids.contains(&p.id));
    }
}

/// Repository backed by process memory
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<State>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of companies stored
    pub async fn company_count(&self) -> usize {
        self.state.read().await.companies.len()
    }
}

#[async_trait]
impl CompanyRepository for MemoryRepository {
    async fn create_company_with_admin(
        &self,
        company: CreateCompany,
        admin: CreateUser,
    ) -> StoreResult<(Company, User)> {
        let mut state = self.state.write().await;

        if state.companies.iter().any(|c| c.tax_id == company.tax_id) {
            return Err(StoreError::Conflict("companies_tax_id_key".to_string()));
        }
        // Checked before anything is inserted so a failure leaves no company
        state.check_user_unique(&admin.email, admin.username.as_deref())?;

        let now = Utc::now();
        let company = Company {
            id: Uuid::new_v4(),
            name: company.name,
            tax_id: company.tax_id,
            email: company.email,
            phone: String::new(),
            address: String::new(),
            created_at: now,
            updated_at: now,
        };
        state.companies.push(company.clone());

        let user = state.build_user(CreateUser {
            company_id: Some(company.id),
            ..admin
        })?;
        state.users.push(user.clone());

        Ok((company, user))
    }

    async fn find_company(&self, tenant: TenantId) -> StoreResult<Option<Company>> {
        let state = self.state.read().await;
        Ok(state
            .companies
            .iter()
            .find(|c| c.id == tenant.as_uuid())
            .cloned())
    }

    async fn update_company(
        &self,
        tenant: TenantId,
        data: UpdateCompany,
    ) -> StoreResult<Option<Company>> {
        let mut state = self.state.write().await;
        let Some(company) = state
            .companies
            .iter_mut()
            .find(|c| c.id == tenant.as_uuid())
        else {
            return Ok(None);
        };

        company.name = data.name;
        company.email = data.email;
        company.phone = data.phone;
        company.address = data.address;
        company.updated_at = Utc::now();
        Ok(Some(company.clone()))
    }
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut state = self.state.write().await;
        let user = state.build_user(data)?;
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|u| u.username.as_deref() == Some(username))
            .cloned())
    }

    async fn list_company_members(&self, tenant: TenantId) -> StoreResult<Vec<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .filter(|u| u.company_id == Some(tenant.as_uuid()))
            .cloned()
            .collect())
    }

    async fn update_username(&self, id: Uuid, username: &str) -> StoreResult<Option<User>> {
        let mut state = self.state.write().await;
        if state
            .users
            .iter()
            .any(|u| u.id != id && u.username.as_deref() == Some(username))
        {
            return Err(StoreError::Conflict("users_username_key".to_string()));
        }

        let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.username = Some(username.to_string());
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn update_profile(&self, id: Uuid, data: UpdateProfile) -> StoreResult<Option<User>> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.id != id && u.email == data.email) {
            return Err(StoreError::Conflict("users_email_key".to_string()));
        }

        let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.name = data.name;
        user.email = data.email;
        user.phone = data.phone;
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn update_bio(&self, id: Uuid, bio: &str) -> StoreResult<Option<User>> {
        let mut state = self.state.write().await;
        let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.bio = bio.to_string();
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        user.password_hash = Some(password_hash.to_string());
        user.updated_at = Utc::now();
        Ok(true)
    }
}

#[async_trait]
impl ClientRepository for MemoryRepository {
    async fn create_client(&self, tenant: TenantId, data: CreateClient) -> StoreResult<Client> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            company_id: tenant.as_uuid(),
            name: data.name,
            phone: data.phone,
            address: data.address,
            summary: data.summary,
            click_count: 0,
            created_at: now,
            updated_at: now,
        };
        state.clients.push(client.clone());
        Ok(client)
    }

    async fn find_client(&self, tenant: TenantId, id: Uuid) -> StoreResult<Option<Client>> {
        let state = self.state.read().await;
        Ok(state
            .clients
            .iter()
            .find(|c| c.id == id && c.company_id == tenant.as_uuid())
            .cloned())
    }

    async fn list_clients(&self, tenant: TenantId) -> StoreResult<Vec<Client>> {
        let state = self.state.read().await;
        Ok(state
            .clients
            .iter()
            .filter(|c| c.company_id == tenant.as_uuid())
            .cloned()
            .collect())
    }

    async fn find_clients(&self, tenant: TenantId, ids: &[Uuid]) -> StoreResult<Vec<Client>> {
        let state = self.state.read().await;
        Ok(state
            .clients
            .iter()
            .filter(|c| ids.contains(&c.id) && c.company_id == tenant.as_uuid())
            .cloned()
            .collect())
    }

    async fn update_client(
        &self,
        tenant: TenantId,
        id: Uuid,
        data: UpdateClient,
    ) -> StoreResult<Option<Client>> {
        let mut state = self.state.write().await;
        let Some(client) = state
            .clients
            .iter_mut()
            .find(|c| c.id == id && c.company_id == tenant.as_uuid())
        else {
            return Ok(None);
        };

        client.name = data.name;
        client.phone = data.phone;
        client.address = data.address;
        client.summary = data.summary;
        client.updated_at = Utc::now();
        Ok(Some(client.clone()))
    }

    async fn delete_client(&self, tenant: TenantId, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.clients.len();
        state
            .clients
            .retain(|c| !(c.id == id && c.company_id == tenant.as_uuid()));
        if state.clients.len() == before {
            return Ok(false);
        }

        state.comments.retain(|c| c.client_id != id);
        let project_ids: Vec<Uuid> = state
            .projects
            .iter()
            .filter(|p| p.client_id == id)
            .map(|p| p.id)
            .collect();
        state.remove_projects(&project_ids);
        Ok(true)
    }

    async fn add_comment(&self, client_id: Uuid, content: &str) -> StoreResult<Comment> {
        let mut state = self.state.write().await;
        if !state.clients.iter().any(|c| c.id == client_id) {
            return Err(StoreError::MissingReference(
                "comments_client_id_fkey".to_string(),
            ));
        }

        let comment = Comment {
            id: Uuid::new_v4(),
            client_id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, client_id: Uuid) -> StoreResult<Vec<Comment>> {
        let state = self.state.read().await;
        Ok(state
            .comments
            .iter()
            .filter(|c| c.client_id == client_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProjectRepository for MemoryRepository {
    async fn create_project(&self, tenant: TenantId, data: CreateProject) -> StoreResult<Project> {
        let mut state = self.state.write().await;
        if !state.clients.iter().any(|c| c.id == data.client_id) {
            return Err(StoreError::MissingReference(
                "projects_client_id_fkey".to_string(),
            ));
        }

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: data.name,
            client_id: data.client_id,
            company_id: tenant.as_uuid(),
            user_id: data.user_id,
            address: data.address,
            summary: data.summary,
            start_date: data.start_date,
            status: data.status,
            is_public: data.is_public,
            created_at: now,
            updated_at: now,
        };
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn find_project(&self, tenant: TenantId, id: Uuid) -> StoreResult<Option<Project>> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .iter()
            .find(|p| p.id == id && p.company_id == tenant.as_uuid())
            .cloned())
    }

    async fn find_public_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .iter()
            .find(|p| p.id == id && p.is_public)
            .cloned())
    }

    async fn list_projects(&self, tenant: TenantId) -> StoreResult<Vec<Project>> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .iter()
            .filter(|p| p.company_id == tenant.as_uuid())
            .cloned()
            .collect())
    }

    async fn update_project(
        &self,
        tenant: TenantId,
        id: Uuid,
        data: UpdateProject,
    ) -> StoreResult<Option<Project>> {
        let mut state = self.state.write().await;
        if !state.clients.iter().any(|c| c.id == data.client_id) {
            return Err(StoreError::MissingReference(
                "projects_client_id_fkey".to_string(),
            ));
        }

        let Some(project) = state
            .projects
            .iter_mut()
            .find(|p| p.id == id && p.company_id == tenant.as_uuid())
        else {
            return Ok(None);
        };

        project.name = data.name;
        project.client_id = data.client_id;
        project.address = data.address;
        project.summary = data.summary;
        project.start_date = data.start_date;
        project.status = data.status;
        project.is_public = data.is_public;
        project.updated_at = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, tenant: TenantId, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let exists = state
            .projects
            .iter()
            .any(|p| p.id == id && p.company_id == tenant.as_uuid());
        if exists {
            state.remove_projects(&[id]);
        }
        Ok(exists)
    }

    async fn create_task(&self, tenant: TenantId, data: CreateTask) -> StoreResult<Task> {
        let mut state = self.state.write().await;
        if !state.projects.iter().any(|p| p.id == data.project_id) {
            return Err(StoreError::MissingReference(
                "tasks_project_id_fkey".to_string(),
            ));
        }

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            project_id: data.project_id,
            company_id: tenant.as_uuid(),
            name: data.name,
            status: data.status,
            due_date: data.due_date,
            created_at: now,
            updated_at: now,
        };
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn find_task(&self, tenant: TenantId, id: Uuid) -> StoreResult<Option<Task>> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .iter()
            .find(|t| t.id == id && t.company_id == tenant.as_uuid())
            .cloned())
    }

    async fn list_tasks(&self, tenant: TenantId, project_ids: &[Uuid]) -> StoreResult<Vec<Task>> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .iter()
            .filter(|t| project_ids.contains(&t.project_id) && t.company_id == tenant.as_uuid())
            .cloned()
            .collect())
    }

    async fn set_task_status(
        &self,
        tenant: TenantId,
        id: Uuid,
        status: WorkStatus,
    ) -> StoreResult<Option<Task>> {
        let mut state = self.state.write().await;
        let Some(task) = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.company_id == tenant.as_uuid())
        else {
            return Ok(None);
        };
        task.status = status;
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, tenant: TenantId, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let exists = state
            .tasks
            .iter()
            .any(|t| t.id == id && t.company_id == tenant.as_uuid());
        if exists {
            state.remove_tasks(&[id]);
        }
        Ok(exists)
    }

    async fn create_subtask(&self, tenant: TenantId, data: CreateSubtask) -> StoreResult<Subtask> {
        let mut state = self.state.write().await;
        if !state.tasks.iter().any(|t| t.id == data.task_id) {
            return Err(StoreError::MissingReference(
                "subtasks_task_id_fkey".to_string(),
            ));
        }

        let now = Utc::now();
        let subtask = Subtask {
            id: Uuid::new_v4(),
            task_id: data.task_id,
            company_id: tenant.as_uuid(),
            name: data.name,
            status: data.status,
            created_at: now,
            updated_at: now,
        };
        state.subtasks.push(subtask.clone());
        Ok(subtask)
    }

    async fn find_subtask(&self, tenant: TenantId, id: Uuid) -> StoreResult<Option<Subtask>> {
        let state = self.state.read().await;
        Ok(state
            .subtasks
            .iter()
            .find(|s| s.id == id && s.company_id == tenant.as_uuid())
            .cloned())
    }

    async fn list_subtasks(
        &self,
        tenant: TenantId,
        task_ids: &[Uuid],
    ) -> StoreResult<Vec<Subtask>> {
        let state = self.state.read().await;
        Ok(state
            .subtasks
            .iter()
            .filter(|s| task_ids.contains(&s.task_id) && s.company_id == tenant.as_uuid())
            .cloned()
            .collect())
    }

    async fn set_subtask_status(
        &self,
        tenant: TenantId,
        id: Uuid,
        status: WorkStatus,
    ) -> StoreResult<Option<Subtask>> {
        let mut state = self.state.write().await;
        let Some(subtask) = state
            .subtasks
            .iter_mut()
            .find(|s| s.id == id && s.company_id == tenant.as_uuid())
        else {
            return Ok(None);
        };
        subtask.status = status;
        subtask.updated_at = Utc::now();
        Ok(Some(subtask.clone()))
    }

    async fn complete_subtasks(&self, tenant: TenantId, task_id: Uuid) -> StoreResult<u64> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let mut touched = 0;
        for subtask in state
            .subtasks
            .iter_mut()
            .filter(|s| s.task_id == task_id && s.company_id == tenant.as_uuid())
        {
            subtask.status = WorkStatus::Completed;
            subtask.updated_at = now;
            touched += 1;
        }
        Ok(touched)
    }

    async fn delete_subtask(&self, tenant: TenantId, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.subtasks.len();
        state
            .subtasks
            .retain(|s| !(s.id == id && s.company_id == tenant.as_uuid()));
        Ok(state.subtasks.len() != before)
    }
}

#[async_trait]
impl LinkRepository for MemoryRepository {
    async fn create_link(&self, tenant: TenantId, data: CreateLink) -> StoreResult<Link> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let link = Link {
            id: Uuid::new_v4(),
            company_id: tenant.as_uuid(),
            user_id: data.user_id,
            url: data.url,
            description: data.description,
            count: 0,
            created_at: now,
            updated_at: now,
        };
        state.links.push(link.clone());
        Ok(link)
    }

    async fn list_links(&self, tenant: TenantId) -> StoreResult<Vec<Link>> {
        let state = self.state.read().await;
        Ok(state
            .links
            .iter()
            .filter(|l| l.company_id == tenant.as_uuid())
            .map(|l| state.with_count(l))
            .collect())
    }

    async fn update_link(
        &self,
        tenant: TenantId,
        id: Uuid,
        data: UpdateLink,
    ) -> StoreResult<Option<Link>> {
        let mut state = self.state.write().await;
        let Some(link) = state
            .links
            .iter_mut()
            .find(|l| l.id == id && l.company_id == tenant.as_uuid())
        else {
            return Ok(None);
        };
        link.url = data.url;
        link.description = data.description;
        link.updated_at = Utc::now();
        let updated = link.clone();
        Ok(Some(state.with_count(&updated)))
    }

    async fn delete_link(&self, tenant: TenantId, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.links.len();
        state
            .links
            .retain(|l| !(l.id == id && l.company_id == tenant.as_uuid()));
        if state.links.len() == before {
            return Ok(false);
        }
        state.clicks.retain(|c| c.link_id != id);
        Ok(true)
    }

    async fn record_click(&self, link_id: Uuid) -> StoreResult<LinkClick> {
        let mut state = self.state.write().await;
        if !state.links.iter().any(|l| l.id == link_id) {
            return Err(StoreError::MissingReference(
                "link_clicks_link_id_fkey".to_string(),
            ));
        }

        let click = LinkClick {
            id: Uuid::new_v4(),
            link_id,
            created_at: Utc::now(),
        };
        state.clicks.push(click.clone());
        Ok(click)
    }
}

#[async_trait]
impl StoreHealth for MemoryRepository {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(email: &str, username: &str) -> CreateUser {
        CreateUser {
            username: Some(username.to_string()),
            email: email.to_string(),
            name: username.to_string(),
            ..Default::default()
        }
    }

    fn company(tax_id: &str) -> CreateCompany {
        CreateCompany {
            name: "Acme".to_string(),
            tax_id: tax_id.to_string(),
            email: "a@x.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_tax_id_conflicts() {
        let repo = MemoryRepository::new();
        repo.create_company_with_admin(company("123"), admin("a@x.com", "ada"))
            .await
            .unwrap();

        let err = repo
            .create_company_with_admin(company("123"), admin("b@x.com", "bob"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(c) if c == "companies_tax_id_key"));
        assert_eq!(repo.company_count().await, 1);
    }

    #[tokio::test]
    async fn test_user_conflict_leaves_no_company() {
        let repo = MemoryRepository::new();
        repo.create_company_with_admin(company("123"), admin("a@x.com", "ada"))
            .await
            .unwrap();

        let err = repo
            .create_company_with_admin(company("456"), admin("b@x.com", "ada"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(c) if c == "users_username_key"));
        assert_eq!(repo.company_count().await, 1);
    }

    #[tokio::test]
    async fn test_tenant_predicate_hides_other_company() {
        let repo = MemoryRepository::new();
        let (acme, ada) = repo
            .create_company_with_admin(company("123"), admin("a@x.com", "ada"))
            .await
            .unwrap();
        let (globex, _) = repo
            .create_company_with_admin(company("456"), admin("b@x.com", "bob"))
            .await
            .unwrap();

        let client = repo
            .create_client(
                acme.tenant(),
                CreateClient {
                    user_id: ada.id,
                    name: "Bob Co".to_string(),
                    phone: "555".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(repo.find_client(acme.tenant(), client.id).await.unwrap().is_some());
        assert!(repo.find_client(globex.tenant(), client.id).await.unwrap().is_none());
        assert!(!repo.delete_client(globex.tenant(), client.id).await.unwrap());
        assert!(repo.delete_client(acme.tenant(), client.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_clients_returns_only_requested_tenant_rows() {
        let repo = MemoryRepository::new();
        let (acme, ada) = repo
            .create_company_with_admin(company("123"), admin("a@x.com", "ada"))
            .await
            .unwrap();
        let (globex, bob) = repo
            .create_company_with_admin(company("456"), admin("b@x.com", "bob"))
            .await
            .unwrap();

        let mut ids = Vec::new();
        for (tenant, user_id, name) in [
            (acme.tenant(), ada.id, "First"),
            (acme.tenant(), ada.id, "Second"),
            (globex.tenant(), bob.id, "Foreign"),
        ] {
            let client = repo
                .create_client(
                    tenant,
                    CreateClient {
                        user_id,
                        name: name.to_string(),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            ids.push(client.id);
        }

        let found = repo
            .find_clients(acme.tenant(), &[ids[0], ids[2], Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "First");
    }

    #[tokio::test]
    async fn test_click_count_is_aggregated() {
        let repo = MemoryRepository::new();
        let (acme, ada) = repo
            .create_company_with_admin(company("123"), admin("a@x.com", "ada"))
            .await
            .unwrap();
        let link = repo
            .create_link(
                acme.tenant(),
                CreateLink {
                    user_id: ada.id,
                    url: "https://example.com".to_string(),
                    description: String::new(),
                },
            )
            .await
            .unwrap();

        repo.record_click(link.id).await.unwrap();
        repo.record_click(link.id).await.unwrap();

        let links = repo.list_links(acme.tenant()).await.unwrap();
        assert_eq!(links[0].count, 2);
        assert!(matches!(
            repo.record_click(Uuid::new_v4()).await,
            Err(StoreError::MissingReference(_))
        ));
    }
}
