/// Project, task and subtask service
///
/// Child creation checks the parent inside the caller's company first, so a
/// task can't be attached to another company's project. For the same reason a
/// project can only reference a client of its own company.
///
/// # Status toggles
///
/// Updating a task or subtask flips its status. When a task becomes
/// Completed, all of its subtasks are bulk-set to Completed. Un-completing a
/// task leaves subtasks alone.
///
/// The toggle is a read followed by a write with no lock between them. Two
/// concurrent toggles of the same row can collapse into one (last write
/// wins).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    Client, CreateProject, CreateSubtask, CreateTask, Project, Subtask, Task, UpdateProject,
    WorkStatus, DEFAULT_PROJECT_STATUS,
};
use crate::repository::{ClientRepository, ProjectRepository};
use crate::tenant::{TenantId, TenantScope};

/// Fields supplied when creating or replacing a project
#[derive(Debug, Clone, Default)]
pub struct ProjectInput {
    pub name: String,
    pub client_id: Uuid,
    pub address: String,
    pub summary: String,
    pub start_date: Option<DateTime<Utc>>,
    /// Free-form; empty means "active"
    pub status: String,
    pub is_public: bool,
}

impl ProjectInput {
    fn status_or_default(&self) -> String {
        if self.status.trim().is_empty() {
            DEFAULT_PROJECT_STATUS.to_string()
        } else {
            self.status.clone()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub name: String,
    pub status: WorkStatus,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewSubtask {
    pub name: String,
    pub status: WorkStatus,
}

/// Task with its subtasks
#[derive(Debug, Clone, Serialize)]
pub struct TaskDetails {
    #[serde(flatten)]
    pub task: Task,
    pub subtasks: Vec<Subtask>,
}

/// Project with its client and task tree
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,
    pub client: Option<Client>,
    pub tasks: Vec<TaskDetails>,
}

/// Percentage of completed tasks, 0 for an empty list
pub fn completion_percentage(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let done = tasks.iter().filter(|t| t.status.is_completed()).count();
    done as f64 * 100.0 / tasks.len() as f64
}

#[derive(Clone)]
pub struct ProjectService {
    projects: Arc<dyn ProjectRepository>,
    clients: Arc<dyn ClientRepository>,
}

impl ProjectService {
    pub fn new(projects: Arc<dyn ProjectRepository>, clients: Arc<dyn ClientRepository>) -> Self {
        Self { projects, clients }
    }

    async fn ensure_client(&self, tenant: TenantId, client_id: Uuid) -> ServiceResult<()> {
        match self.clients.find_client(tenant, client_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFoundOrForbidden),
        }
    }

    async fn scoped_project(&self, scope: &TenantScope, id: Uuid) -> ServiceResult<Project> {
        self.projects
            .find_project(scope.tenant(), id)
            .await?
            .ok_or(ServiceError::NotFoundOrForbidden)
    }

    async fn scoped_task(&self, scope: &TenantScope, id: Uuid) -> ServiceResult<Task> {
        self.projects
            .find_task(scope.tenant(), id)
            .await?
            .ok_or(ServiceError::NotFoundOrForbidden)
    }

    async fn scoped_subtask(&self, scope: &TenantScope, id: Uuid) -> ServiceResult<Subtask> {
        self.projects
            .find_subtask(scope.tenant(), id)
            .await?
            .ok_or(ServiceError::NotFoundOrForbidden)
    }

    /// Loads subtasks for `tasks` and groups them under each task
    async fn task_details(
        &self,
        tenant: TenantId,
        tasks: Vec<Task>,
    ) -> ServiceResult<Vec<TaskDetails>> {
        let task_ids: Vec<Uuid> = tasks.iter().map(|t| t.id).collect();
        let mut by_task: HashMap<Uuid, Vec<Subtask>> = HashMap::new();
        for subtask in self.projects.list_subtasks(tenant, &task_ids).await? {
            by_task.entry(subtask.task_id).or_default().push(subtask);
        }

        Ok(tasks
            .into_iter()
            .map(|task| {
                let subtasks = by_task.remove(&task.id).unwrap_or_default();
                TaskDetails { task, subtasks }
            })
            .collect())
    }

    /// Eager-loads clients, tasks and subtasks for projects of one company
    async fn project_details(
        &self,
        tenant: TenantId,
        projects: Vec<Project>,
    ) -> ServiceResult<Vec<ProjectDetails>> {
        if projects.is_empty() {
            return Ok(Vec::new());
        }

        let project_ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
        let tasks = self.projects.list_tasks(tenant, &project_ids).await?;
        let mut tasks_by_project: HashMap<Uuid, Vec<TaskDetails>> = HashMap::new();
        for details in self.task_details(tenant, tasks).await? {
            tasks_by_project
                .entry(details.task.project_id)
                .or_default()
                .push(details);
        }

        let mut client_ids: Vec<Uuid> = projects.iter().map(|p| p.client_id).collect();
        client_ids.sort_unstable();
        client_ids.dedup();

        let clients: HashMap<Uuid, Client> = self
            .clients
            .find_clients(tenant, &client_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(projects
            .into_iter()
            .map(|project| ProjectDetails {
                client: clients.get(&project.client_id).cloned(),
                tasks: tasks_by_project.remove(&project.id).unwrap_or_default(),
                project,
            })
            .collect())
    }

    async fn single_details(&self, project: Project) -> ServiceResult<ProjectDetails> {
        let tenant = project.tenant();
        self.project_details(tenant, vec![project])
            .await?
            .pop()
            .ok_or(ServiceError::NotFoundOrForbidden)
    }

    pub async fn create_project(
        &self,
        scope: &TenantScope,
        input: ProjectInput,
    ) -> ServiceResult<Project> {
        self.ensure_client(scope.tenant(), input.client_id).await?;

        let status = input.status_or_default();
        let project = self
            .projects
            .create_project(
                scope.tenant(),
                CreateProject {
                    user_id: scope.user_id(),
                    name: input.name,
                    client_id: input.client_id,
                    address: input.address,
                    summary: input.summary,
                    start_date: input.start_date,
                    status,
                    is_public: input.is_public,
                },
            )
            .await?;

        tracing::info!(project_id = %project.id, company_id = %project.company_id, "Project created");
        Ok(project)
    }

    pub async fn list_projects(&self, scope: &TenantScope) -> ServiceResult<Vec<ProjectDetails>> {
        let projects = self.projects.list_projects(scope.tenant()).await?;
        self.project_details(scope.tenant(), projects).await
    }

    pub async fn get_project(&self, scope: &TenantScope, id: Uuid) -> ServiceResult<ProjectDetails> {
        let project = self.scoped_project(scope, id).await?;
        self.single_details(project).await
    }

    /// Anonymous read of a project flagged public
    ///
    /// Private and missing projects both yield `NotFoundOrForbidden`.
    pub async fn get_public_project(&self, id: Uuid) -> ServiceResult<ProjectDetails> {
        let project = self
            .projects
            .find_public_project(id)
            .await?
            .ok_or(ServiceError::NotFoundOrForbidden)?;
        self.single_details(project).await
    }

    pub async fn update_project(
        &self,
        scope: &TenantScope,
        id: Uuid,
        input: ProjectInput,
    ) -> ServiceResult<Project> {
        let current = self.scoped_project(scope, id).await?;
        if current.client_id != input.client_id {
            self.ensure_client(scope.tenant(), input.client_id).await?;
        }

        let status = input.status_or_default();
        self.projects
            .update_project(
                scope.tenant(),
                id,
                UpdateProject {
                    name: input.name,
                    client_id: input.client_id,
                    address: input.address,
                    summary: input.summary,
                    start_date: input.start_date,
                    status,
                    is_public: input.is_public,
                },
            )
            .await?
            .ok_or(ServiceError::NotFoundOrForbidden)
    }

    pub async fn delete_project(&self, scope: &TenantScope, id: Uuid) -> ServiceResult<()> {
        if !self.projects.delete_project(scope.tenant(), id).await? {
            return Err(ServiceError::NotFoundOrForbidden);
        }
        tracing::info!(project_id = %id, company_id = %scope.company_id(), "Project deleted");
        Ok(())
    }

    /// Adds a task to a project of the caller's company
    pub async fn add_task(
        &self,
        scope: &TenantScope,
        project_id: Uuid,
        input: NewTask,
    ) -> ServiceResult<Task> {
        self.scoped_project(scope, project_id).await?;

        Ok(self
            .projects
            .create_task(
                scope.tenant(),
                CreateTask {
                    project_id,
                    name: input.name,
                    status: input.status,
                    due_date: input.due_date,
                },
            )
            .await?)
    }

    /// Lists a project's tasks and logs how many are complete
    pub async fn list_tasks(
        &self,
        scope: &TenantScope,
        project_id: Uuid,
    ) -> ServiceResult<Vec<TaskDetails>> {
        self.scoped_project(scope, project_id).await?;

        let tasks = self.projects.list_tasks(scope.tenant(), &[project_id]).await?;
        tracing::info!(
            project_id = %project_id,
            tasks = tasks.len(),
            completed_percent = completion_percentage(&tasks),
            "Task completion"
        );

        self.task_details(scope.tenant(), tasks).await
    }

    pub async fn get_task(&self, scope: &TenantScope, id: Uuid) -> ServiceResult<TaskDetails> {
        let task = self.scoped_task(scope, id).await?;
        self.task_details(scope.tenant(), vec![task])
            .await?
            .pop()
            .ok_or(ServiceError::NotFoundOrForbidden)
    }

    /// Flips a task's status, completing its subtasks when it becomes Completed
    pub async fn toggle_task(&self, scope: &TenantScope, id: Uuid) -> ServiceResult<Task> {
        let current = self.scoped_task(scope, id).await?;
        let next = current.status.toggled();

        let task = self
            .projects
            .set_task_status(scope.tenant(), id, next)
            .await?
            .ok_or(ServiceError::NotFoundOrForbidden)?;

        if next.is_completed() {
            let completed = self.projects.complete_subtasks(scope.tenant(), id).await?;
            tracing::debug!(task_id = %id, subtasks = completed, "Cascaded completion to subtasks");
        }

        Ok(task)
    }

    pub async fn delete_task(&self, scope: &TenantScope, id: Uuid) -> ServiceResult<()> {
        if !self.projects.delete_task(scope.tenant(), id).await? {
            return Err(ServiceError::NotFoundOrForbidden);
        }
        Ok(())
    }

    /// Adds a subtask to a task of the caller's company
    pub async fn add_subtask(
        &self,
        scope: &TenantScope,
        task_id: Uuid,
        input: NewSubtask,
    ) -> ServiceResult<Subtask> {
        self.scoped_task(scope, task_id).await?;

        Ok(self
            .projects
            .create_subtask(
                scope.tenant(),
                CreateSubtask {
                    task_id,
                    name: input.name,
                    status: input.status,
                },
            )
            .await?)
    }

    pub async fn get_subtask(&self, scope: &TenantScope, id: Uuid) -> ServiceResult<Subtask> {
        self.scoped_subtask(scope, id).await
    }

    pub async fn toggle_subtask(&self, scope: &TenantScope, id: Uuid) -> ServiceResult<Subtask> {
        let current = self.scoped_subtask(scope, id).await?;

        self.projects
            .set_subtask_status(scope.tenant(), id, current.status.toggled())
            .await?
            .ok_or(ServiceError::NotFoundOrForbidden)
    }

    pub async fn delete_subtask(&self, scope: &TenantScope, id: Uuid) -> ServiceResult<()> {
        if !self.projects.delete_subtask(scope.tenant(), id).await? {
            return Err(ServiceError::NotFoundOrForbidden);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(status: WorkStatus) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            name: "task".to_string(),
            status,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_completion_percentage() {
        assert_eq!(completion_percentage(&[]), 0.0);

        let tasks = vec![
            task(WorkStatus::Completed),
            task(WorkStatus::Pending),
            task(WorkStatus::Pending),
            task(WorkStatus::Completed),
        ];
        assert_eq!(completion_percentage(&tasks), 50.0);
    }

    #[test]
    fn test_blank_status_defaults_to_active() {
        let input = ProjectInput {
            status: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(input.status_or_default(), "active");

        let input = ProjectInput {
            status: "on hold".to_string(),
            ..Default::default()
        };
        assert_eq!(input.status_or_default(), "on hold");
    }
}
