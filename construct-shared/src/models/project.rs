/// Project, task and subtask models
///
/// Projects own tasks, and tasks own subtasks. All three tables carry a
/// `company_id` column. Every query below filters on it, including the child
/// loaders used for eager loading, so a child row can never be reached
/// through a parent of another company.
///
/// # Status
///
/// Tasks and subtasks share a two-state status (see [`WorkStatus`]). The only
/// transition is [`WorkStatus::toggled`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::tenant::TenantId;

/// Completion status of a task or subtask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "work_status")]
pub enum WorkStatus {
    #[default]
    Pending,
    Completed,
}

impl WorkStatus {
    /// Returns the opposite status
    pub fn toggled(self) -> Self {
        match self {
            WorkStatus::Pending => WorkStatus::Completed,
            WorkStatus::Completed => WorkStatus::Pending,
        }
    }

    pub fn is_completed(self) -> bool {
        self == WorkStatus::Completed
    }
}

/// Project row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub client_id: Uuid,
    pub company_id: Uuid,
    /// User who created the project
    pub user_id: Uuid,
    pub address: String,
    pub summary: String,
    pub start_date: Option<DateTime<Utc>>,
    pub status: String,
    /// Sole gate for anonymous reads
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub status: WorkStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subtask row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Subtask {
    pub id: Uuid,
    pub task_id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub status: WorkStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Default status for new projects
pub const DEFAULT_PROJECT_STATUS: &str = "active";

/// Input for creating a project
#[derive(Debug, Clone, Default)]
pub struct CreateProject {
    pub user_id: Uuid,
    pub name: String,
    pub client_id: Uuid,
    pub address: String,
    pub summary: String,
    pub start_date: Option<DateTime<Utc>>,
    pub status: String,
    pub is_public: bool,
}

/// Full replacement of a project's mutable fields
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub name: String,
    pub client_id: Uuid,
    pub address: String,
    pub summary: String,
    pub start_date: Option<DateTime<Utc>>,
    pub status: String,
    pub is_public: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CreateTask {
    pub project_id: Uuid,
    pub name: String,
    pub status: WorkStatus,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateSubtask {
    pub task_id: Uuid,
    pub name: String,
    pub status: WorkStatus,
}

impl Project {
    pub fn tenant(&self) -> TenantId {
        TenantId::from_company(self.company_id)
    }

    pub async fn create(
        pool: &PgPool,
        tenant: TenantId,
        data: CreateProject,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (id, name, client_id, company_id, user_id, address, summary,
                                  start_date, status, is_public)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, name, client_id, company_id, user_id, address, summary, start_date,
                      status, is_public, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.name)
        .bind(data.client_id)
        .bind(tenant.as_uuid())
        .bind(data.user_id)
        .bind(data.address)
        .bind(data.summary)
        .bind(data.start_date)
        .bind(data.status)
        .bind(data.is_public)
        .fetch_one(pool)
        .await
    }

    pub async fn find(
        pool: &PgPool,
        tenant: TenantId,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, client_id, company_id, user_id, address, summary, start_date,
                   status, is_public, created_at, updated_at
            FROM projects
            WHERE id = $1 AND company_id = $2
            "#,
        )
        .bind(id)
        .bind(tenant.as_uuid())
        .fetch_optional(pool)
        .await
    }

    /// Finds a project only if it is flagged public
    pub async fn find_public(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, client_id, company_id, user_id, address, summary, start_date,
                   status, is_public, created_at, updated_at
            FROM projects
            WHERE id = $1 AND is_public = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(pool: &PgPool, tenant: TenantId) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, client_id, company_id, user_id, address, summary, start_date,
                   status, is_public, created_at, updated_at
            FROM projects
            WHERE company_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(tenant.as_uuid())
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        tenant: TenantId,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = $3, client_id = $4, address = $5, summary = $6, start_date = $7,
                status = $8, is_public = $9, updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            RETURNING id, name, client_id, company_id, user_id, address, summary, start_date,
                      status, is_public, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(tenant.as_uuid())
        .bind(data.name)
        .bind(data.client_id)
        .bind(data.address)
        .bind(data.summary)
        .bind(data.start_date)
        .bind(data.status)
        .bind(data.is_public)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, tenant: TenantId, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(tenant.as_uuid())
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl Task {
    pub async fn create(
        pool: &PgPool,
        tenant: TenantId,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (id, project_id, company_id, name, status, due_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, project_id, company_id, name, status, due_date, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.project_id)
        .bind(tenant.as_uuid())
        .bind(data.name)
        .bind(data.status)
        .bind(data.due_date)
        .fetch_one(pool)
        .await
    }

    pub async fn find(
        pool: &PgPool,
        tenant: TenantId,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, company_id, name, status, due_date, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND company_id = $2
            "#,
        )
        .bind(id)
        .bind(tenant.as_uuid())
        .fetch_optional(pool)
        .await
    }

    /// Loads the tasks of several projects at once
    pub async fn list_for_projects(
        pool: &PgPool,
        tenant: TenantId,
        project_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, company_id, name, status, due_date, created_at, updated_at
            FROM tasks
            WHERE project_id = ANY($1) AND company_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_ids)
        .bind(tenant.as_uuid())
        .fetch_all(pool)
        .await
    }

    pub async fn set_status(
        pool: &PgPool,
        tenant: TenantId,
        id: Uuid,
        status: WorkStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            RETURNING id, project_id, company_id, name, status, due_date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(tenant.as_uuid())
        .bind(status)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, tenant: TenantId, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(tenant.as_uuid())
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl Subtask {
    pub async fn create(
        pool: &PgPool,
        tenant: TenantId,
        data: CreateSubtask,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Subtask>(
            r#"
            INSERT INTO subtasks (id, task_id, company_id, name, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, task_id, company_id, name, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.task_id)
        .bind(tenant.as_uuid())
        .bind(data.name)
        .bind(data.status)
        .fetch_one(pool)
        .await
    }

    pub async fn find(
        pool: &PgPool,
        tenant: TenantId,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Subtask>(
            r#"
            SELECT id, task_id, company_id, name, status, created_at, updated_at
            FROM subtasks
            WHERE id = $1 AND company_id = $2
            "#,
        )
        .bind(id)
        .bind(tenant.as_uuid())
        .fetch_optional(pool)
        .await
    }

    pub async fn list_for_tasks(
        pool: &PgPool,
        tenant: TenantId,
        task_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Subtask>(
            r#"
            SELECT id, task_id, company_id, name, status, created_at, updated_at
            FROM subtasks
            WHERE task_id = ANY($1) AND company_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(task_ids)
        .bind(tenant.as_uuid())
        .fetch_all(pool)
        .await
    }

    pub async fn set_status(
        pool: &PgPool,
        tenant: TenantId,
        id: Uuid,
        status: WorkStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Subtask>(
            r#"
            UPDATE subtasks
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            RETURNING id, task_id, company_id, name, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(tenant.as_uuid())
        .bind(status)
        .fetch_optional(pool)
        .await
    }

    /// Forces every subtask of a task to Completed
    ///
    /// Returns the number of rows touched
    pub async fn complete_all_for_task(
        pool: &PgPool,
        tenant: TenantId,
        task_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE subtasks
            SET status = 'Completed', updated_at = NOW()
            WHERE task_id = $1 AND company_id = $2
            "#,
        )
        .bind(task_id)
        .bind(tenant.as_uuid())
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, tenant: TenantId, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subtasks WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(tenant.as_uuid())
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_an_involution() {
        for status in [WorkStatus::Pending, WorkStatus::Completed] {
            assert_ne!(status.toggled(), status);
            assert_eq!(status.toggled().toggled(), status);
        }
    }

    #[test]
    fn test_default_status_is_pending() {
        assert_eq!(WorkStatus::default(), WorkStatus::Pending);
        assert!(!WorkStatus::default().is_completed());
    }

    #[test]
    fn test_status_serializes_capitalized() {
        assert_eq!(
            serde_json::to_string(&WorkStatus::Completed).unwrap(),
            "\"Completed\""
        );
        let parsed: WorkStatus = serde_json::from_str("\"Pending\"").unwrap();
        assert_eq!(parsed, WorkStatus::Pending);
    }
}
