/// Client and comment models
///
/// Every query that touches a client takes the owning company id and puts it
/// in the WHERE clause. A client that belongs to another company is
/// indistinguishable from one that does not exist.
///
/// Comments have no tenant column of their own; they inherit their client's.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::tenant::TenantId;

/// Customer record kept by a company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: Uuid,
    /// User who created the record
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub summary: String,
    pub click_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Note attached to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a client
#[derive(Debug, Clone, Default)]
pub struct CreateClient {
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub summary: String,
}

/// Input for updating a client
#[derive(Debug, Clone, Default)]
pub struct UpdateClient {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub summary: String,
}

impl Client {
    pub fn tenant(&self) -> TenantId {
        TenantId::from_company(self.company_id)
    }

    pub async fn create(
        pool: &PgPool,
        tenant: TenantId,
        data: CreateClient,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (id, user_id, company_id, name, phone, address, summary)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, company_id, name, phone, address, summary, click_count,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(tenant.as_uuid())
        .bind(data.name)
        .bind(data.phone)
        .bind(data.address)
        .bind(data.summary)
        .fetch_one(pool)
        .await
    }

    pub async fn find(
        pool: &PgPool,
        tenant: TenantId,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            r#"
            SELECT id, user_id, company_id, name, phone, address, summary, click_count,
                   created_at, updated_at
            FROM clients
            WHERE id = $1 AND company_id = $2
            "#,
        )
        .bind(id)
        .bind(tenant.as_uuid())
        .fetch_optional(pool)
        .await
    }

    pub async fn list(pool: &PgPool, tenant: TenantId) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            r#"
            SELECT id, user_id, company_id, name, phone, address, summary, click_count,
                   created_at, updated_at
            FROM clients
            WHERE company_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(tenant.as_uuid())
        .fetch_all(pool)
        .await
    }

    /// Clients of one company among `ids`; unknown or foreign ids are skipped
    pub async fn list_by_ids(
        pool: &PgPool,
        tenant: TenantId,
        ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            r#"
            SELECT id, user_id, company_id, name, phone, address, summary, click_count,
                   created_at, updated_at
            FROM clients
            WHERE id = ANY($1) AND company_id = $2
            "#,
        )
        .bind(ids)
        .bind(tenant.as_uuid())
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        tenant: TenantId,
        id: Uuid,
        data: UpdateClient,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET name = $3, phone = $4, address = $5, summary = $6, updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            RETURNING id, user_id, company_id, name, phone, address, summary, click_count,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(tenant.as_uuid())
        .bind(data.name)
        .bind(data.phone)
        .bind(data.address)
        .bind(data.summary)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a client and, through the foreign key cascade, its comments
    /// and projects
    pub async fn delete(pool: &PgPool, tenant: TenantId, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(tenant.as_uuid())
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl Comment {
    /// Attaches a comment by client id alone
    ///
    /// Fails with a foreign key violation if the client does not exist.
    pub async fn create(
        pool: &PgPool,
        client_id: Uuid,
        content: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, client_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, client_id, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(client_id)
        .bind(content)
        .fetch_one(pool)
        .await
    }

    /// Lists a client's comments, oldest first
    pub async fn list_for_client(
        pool: &PgPool,
        client_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, client_id, content, created_at
            FROM comments
            WHERE client_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(client_id)
        .fetch_all(pool)
        .await
    }
}
