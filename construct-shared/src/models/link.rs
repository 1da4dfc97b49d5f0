/// Trackable link models
///
/// A link's click count is never stored. Each click appends a row to
/// `link_clicks` and reads aggregate them with a correlated subquery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::tenant::TenantId;

/// Link with its aggregated click count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Link {
    pub id: Uuid,
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub url: String,
    pub description: String,
    /// Number of recorded clicks
    pub count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Click event (append-only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LinkClick {
    pub id: Uuid,
    pub link_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    pub user_id: Uuid,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateLink {
    pub url: String,
    pub description: String,
}

impl Link {
    pub async fn create(
        pool: &PgPool,
        tenant: TenantId,
        data: CreateLink,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Link>(
            r#"
            INSERT INTO links (id, company_id, user_id, url, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, company_id, user_id, url, description, 0::BIGINT AS count,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant.as_uuid())
        .bind(data.user_id)
        .bind(data.url)
        .bind(data.description)
        .fetch_one(pool)
        .await
    }

    pub async fn list(pool: &PgPool, tenant: TenantId) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Link>(
            r#"
            SELECT id, company_id, user_id, url, description,
                   (SELECT COUNT(*) FROM link_clicks WHERE link_clicks.link_id = links.id) AS count,
                   created_at, updated_at
            FROM links
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
        data: UpdateLink,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Link>(
            r#"
            UPDATE links
            SET url = $3, description = $4, updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            RETURNING id, company_id, user_id, url, description,
                      (SELECT COUNT(*) FROM link_clicks WHERE link_clicks.link_id = links.id) AS count,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(tenant.as_uuid())
        .bind(data.url)
        .bind(data.description)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a link together with its click history
    pub async fn delete(pool: &PgPool, tenant: TenantId, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(tenant.as_uuid())
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl LinkClick {
    /// Records a click on any link, regardless of company
    ///
    /// Fails with a foreign key violation if the link does not exist.
    pub async fn record(pool: &PgPool, link_id: Uuid) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, LinkClick>(
            r#"
            INSERT INTO link_clicks (id, link_id)
            VALUES ($1, $2)
            RETURNING id, link_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(link_id)
        .fetch_one(pool)
        .await
    }
}
