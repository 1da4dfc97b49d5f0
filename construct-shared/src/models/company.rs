/// Company model and database operations
///
/// A company is the unit of tenant isolation. Every client, project, task,
/// subtask and link row carries the id of the company that owns it.
///
/// # Example
///
/// ```no_run
/// use construct_shared::models::company::{Company, CreateCompany};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let company = Company::create(&pool, CreateCompany {
///     name: "Acme".to_string(),
///     tax_id: "123".to_string(),
///     email: "a@x.com".to_string(),
/// }).await?;
///
/// let found = Company::find_by_id(&pool, company.id).await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::models::user::{CreateUser, User};
use crate::tenant::TenantId;

/// Company row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    /// National tax registration number, unique across the system
    pub tax_id: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a company
#[derive(Debug, Clone)]
pub struct CreateCompany {
    pub name: String,
    pub tax_id: String,
    pub email: String,
}

/// Contact details an admin may change
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCompany {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl Company {
    /// Tenant id for scoping child lookups
    pub fn tenant(&self) -> TenantId {
        TenantId::from_company(self.id)
    }

    /// Creates a new company
    ///
    /// # Errors
    ///
    /// Returns a database error if the tax id is already registered
    pub async fn create(pool: &PgPool, data: CreateCompany) -> Result<Self, sqlx::Error> {
        Self::insert(pool, data).await
    }

    async fn insert<'e, E>(executor: E, data: CreateCompany) -> Result<Self, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (id, name, tax_id, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, tax_id, email, phone, address, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.name)
        .bind(data.tax_id)
        .bind(data.email)
        .fetch_one(executor)
        .await
    }

    /// Creates a company and its first admin user in a single transaction
    ///
    /// If the user insert fails (duplicate email or username) the company
    /// insert is rolled back, so no orphaned company is left behind.
    ///
    /// # Errors
    ///
    /// Returns the first database error encountered; the transaction is
    /// rolled back when it is dropped without commit.
    pub async fn create_with_admin(
        pool: &PgPool,
        company: CreateCompany,
        admin: CreateUser,
    ) -> Result<(Self, User), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let company = Self::insert(&mut *tx, company).await?;
        let user = User::insert(
            &mut *tx,
            CreateUser {
                company_id: Some(company.id),
                ..admin
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            company_id = %company.id,
            user_id = %user.id,
            "Company and admin user created"
        );

        Ok((company, user))
    }

    /// Finds a company by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, tax_id, email, phone, address, created_at, updated_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Replaces a company's contact details
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCompany,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET name = $2, email = $3, phone = $4, address = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, tax_id, email, phone, address, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.address)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_tenant_matches_id() {
        let now = Utc::now();
        let company = Company {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            tax_id: "123".to_string(),
            email: "a@x.com".to_string(),
            phone: String::new(),
            address: String::new(),
            created_at: now,
            updated_at: now,
        };

        assert_eq!(company.tenant().as_uuid(), company.id);
    }
}
