/// Client service
///
/// CRUD over a company's clients plus comments. Comment scoping is a
/// deployment policy (see [`CommentScopePolicy`]).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{Client, Comment, CreateClient, UpdateClient};
use crate::repository::ClientRepository;
use crate::tenant::TenantScope;

/// Whether adding a comment checks the client's company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentScopePolicy {
    /// Comments attach by client id alone; any authenticated caller with a
    /// company may comment on any existing client
    #[default]
    Unscoped,

    /// The client must belong to the caller's company
    TenantScoped,
}

impl std::str::FromStr for CommentScopePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unscoped" => Ok(CommentScopePolicy::Unscoped),
            "tenant_scoped" => Ok(CommentScopePolicy::TenantScoped),
            _ => Err(format!("Invalid comment scope policy: {}", s)),
        }
    }
}

/// Fields supplied when creating or replacing a client
#[derive(Debug, Clone, Default)]
pub struct ClientInput {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub summary: String,
}

/// Client with its comments
#[derive(Debug, Clone, Serialize)]
pub struct ClientDetails {
    #[serde(flatten)]
    pub client: Client,
    pub comments: Vec<Comment>,
}

#[derive(Clone)]
pub struct ClientService {
    clients: Arc<dyn ClientRepository>,
    comment_policy: CommentScopePolicy,
}

impl ClientService {
    pub fn new(clients: Arc<dyn ClientRepository>, comment_policy: CommentScopePolicy) -> Self {
        Self {
            clients,
            comment_policy,
        }
    }

    pub async fn create_client(
        &self,
        scope: &TenantScope,
        input: ClientInput,
    ) -> ServiceResult<Client> {
        let client = self
            .clients
            .create_client(
                scope.tenant(),
                CreateClient {
                    user_id: scope.user_id(),
                    name: input.name,
                    phone: input.phone,
                    address: input.address,
                    summary: input.summary,
                },
            )
            .await?;

        tracing::info!(client_id = %client.id, company_id = %client.company_id, "Client created");
        Ok(client)
    }

    pub async fn list_clients(&self, scope: &TenantScope) -> ServiceResult<Vec<Client>> {
        Ok(self.clients.list_clients(scope.tenant()).await?)
    }

    pub async fn get_client(&self, scope: &TenantScope, id: Uuid) -> ServiceResult<ClientDetails> {
        let client = self
            .clients
            .find_client(scope.tenant(), id)
            .await?
            .ok_or(ServiceError::NotFoundOrForbidden)?;
        let comments = self.clients.list_comments(client.id).await?;

        Ok(ClientDetails { client, comments })
    }

    pub async fn update_client(
        &self,
        scope: &TenantScope,
        id: Uuid,
        input: ClientInput,
    ) -> ServiceResult<Client> {
        self.clients
            .update_client(
                scope.tenant(),
                id,
                UpdateClient {
                    name: input.name,
                    phone: input.phone,
                    address: input.address,
                    summary: input.summary,
                },
            )
            .await?
            .ok_or(ServiceError::NotFoundOrForbidden)
    }

    pub async fn delete_client(&self, scope: &TenantScope, id: Uuid) -> ServiceResult<()> {
        if !self.clients.delete_client(scope.tenant(), id).await? {
            return Err(ServiceError::NotFoundOrForbidden);
        }
        tracing::info!(client_id = %id, company_id = %scope.company_id(), "Client deleted");
        Ok(())
    }

    /// Adds a comment to a client, subject to the configured policy
    ///
    /// # Errors
    ///
    /// - `NotFoundOrForbidden` if the client does not exist, or under
    ///   `TenantScoped` if it belongs to another company
    pub async fn add_comment(
        &self,
        scope: &TenantScope,
        client_id: Uuid,
        content: &str,
    ) -> ServiceResult<Comment> {
        if self.comment_policy == CommentScopePolicy::TenantScoped
            && self
                .clients
                .find_client(scope.tenant(), client_id)
                .await?
                .is_none()
        {
            return Err(ServiceError::NotFoundOrForbidden);
        }

        let comment = self.clients.add_comment(client_id, content).await?;
        tracing::debug!(client_id = %client_id, comment_id = %comment.id, "Comment added");
        Ok(comment)
    }
}
