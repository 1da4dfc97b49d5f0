/// Trackable link service
///
/// Links belong to a company. Clicks are recorded anonymously against any
/// link id and only ever appended.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{CreateLink, Link, LinkClick, UpdateLink};
use crate::repository::{LinkRepository, StoreError};
use crate::tenant::TenantScope;

#[derive(Clone)]
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
}

impl LinkService {
    pub fn new(links: Arc<dyn LinkRepository>) -> Self {
        Self { links }
    }

    pub async fn create_link(
        &self,
        scope: &TenantScope,
        url: &str,
        description: &str,
    ) -> ServiceResult<Link> {
        let link = self
            .links
            .create_link(
                scope.tenant(),
                CreateLink {
                    user_id: scope.user_id(),
                    url: url.to_string(),
                    description: description.to_string(),
                },
            )
            .await?;

        tracing::info!(link_id = %link.id, company_id = %link.company_id, "Link created");
        Ok(link)
    }

    pub async fn list_links(&self, scope: &TenantScope) -> ServiceResult<Vec<Link>> {
        Ok(self.links.list_links(scope.tenant()).await?)
    }

    pub async fn update_link(
        &self,
        scope: &TenantScope,
        id: Uuid,
        url: &str,
        description: &str,
    ) -> ServiceResult<Link> {
        self.links
            .update_link(
                scope.tenant(),
                id,
                UpdateLink {
                    url: url.to_string(),
                    description: description.to_string(),
                },
            )
            .await?
            .ok_or(ServiceError::NotFoundOrForbidden)
    }

    pub async fn delete_link(&self, scope: &TenantScope, id: Uuid) -> ServiceResult<()> {
        if !self.links.delete_link(scope.tenant(), id).await? {
            return Err(ServiceError::NotFoundOrForbidden);
        }
        Ok(())
    }

    /// Records an anonymous click
    ///
    /// # Errors
    ///
    /// - `NotFoundOrForbidden` if the link does not exist
    pub async fn track_click(&self, link_id: Uuid) -> ServiceResult<LinkClick> {
        match self.links.record_click(link_id).await {
            Ok(click) => Ok(click),
            Err(StoreError::MissingReference(_)) => Err(ServiceError::NotFoundOrForbidden),
            Err(e) => Err(e.into()),
        }
    }
}
