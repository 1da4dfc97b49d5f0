/// Company administration service
///
/// Both operations act on the caller's own company. The admin gate is
/// applied by the HTTP layer's `AdminScope` extractor before these are called.

use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{Company, UpdateCompany};
use crate::repository::CompanyRepository;
use crate::tenant::TenantScope;

#[derive(Clone)]
pub struct CompanyService {
    companies: Arc<dyn CompanyRepository>,
}

impl CompanyService {
    pub fn new(companies: Arc<dyn CompanyRepository>) -> Self {
        Self { companies }
    }

    pub async fn get_company(&self, scope: &TenantScope) -> ServiceResult<Company> {
        self.companies
            .find_company(scope.tenant())
            .await?
            .ok_or(ServiceError::NotFoundOrForbidden)
    }

    pub async fn update_company(
        &self,
        scope: &TenantScope,
        data: UpdateCompany,
    ) -> ServiceResult<Company> {
        let company = self
            .companies
            .update_company(scope.tenant(), data)
            .await?
            .ok_or(ServiceError::NotFoundOrForbidden)?;

        tracing::info!(company_id = %company.id, updated_by = %scope.user_id(), "Company updated");
        Ok(company)
    }
}
