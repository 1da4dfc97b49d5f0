/// Tenant identity and request scope
///
/// [`TenantId`] is the company id in a dedicated type. Every tenant-scoped
/// repository method requires one, so a query without a company predicate
/// cannot be written against the repository traits.
///
/// [`TenantScope`] is the caller's verified identity inside a company. It is
/// built once per request from token claims (see
/// [`AuthContext::tenant_scope`](crate::auth::middleware::AuthContext::tenant_scope))
/// and handed to every tenant-scoped service operation.
///
/// # Example
///
/// ```
/// use construct_shared::auth::jwt::Claims;
/// use construct_shared::models::UserRole;
/// use construct_shared::tenant::TenantScope;
/// use uuid::Uuid;
///
/// let claims = Claims::new(Uuid::new_v4(), Some(Uuid::new_v4()), Some(UserRole::Member));
/// let scope = TenantScope::from_claims(&claims).unwrap();
/// assert!(!scope.is_admin());
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::authorization::AuthzError;
use crate::auth::jwt::Claims;
use crate::auth::middleware::AuthContext;
use crate::models::UserRole;

/// Company id used as a query predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(Uuid);

impl TenantId {
    pub fn from_company(company_id: Uuid) -> Self {
        Self(company_id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Authenticated caller bound to a company
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantScope {
    user_id: Uuid,
    tenant: TenantId,
    role: UserRole,
}

impl TenantScope {
    pub(crate) fn new(user_id: Uuid, tenant: TenantId, role: UserRole) -> Self {
        Self {
            user_id,
            tenant,
            role,
        }
    }

    /// Builds a scope from verified token claims
    ///
    /// # Errors
    ///
    /// Returns `AuthzError::NoTenant` if the claims carry no company or no
    /// role (federated users that have not joined a company).
    pub fn from_claims(claims: &Claims) -> Result<Self, AuthzError> {
        AuthContext::from_claims(claims).tenant_scope()
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn tenant(&self) -> TenantId {
        self.tenant
    }

    pub fn company_id(&self) -> Uuid {
        self.tenant.as_uuid()
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_from_claims() {
        let user_id = Uuid::new_v4();
        let company_id = Uuid::new_v4();
        let claims = Claims::new(user_id, Some(company_id), Some(UserRole::Admin));

        let scope = TenantScope::from_claims(&claims).unwrap();
        assert_eq!(scope.user_id(), user_id);
        assert_eq!(scope.company_id(), company_id);
        assert!(scope.is_admin());
    }

    #[test]
    fn test_scope_requires_company() {
        let claims = Claims::new(Uuid::new_v4(), None, None);
        assert!(matches!(
            TenantScope::from_claims(&claims),
            Err(AuthzError::NoTenant)
        ));
    }

    #[test]
    fn test_scope_requires_role() {
        let claims = Claims::new(Uuid::new_v4(), Some(Uuid::new_v4()), None);
        assert!(TenantScope::from_claims(&claims).is_err());
    }
}
