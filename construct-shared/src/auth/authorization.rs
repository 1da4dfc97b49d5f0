/// Authorization checks
///
/// The permission model has two levels:
///
/// 1. **Tenant membership**: the caller's claims carry a company id and role.
///    Tenant-scoped routes reject callers without one.
/// 2. **Admin gate**: company-management operations additionally require the
///    `admin` role.
///
/// Roles come from the token. They are not re-checked against storage.
///
/// # Example
///
/// ```
/// use construct_shared::auth::authorization::require_admin;
/// use construct_shared::auth::jwt::Claims;
/// use construct_shared::models::UserRole;
/// use construct_shared::tenant::TenantScope;
/// use uuid::Uuid;
///
/// let claims = Claims::new(Uuid::new_v4(), Some(Uuid::new_v4()), Some(UserRole::Member));
/// let scope = TenantScope::from_claims(&claims).unwrap();
/// assert!(require_admin(&scope).is_err());
/// ```

use crate::models::UserRole;
use crate::tenant::TenantScope;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthzError {
    /// Caller is authenticated but belongs to no company
    #[error("Caller is not a member of any company")]
    NoTenant,

    /// Caller doesn't have the required role
    #[error("Insufficient permissions: requires {required}, has {actual}")]
    InsufficientRole { required: UserRole, actual: UserRole },
}

/// Returns true if `actual` grants everything `required` does
pub fn has_role(actual: UserRole, required: UserRole) -> bool {
    match required {
        UserRole::Member => true,
        UserRole::Admin => actual == UserRole::Admin,
    }
}

/// Requires a minimum role
///
/// # Errors
///
/// Returns `AuthzError::InsufficientRole` if the caller's role is lower
pub fn require_role(scope: &TenantScope, required: UserRole) -> Result<(), AuthzError> {
    if has_role(scope.role(), required) {
        Ok(())
    } else {
        tracing::debug!(
            user_id = %scope.user_id(),
            required = %required,
            actual = %scope.role(),
            "Role check failed"
        );
        Err(AuthzError::InsufficientRole {
            required,
            actual: scope.role(),
        })
    }
}

/// Requires the admin role
pub fn require_admin(scope: &TenantScope) -> Result<(), AuthzError> {
    require_role(scope, UserRole::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenant::TenantId;
    use uuid::Uuid;

    fn scope(role: UserRole) -> TenantScope {
        TenantScope::new(Uuid::new_v4(), TenantId::from_company(Uuid::new_v4()), role)
    }

    #[test]
    fn test_role_hierarchy() {
        assert!(has_role(UserRole::Admin, UserRole::Admin));
        assert!(has_role(UserRole::Admin, UserRole::Member));
        assert!(has_role(UserRole::Member, UserRole::Member));
        assert!(!has_role(UserRole::Member, UserRole::Admin));
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&scope(UserRole::Admin)).is_ok());
        assert_eq!(
            require_admin(&scope(UserRole::Member)),
            Err(AuthzError::InsufficientRole {
                required: UserRole::Admin,
                actual: UserRole::Member,
            })
        );
    }
}
