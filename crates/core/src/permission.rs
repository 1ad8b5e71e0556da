// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The permission evaluator.
//!
//! Deterministic and side-effect free; the caller resolves the principal's
//! ACTIVE role record per request and passes it in, so permission changes
//! take effect on the next request without any cache invalidation.

use agrisure_domain::{Action, PermissionSet, Resource, Role, RoleName, RoleStatus, User};

/// A denied authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDenied {
    /// The resource the principal attempted to access.
    pub resource: Resource,
    /// The action the principal attempted.
    pub action: Action,
}

impl std::fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Permission denied: {} on {}",
            self.action.as_str(),
            self.resource.as_str()
        )
    }
}

impl std::error::Error for AccessDenied {}

/// Decides whether a principal may perform `action` on `resource`.
///
/// `role` is the role record matching the principal's role name, if one
/// exists; only an ACTIVE record grants anything. Rules, in order:
///
/// 1. No principal → deny.
/// 2. Role name `SUPERUSER` → allow, independent of any stored record.
/// 3. No role record, or the record is inactive → deny.
/// 4. The sentinel `{"all": true}` grant → allow.
/// 5. Otherwise allow iff the action appears under the resource key; a
///    missing key denies.
///
/// # Errors
///
/// Returns `AccessDenied` naming the resource and action on any deny.
pub fn authorize(
    principal: Option<&User>,
    role: Option<&Role>,
    resource: Resource,
    action: Action,
) -> Result<(), AccessDenied> {
    let denied: AccessDenied = AccessDenied { resource, action };

    let Some(user) = principal else {
        return Err(denied);
    };
    if user.role.is_superuser() {
        return Ok(());
    }

    let allowed: bool = role
        .filter(|record| record.is_active())
        .is_some_and(|record| record.permissions.allows(resource, action));
    if allowed { Ok(()) } else { Err(denied) }
}

/// Returns the built-in system roles installed at seed time.
///
/// Role names and permission maps match the numbers already in circulation;
/// permission changes for existing deployments are done through role
/// administration, not by editing this list.
#[must_use]
pub fn system_roles() -> Vec<Role> {
    let crud: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];
    let read_update: [Action; 2] = [Action::Read, Action::Update];

    let definitions: Vec<(&str, &str, PermissionSet)> = vec![
        (
            RoleName::SUPERUSER,
            "System administrator with full access to all features",
            PermissionSet::grant_all(),
        ),
        (
            "ADMIN",
            "Administrator with management capabilities",
            PermissionSet::empty()
                .with(Resource::Users, &crud)
                .with(Resource::Roles, &[Action::Read])
                .with(Resource::Farmers, &crud)
                .with(Resource::Farms, &crud)
                .with(Resource::Quotations, &crud)
                .with(Resource::Claims, &crud)
                .with(Resource::Invoices, &crud)
                .with(Resource::Notifications, &[Action::Read, Action::Update])
                .with(Resource::Sync, &[Action::Create, Action::Read]),
        ),
        (
            "MANAGER",
            "Manager with operational oversight",
            PermissionSet::empty()
                .with(Resource::Users, &[Action::Read])
                .with(Resource::Farmers, &read_update)
                .with(Resource::Farms, &read_update)
                .with(Resource::Quotations, &read_update)
                .with(Resource::Claims, &read_update)
                .with(Resource::Invoices, &read_update)
                .with(Resource::Notifications, &[Action::Read, Action::Update]),
        ),
        (
            "ASSESSOR",
            "Loss assessor for claim evaluation",
            PermissionSet::empty()
                .with(Resource::Claims, &read_update)
                .with(Resource::Farmers, &[Action::Read])
                .with(Resource::Quotations, &[Action::Read])
                .with(Resource::Notifications, &[Action::Read, Action::Update]),
        ),
        (
            "USER",
            "Standard user with basic access",
            PermissionSet::empty()
                .with(Resource::Farmers, &[Action::Read])
                .with(Resource::Quotations, &[Action::Read])
                .with(Resource::Claims, &[Action::Read])
                .with(Resource::Notifications, &[Action::Read, Action::Update]),
        ),
    ];

    definitions
        .into_iter()
        .filter_map(|(name, description, permissions)| {
            let name: RoleName = RoleName::new(name).ok()?;
            Some(Role {
                role_id: None,
                name,
                description: Some(description.to_string()),
                status: RoleStatus::Active,
                is_system_role: true,
                permissions,
            })
        })
        .collect()
}
