// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::permission::{authorize, system_roles};
use agrisure_domain::{
    Action, PermissionSet, Resource, Role, RoleName, RoleStatus, User, UserStatus,
};

fn user(role: &str) -> User {
    User {
        user_id: Some(1),
        email: "clerk@example.com".to_string(),
        name: "Clerk".to_string(),
        role: RoleName::new(role).unwrap(),
        organization_id: 1,
        status: UserStatus::Active,
        failed_login_attempts: 0,
        locked_until: None,
    }
}

fn role(name: &str, permissions: PermissionSet) -> Role {
    Role {
        role_id: Some(10),
        name: RoleName::new(name).unwrap(),
        description: None,
        status: RoleStatus::Active,
        is_system_role: false,
        permissions,
    }
}

#[test]
fn unauthenticated_is_always_denied() {
    assert!(authorize(None, None, Resource::Claims, Action::Read).is_err());
}

#[test]
fn superuser_bypasses_stored_records() {
    // No role record at all, yet every pair is allowed.
    let su: User = user("SUPERUSER");
    assert!(authorize(Some(&su), None, Resource::Roles, Action::Delete).is_ok());
    assert!(authorize(Some(&su), None, Resource::Sync, Action::Create).is_ok());
}

#[test]
fn missing_role_record_denies() {
    let clerk: User = user("CLERK");
    assert!(authorize(Some(&clerk), None, Resource::Claims, Action::Read).is_err());
}

#[test]
fn inactive_role_grants_nothing() {
    let clerk: User = user("CLERK");
    let mut record: Role = role("CLERK", PermissionSet::grant_all());
    record.status = RoleStatus::Inactive;
    assert!(authorize(Some(&clerk), Some(&record), Resource::Claims, Action::Read).is_err());
}

#[test]
fn per_resource_grants_are_action_scoped() {
    let clerk: User = user("CLERK");
    let record: Role = role(
        "CLERK",
        PermissionSet::empty().with(Resource::Claims, &[Action::Read]),
    );

    assert!(authorize(Some(&clerk), Some(&record), Resource::Claims, Action::Read).is_ok());
    assert!(authorize(Some(&clerk), Some(&record), Resource::Claims, Action::Create).is_err());
    assert!(authorize(Some(&clerk), Some(&record), Resource::Farmers, Action::Read).is_err());
}

#[test]
fn sentinel_grant_allows_every_pair() {
    let clerk: User = user("CLERK");
    let record: Role = role("CLERK", PermissionSet::grant_all());
    assert!(authorize(Some(&clerk), Some(&record), Resource::Invoices, Action::Delete).is_ok());
}

#[test]
fn seeded_roles_cover_the_expected_grants() {
    let roles: Vec<Role> = system_roles();
    assert_eq!(roles.len(), 5);
    assert!(roles.iter().all(|r| r.is_system_role && r.is_active()));

    let find = |name: &str| {
        roles
            .iter()
            .find(|r| r.name.value() == name)
            .unwrap()
    };

    assert!(find("SUPERUSER").permissions.all);
    assert!(
        find("ADMIN")
            .permissions
            .allows(Resource::Users, Action::Delete)
    );
    assert!(
        !find("MANAGER")
            .permissions
            .allows(Resource::Farmers, Action::Delete)
    );
    assert!(
        find("ASSESSOR")
            .permissions
            .allows(Resource::Claims, Action::Update)
    );
    assert!(
        !find("USER")
            .permissions
            .allows(Resource::Claims, Action::Create)
    );
}
