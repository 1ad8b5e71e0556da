// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use agrisure_domain::{Action, Organization, Resource, Role};

use crate::Store;
use crate::tests::store;

#[test]
fn fresh_store_seeds_the_default_organization() {
    let store: Store = store();

    let org: Organization = store.default_organization().unwrap();
    assert_eq!(org.code, Organization::DEFAULT_CODE);
    assert!(!org.is_deleted);
}

#[test]
fn fresh_store_seeds_the_system_roles() {
    let store: Store = store();

    let roles: Vec<Role> = store.list_system_roles().unwrap();
    let names: Vec<&str> = roles.iter().map(|r| r.name.value()).collect();
    assert_eq!(names, ["ADMIN", "ASSESSOR", "MANAGER", "SUPERUSER", "USER"]);
    assert!(roles.iter().all(|r| r.is_system_role));
}

#[test]
fn seeding_is_idempotent_and_preserves_edits() {
    let store: Store = store();

    let mut admin: Role = store.role_by_name("ADMIN").unwrap().unwrap();
    admin.description = Some("Adjusted by an operator".to_string());
    store.update_role(&admin).unwrap();

    store.seed_defaults().unwrap();

    let kept: Role = store.role_by_name("ADMIN").unwrap().unwrap();
    assert_eq!(kept.description.as_deref(), Some("Adjusted by an operator"));
    assert!(kept.permissions.allows(Resource::Users, Action::Delete));
}

#[test]
fn foreign_keys_are_enforced() {
    let store: Store = store();
    assert!(store.verify_foreign_key_enforcement().is_ok());
}
