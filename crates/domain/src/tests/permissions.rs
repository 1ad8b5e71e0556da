// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::role::{Action, PermissionSet, Resource, RoleName};

#[test]
fn role_names_normalize_to_uppercase() {
    let name = RoleName::new("  manager ").unwrap();
    assert_eq!(name.value(), "MANAGER");
}

#[test]
fn empty_role_name_is_rejected() {
    assert!(RoleName::new("   ").is_err());
}

#[test]
fn superuser_name_is_distinguished() {
    assert!(RoleName::new("superuser").unwrap().is_superuser());
    assert!(!RoleName::new("ADMIN").unwrap().is_superuser());
}

#[test]
fn sentinel_grant_allows_everything() {
    let set: PermissionSet = PermissionSet::grant_all();
    assert!(set.allows(Resource::Claims, Action::Delete));
    assert!(set.allows(Resource::Roles, Action::Create));
}

#[test]
fn per_resource_grant_allows_only_listed_actions() {
    let set: PermissionSet = PermissionSet::empty().with(Resource::Claims, &[Action::Read]);
    assert!(set.allows(Resource::Claims, Action::Read));
    assert!(!set.allows(Resource::Claims, Action::Create));
}

#[test]
fn missing_resource_key_denies() {
    let set: PermissionSet = PermissionSet::empty().with(Resource::Claims, &[Action::Read]);
    assert!(!set.allows(Resource::Farmers, Action::Read));
}

#[test]
fn empty_set_denies_everything() {
    let set: PermissionSet = PermissionSet::empty();
    assert!(!set.allows(Resource::Quotations, Action::Read));
}

#[test]
fn permission_set_round_trips_through_json() {
    let set: PermissionSet = PermissionSet::empty()
        .with(Resource::Claims, &[Action::Read, Action::Update])
        .with(Resource::Farmers, &[Action::Read]);
    let json: String = serde_json::to_string(&set).unwrap();
    let back: PermissionSet = serde_json::from_str(&json).unwrap();
    assert_eq!(back, set);
}

#[test]
fn sentinel_grant_parses_from_stored_form() {
    let set: PermissionSet = serde_json::from_str(r#"{"all": true}"#).unwrap();
    assert!(set.all);
    assert!(set.allows(Resource::Invoices, Action::Update));
}
