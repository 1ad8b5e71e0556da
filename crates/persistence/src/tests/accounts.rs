// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use agrisure_domain::{PermissionSet, Role, RoleName, RoleStatus, UserStatus};

use crate::accounts::verify_password;
use crate::records::{SessionRecord, UserRecord};
use crate::tests::{T1, T2, seed_user, store};
use crate::{PersistenceError, Store};

#[test]
fn create_user_hashes_the_password() {
    let store: Store = store();
    let user_id: i64 = seed_user(&store, "tamanda@example.com");

    let record: UserRecord = store.user_by_id(user_id).unwrap().unwrap();
    assert_eq!(record.user.status, UserStatus::Active);
    assert_ne!(record.password_hash, "correct horse battery");
    assert!(verify_password("correct horse battery", &record.password_hash).unwrap());
    assert!(!verify_password("wrong", &record.password_hash).unwrap());
}

#[test]
fn create_user_rejects_an_unknown_role() {
    let store: Store = store();
    let err = store
        .create_user(
            "n@example.com",
            "Noma",
            &RoleName::new("AUDITOR").unwrap(),
            crate::tests::default_org(&store),
            "pw",
        )
        .unwrap_err();
    assert!(matches!(err, PersistenceError::NotFound(_)));
}

#[test]
fn email_lookup_is_case_insensitive() {
    let store: Store = store();
    seed_user(&store, "tamanda@example.com");

    let found = store.user_by_email("TAMANDA@Example.COM").unwrap();
    assert!(found.is_some());
}

#[test]
fn login_failure_and_success_round_the_lock_state() {
    let store: Store = store();
    let user_id: i64 = seed_user(&store, "tamanda@example.com");

    store.record_login_failure(user_id, 5, Some(T1)).unwrap();
    let locked: UserRecord = store.user_by_id(user_id).unwrap().unwrap();
    assert_eq!(locked.user.status, UserStatus::Locked);
    assert_eq!(locked.user.failed_login_attempts, 5);
    assert_eq!(locked.user.locked_until, Some(T1));

    store.record_login_success(user_id).unwrap();
    let unlocked: UserRecord = store.user_by_id(user_id).unwrap().unwrap();
    assert_eq!(unlocked.user.status, UserStatus::Active);
    assert_eq!(unlocked.user.failed_login_attempts, 0);
    assert!(unlocked.user.locked_until.is_none());
}

#[test]
fn sessions_round_trip_and_expire() {
    let store: Store = store();
    let user_id: i64 = seed_user(&store, "tamanda@example.com");

    store.create_session("tok-1", user_id, T1).unwrap();
    store.create_session("tok-2", user_id, T2).unwrap();

    let session: SessionRecord = store.session_by_token("tok-1").unwrap().unwrap();
    assert_eq!(session.user_id, user_id);

    // tok-1 expires at T1, so a sweep at T2 removes only it.
    let swept: usize = store.delete_expired_sessions(T2).unwrap();
    assert_eq!(swept, 1);
    assert!(store.session_by_token("tok-1").unwrap().is_none());
    assert!(store.session_by_token("tok-2").unwrap().is_some());

    assert_eq!(store.delete_session("tok-2").unwrap(), 1);
    assert!(store.session_by_token("tok-2").unwrap().is_none());
}

#[test]
fn custom_roles_round_trip() {
    let store: Store = store();
    let role: Role = Role {
        role_id: None,
        name: RoleName::new("field agent").unwrap(),
        description: Some("Mobile capture only".to_string()),
        status: RoleStatus::Active,
        is_system_role: false,
        permissions: PermissionSet::empty(),
    };

    store.insert_role(&role).unwrap();

    let stored: Role = store.role_by_name("FIELD AGENT").unwrap().unwrap();
    assert!(!stored.is_system_role);
    assert_eq!(stored.description.as_deref(), Some("Mobile capture only"));

    assert_eq!(store.count_users_with_role("FIELD AGENT").unwrap(), 0);
    assert_eq!(store.delete_role("FIELD AGENT").unwrap(), 1);
    assert!(store.role_by_name("FIELD AGENT").unwrap().is_none());
}

#[test]
fn count_users_with_role_sees_holders() {
    let store: Store = store();
    seed_user(&store, "a@example.com");
    seed_user(&store, "b@example.com");

    assert_eq!(store.count_users_with_role("ADMIN").unwrap(), 2);
    assert_eq!(store.count_users_with_role("MANAGER").unwrap(), 0);
}
