// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Duration;

use crate::auth::{self, LoginOutcome, MAX_FAILED_LOGINS, Principal, SESSION_DURATION};
use crate::error::ApiError;
use crate::tests::{PASSWORD, T0, T1, admin, store};

#[test]
fn login_opens_a_usable_session() {
    let store = store();
    let _ = admin(&store);

    let outcome: LoginOutcome = auth::login(&store, "admin@coop.test", PASSWORD, T0).unwrap();
    assert_eq!(outcome.expires_at, T0 + SESSION_DURATION);
    assert_eq!(outcome.user.email, "admin@coop.test");

    let principal: Principal = auth::authenticate(&store, &outcome.session_token, T1).unwrap();
    assert_eq!(principal.user.email, "admin@coop.test");
    let role = principal.role.unwrap();
    assert_eq!(role.name.value(), "ADMIN");
}

#[test]
fn credential_failures_share_one_message() {
    let store = store();
    let _ = admin(&store);

    let wrong_password = auth::login(&store, "admin@coop.test", "nope", T0).unwrap_err();
    let unknown_email = auth::login(&store, "ghost@coop.test", PASSWORD, T0).unwrap_err();
    assert_eq!(
        wrong_password,
        ApiError::Unauthorized("Invalid email or password".to_string())
    );
    assert_eq!(unknown_email, wrong_password);
}

#[test]
fn lockout_engages_and_expires() {
    let store = store();
    let _ = admin(&store);

    for _ in 0..MAX_FAILED_LOGINS {
        let _ = auth::login(&store, "admin@coop.test", "nope", T0).unwrap_err();
    }
    // The right password is refused while the lock holds.
    let locked = auth::login(&store, "admin@coop.test", PASSWORD, T0 + Duration::minutes(5));
    assert_eq!(
        locked.unwrap_err(),
        ApiError::Unauthorized("Invalid email or password".to_string())
    );

    let after_lock = T0 + Duration::minutes(31);
    let outcome: LoginOutcome =
        auth::login(&store, "admin@coop.test", PASSWORD, after_lock).unwrap();
    assert_eq!(outcome.user.failed_login_attempts, 0);
    assert!(outcome.user.locked_until.is_none());
}

#[test]
fn expired_sessions_are_deleted_on_sight() {
    let store = store();
    let _ = admin(&store);
    let outcome: LoginOutcome = auth::login(&store, "admin@coop.test", PASSWORD, T0).unwrap();

    let late = T0 + SESSION_DURATION + Duration::minutes(1);
    let expired = auth::authenticate(&store, &outcome.session_token, late).unwrap_err();
    assert_eq!(expired, ApiError::Unauthorized("Session expired".to_string()));

    // The second attempt no longer finds the session at all.
    let gone = auth::authenticate(&store, &outcome.session_token, late).unwrap_err();
    assert_eq!(gone, ApiError::Unauthorized("Invalid session".to_string()));
}

#[test]
fn logout_invalidates_the_token() {
    let store = store();
    let _ = admin(&store);
    let outcome: LoginOutcome = auth::login(&store, "admin@coop.test", PASSWORD, T0).unwrap();

    auth::logout(&store, &outcome.session_token).unwrap();
    let err = auth::authenticate(&store, &outcome.session_token, T1).unwrap_err();
    assert_eq!(err, ApiError::Unauthorized("Invalid session".to_string()));

    // Unknown tokens are a quiet no-op.
    auth::logout(&store, "not-a-token").unwrap();
}
