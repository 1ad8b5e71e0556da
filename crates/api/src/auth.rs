// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session-based authentication with login lockout.
//!
//! Credential failures all collapse to the same client-facing message;
//! whether the email was unknown, the password wrong, or the account locked
//! is not distinguishable from outside.

use agrisure_domain::{Role, User, UserStatus};
use agrisure_persistence::{SessionRecord, Store, UserRecord, verify_password};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::error::ApiError;

/// Consecutive failures that trigger a lockout.
pub const MAX_FAILED_LOGINS: i64 = 5;

/// How long a lockout lasts.
pub const LOCKOUT_DURATION: Duration = Duration::minutes(30);

/// How long a session stays valid.
pub const SESSION_DURATION: Duration = Duration::days(30);

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// An authenticated caller, with the ACTIVE role record resolved for this
/// request. The record is never cached across requests, so permission edits
/// take effect on the next call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// The authenticated user.
    pub user: User,
    /// The role record matching the user's role name, if one exists.
    pub role: Option<Role>,
}

/// A successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// The opaque bearer token for subsequent requests.
    pub session_token: String,
    /// When the session expires.
    pub expires_at: OffsetDateTime,
    /// The authenticated user.
    pub user: User,
}

fn generate_session_token() -> String {
    format!(
        "{:016x}{:016x}{:016x}",
        rand::random::<u64>(),
        rand::random::<u64>(),
        rand::random::<u64>()
    )
}

/// Authenticates an email/password pair and opens a session.
///
/// Five consecutive failures lock the account for thirty minutes; a
/// successful login resets the counter and clears an expired lock.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` on any credential failure, with one
/// uniform message.
pub fn login(
    store: &Store,
    email: &str,
    password: &str,
    now: OffsetDateTime,
) -> Result<LoginOutcome, ApiError> {
    let Some(record) = store.user_by_email(email)? else {
        warn!(email, "Login attempt for unknown email");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };
    let UserRecord {
        user,
        password_hash,
    } = record;
    let user_id: i64 = user
        .user_id
        .ok_or_else(|| ApiError::Internal("stored user without id".to_string()))?;

    if user.status == UserStatus::Inactive {
        warn!(user_id, "Login attempt for inactive account");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }
    if let Some(locked_until) = user.locked_until
        && locked_until > now
    {
        warn!(user_id, "Login attempt while locked");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    if !verify_password(password, &password_hash)? {
        let failures: i64 = user.failed_login_attempts + 1;
        let lock: Option<OffsetDateTime> =
            (failures >= MAX_FAILED_LOGINS).then(|| now + LOCKOUT_DURATION);
        store.record_login_failure(user_id, failures, lock)?;
        warn!(user_id, failures, locked = lock.is_some(), "Login failure");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    store.record_login_success(user_id)?;

    let session_token: String = generate_session_token();
    let expires_at: OffsetDateTime = now + SESSION_DURATION;
    store.create_session(&session_token, user_id, expires_at)?;
    info!(user_id, "Login succeeded");

    let mut fresh: User = user;
    fresh.status = UserStatus::Active;
    fresh.failed_login_attempts = 0;
    fresh.locked_until = None;
    Ok(LoginOutcome {
        session_token,
        expires_at,
        user: fresh,
    })
}

/// Validates a bearer token and resolves the caller's role record.
///
/// Expired sessions are deleted as they are seen.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` if the token is unknown or expired, or
/// if the account can no longer authenticate.
pub fn authenticate(
    store: &Store,
    session_token: &str,
    now: OffsetDateTime,
) -> Result<Principal, ApiError> {
    let Some(session) = store.session_by_token(session_token)? else {
        return Err(ApiError::Unauthorized("Invalid session".to_string()));
    };
    let SessionRecord {
        user_id,
        expires_at,
        ..
    } = session;

    let expires: OffsetDateTime = OffsetDateTime::parse(&expires_at, &Rfc3339)
        .map_err(|e| ApiError::Internal(format!("bad session expiry: {e}")))?;
    if expires < now {
        store.delete_session(session_token)?;
        return Err(ApiError::Unauthorized("Session expired".to_string()));
    }

    let user: User = store
        .user_by_id(user_id)?
        .ok_or_else(|| ApiError::Unauthorized("Invalid session".to_string()))?
        .user;
    if user.status != UserStatus::Active {
        return Err(ApiError::Unauthorized(
            "Account cannot authenticate".to_string(),
        ));
    }

    let role: Option<Role> = store.role_by_name(user.role.value())?;
    Ok(Principal { user, role })
}

/// Deletes the caller's session. Unknown tokens are a no-op.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn logout(store: &Store, session_token: &str) -> Result<(), ApiError> {
    let deleted: usize = store.delete_session(session_token)?;
    if deleted > 0 {
        info!("Logout");
    }
    Ok(())
}
