// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User, role, and session persistence.

use agrisure_domain::{Role, RoleName, UserStatus};
use rusqlite::{OptionalExtension, params};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::Store;
use crate::error::PersistenceError;
use crate::records::{RoleRow, SessionRecord, UserRecord, UserRow, format_timestamp};

/// Verifies a password against a stored bcrypt hash.
///
/// # Errors
///
/// Returns an error if verification fails to run.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::PasswordHashError(e.to_string()))
}

const USER_COLUMNS: &str = "user_id, email, name, password_hash, role, organization_id,
                            status, failed_login_attempts, locked_until";

fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        user_id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        role: row.get(4)?,
        organization_id: row.get(5)?,
        status: row.get(6)?,
        failed_login_attempts: row.get(7)?,
        locked_until: row.get(8)?,
    })
}

fn map_role_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RoleRow> {
    Ok(RoleRow {
        role_id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        status: row.get(3)?,
        is_system_role: row.get::<_, i64>(4)? != 0,
        permissions_json: row.get(5)?,
    })
}

impl Store {
    /// Creates a user, hashing the password with bcrypt.
    ///
    /// The role name must match an existing role row; the role is stored as
    /// a validated value-type string.
    ///
    /// # Errors
    ///
    /// Returns an error if the role does not exist, the email is taken, or
    /// hashing fails.
    pub fn create_user(
        &self,
        email: &str,
        name: &str,
        role: &RoleName,
        organization_id: i64,
        password: &str,
    ) -> Result<i64, PersistenceError> {
        if self.role_by_name(role.value())?.is_none() {
            return Err(PersistenceError::NotFound(format!(
                "Role '{}'",
                role.value()
            )));
        }

        let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| PersistenceError::PasswordHashError(e.to_string()))?;

        self.conn.execute(
            "INSERT INTO users (email, name, password_hash, role, organization_id, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                email,
                name,
                password_hash,
                role.value(),
                organization_id,
                UserStatus::Active.as_str(),
            ],
        )?;

        let user_id: i64 = self.conn.last_insert_rowid();
        info!(user_id, email, role = role.value(), "Created user");
        Ok(user_id)
    }

    /// Retrieves a user (with credential hash) by email, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed.
    pub fn user_by_email(&self, email: &str) -> Result<Option<UserRecord>, PersistenceError> {
        let row: Option<UserRow> = self
            .conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email],
                map_user_row,
            )
            .optional()?;
        row.map(UserRow::into_record).transpose()
    }

    /// Retrieves a user (with credential hash) by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed.
    pub fn user_by_id(&self, user_id: i64) -> Result<Option<UserRecord>, PersistenceError> {
        let row: Option<UserRow> = self
            .conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
                params![user_id],
                map_user_row,
            )
            .optional()?;
        row.map(UserRow::into_record).transpose()
    }

    /// Records a failed login attempt, optionally locking the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn record_login_failure(
        &self,
        user_id: i64,
        failed_attempts: i64,
        locked_until: Option<OffsetDateTime>,
    ) -> Result<(), PersistenceError> {
        let lock_ts: Option<String> = locked_until.map(format_timestamp).transpose()?;
        let status: &str = if lock_ts.is_some() {
            UserStatus::Locked.as_str()
        } else {
            UserStatus::Active.as_str()
        };

        self.conn.execute(
            "UPDATE users
             SET failed_login_attempts = ?2, locked_until = ?3,
                 status = CASE WHEN status = 'INACTIVE' THEN status ELSE ?4 END
             WHERE user_id = ?1",
            params![user_id, failed_attempts, lock_ts, status],
        )?;
        debug!(user_id, failed_attempts, "Recorded login failure");
        Ok(())
    }

    /// Resets the failure counter and clears any expired lock after a
    /// successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn record_login_success(&self, user_id: i64) -> Result<(), PersistenceError> {
        self.conn.execute(
            "UPDATE users
             SET failed_login_attempts = 0, locked_until = NULL,
                 status = CASE WHEN status = 'LOCKED' THEN 'ACTIVE' ELSE status END
             WHERE user_id = ?1",
            params![user_id],
        )?;
        debug!(user_id, "Recorded login success");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    /// Creates a session row for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &self,
        session_token: &str,
        user_id: i64,
        expires_at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        let expires: String = format_timestamp(expires_at)?;
        self.conn.execute(
            "INSERT INTO sessions (session_token, user_id, expires_at)
             VALUES (?1, ?2, ?3)",
            params![session_token, user_id, expires],
        )?;
        let session_id: i64 = self.conn.last_insert_rowid();
        debug!(session_id, user_id, "Created session");
        Ok(session_id)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn session_by_token(
        &self,
        session_token: &str,
    ) -> Result<Option<SessionRecord>, PersistenceError> {
        let record: Option<SessionRecord> = self
            .conn
            .query_row(
                "SELECT session_id, session_token, user_id, expires_at
                 FROM sessions
                 WHERE session_token = ?1",
                params![session_token],
                |row| {
                    Ok(SessionRecord {
                        session_id: row.get(0)?,
                        session_token: row.get(1)?,
                        user_id: row.get(2)?,
                        expires_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Deletes a session by token (logout).
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&self, session_token: &str) -> Result<usize, PersistenceError> {
        Ok(self.conn.execute(
            "DELETE FROM sessions WHERE session_token = ?1",
            params![session_token],
        )?)
    }

    /// Deletes all sessions that expired before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&self, now: OffsetDateTime) -> Result<usize, PersistenceError> {
        let cutoff: String = format_timestamp(now)?;
        let deleted: usize = self.conn.execute(
            "DELETE FROM sessions WHERE expires_at < ?1",
            params![cutoff],
        )?;
        if deleted > 0 {
            info!(deleted, "Deleted expired sessions");
        }
        Ok(deleted)
    }

    // ------------------------------------------------------------------
    // Roles
    // ------------------------------------------------------------------

    /// Inserts a role.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or serialization fails.
    pub fn insert_role(&self, role: &Role) -> Result<i64, PersistenceError> {
        let permissions_json: String = serde_json::to_string(&role.permissions)?;
        self.conn.execute(
            "INSERT INTO roles (name, description, status, is_system_role, permissions_json)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                role.name.value(),
                role.description,
                role.status.as_str(),
                i64::from(role.is_system_role),
                permissions_json,
            ],
        )?;
        let role_id: i64 = self.conn.last_insert_rowid();
        info!(role_id, name = role.name.value(), "Created role");
        Ok(role_id)
    }

    /// Retrieves a role by its normalized name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed.
    pub fn role_by_name(&self, name: &str) -> Result<Option<Role>, PersistenceError> {
        let row: Option<RoleRow> = self
            .conn
            .query_row(
                "SELECT role_id, name, description, status, is_system_role, permissions_json
                 FROM roles
                 WHERE name = ?1",
                params![name],
                map_role_row,
            )
            .optional()?;
        row.map(RoleRow::into_domain).transpose()
    }

    /// Lists all roles ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub fn list_roles(&self) -> Result<Vec<Role>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT role_id, name, description, status, is_system_role, permissions_json
             FROM roles
             ORDER BY name ASC",
        )?;
        let rows = stmt.query_map([], map_role_row)?;

        let mut roles: Vec<Role> = Vec::new();
        for row in rows {
            roles.push(row?.into_domain()?);
        }
        Ok(roles)
    }

    /// Updates a role's description, status, and permission map by name.
    ///
    /// System-role mutation restrictions are enforced by the caller before
    /// this write.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the update fails.
    pub fn update_role(&self, role: &Role) -> Result<usize, PersistenceError> {
        let permissions_json: String = serde_json::to_string(&role.permissions)?;
        let updated: usize = self.conn.execute(
            "UPDATE roles
             SET description = ?2, status = ?3, permissions_json = ?4
             WHERE name = ?1",
            params![
                role.name.value(),
                role.description,
                role.status.as_str(),
                permissions_json,
            ],
        )?;
        debug!(name = role.name.value(), updated, "Updated role");
        Ok(updated)
    }

    /// Counts users holding a role name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_users_with_role(&self, name: &str) -> Result<i64, PersistenceError> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM users WHERE role = ?1",
            params![name],
            |row| row.get(0),
        )?)
    }

    /// Deletes a role by name.
    ///
    /// The caller enforces the system-role and role-in-use guards first.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_role(&self, name: &str) -> Result<usize, PersistenceError> {
        let deleted: usize = self
            .conn
            .execute("DELETE FROM roles WHERE name = ?1", params![name])?;
        info!(name, deleted, "Deleted role");
        Ok(deleted)
    }
}
