// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use agrisure::system_roles;
use agrisure_domain::{Organization, Role};
use rusqlite::params;
use tracing::info;

use crate::Store;
use crate::error::PersistenceError;

impl Store {
    /// Installs the default organization and the built-in system roles.
    ///
    /// Idempotent: existing rows are left untouched so role administration
    /// changes survive restarts.
    ///
    /// # Errors
    ///
    /// Returns an error if seeding fails.
    pub fn seed_defaults(&self) -> Result<(), PersistenceError> {
        let inserted: usize = self.conn.execute(
            "INSERT OR IGNORE INTO organizations (code, name) VALUES (?1, ?2)",
            params![Organization::DEFAULT_CODE, "Default Organization"],
        )?;
        if inserted > 0 {
            info!(code = Organization::DEFAULT_CODE, "Seeded default organization");
        }

        let mut seeded: usize = 0;
        for role in system_roles() {
            let permissions_json: String = serde_json::to_string(&role.permissions)?;
            seeded += self.conn.execute(
                "INSERT OR IGNORE INTO roles
                     (name, description, status, is_system_role, permissions_json)
                 VALUES (?1, ?2, ?3, 1, ?4)",
                params![
                    role.name.value(),
                    role.description,
                    role.status.as_str(),
                    permissions_json,
                ],
            )?;
        }
        if seeded > 0 {
            info!(seeded, "Seeded system roles");
        }

        Ok(())
    }

    /// Returns the reserved DEFAULT organization.
    ///
    /// # Errors
    ///
    /// Returns an error if it has not been seeded.
    pub fn default_organization(&self) -> Result<Organization, PersistenceError> {
        self.organization_by_code(Organization::DEFAULT_CODE)?
            .ok_or_else(|| PersistenceError::NotFound("Default organization".to_string()))
    }

    /// Returns the seeded system roles currently installed.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_system_roles(&self) -> Result<Vec<Role>, PersistenceError> {
        self.list_roles()
            .map(|roles| roles.into_iter().filter(|r| r.is_system_role).collect())
    }
}
