// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Roles and their permission maps.
//!
//! A role carries a mapping from resource to the set of actions it may
//! perform, or the sentinel "all" grant. Role names are normalized to
//! uppercase; the distinguished `SUPERUSER` name bypasses stored permission
//! records entirely.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// A role name, normalized to uppercase for case-insensitive uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleName {
    value: String,
}

impl RoleName {
    /// The distinguished superuser role name.
    pub const SUPERUSER: &'static str = "SUPERUSER";

    /// Creates a role name, normalizing to uppercase.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or whitespace-only.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidRoleName(String::from(
                "Role name cannot be empty",
            )));
        }
        Ok(Self {
            value: trimmed.to_uppercase(),
        })
    }

    /// Returns the normalized name.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns whether this is the distinguished superuser name.
    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.value == Self::SUPERUSER
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Role lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoleStatus {
    /// The role grants its permissions.
    #[default]
    Active,
    /// The role grants nothing; users holding it are denied.
    Inactive,
}

impl RoleStatus {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl FromStr for RoleStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            _ => Err(DomainError::InvalidStatus {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

/// An action a principal may perform on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Insert a new entity.
    Create,
    /// List or retrieve entities.
    Read,
    /// Modify an existing entity, including partial modification.
    Update,
    /// Remove an entity.
    Delete,
}

impl Action {
    /// Returns the string used in stored permission maps.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// A protected resource.
///
/// Resources are a closed enum so that every endpoint must name one at
/// compile time; there is no "untagged endpoint" fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    /// Principal accounts.
    Users,
    /// Roles and their permission maps.
    Roles,
    /// Farmer identity records.
    Farmers,
    /// Farms.
    Farms,
    /// Quotations and written policies.
    Quotations,
    /// Claims.
    Claims,
    /// Subsidy invoices.
    Invoices,
    /// Per-user notifications.
    Notifications,
    /// The mobile synchronization endpoint.
    Sync,
}

impl Resource {
    /// Returns the resource key used in stored permission maps.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Roles => "roles",
            Self::Farmers => "farmers",
            Self::Farms => "farms",
            Self::Quotations => "quotations",
            Self::Claims => "claims",
            Self::Invoices => "invoices",
            Self::Notifications => "notifications",
            Self::Sync => "sync",
        }
    }
}

/// A role's permission map.
///
/// Either the sentinel unconditional grant (`{"all": true}`) or a mapping
/// from resource key to the list of allowed actions. A missing resource key
/// means no access to that resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PermissionSet {
    /// The sentinel grant: unconditional access to every resource and action.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub all: bool,
    /// Per-resource allowed actions, keyed by resource name.
    #[serde(default, flatten)]
    pub grants: BTreeMap<String, Vec<Action>>,
}

impl PermissionSet {
    /// Creates the sentinel unconditional grant.
    #[must_use]
    pub fn grant_all() -> Self {
        Self {
            all: true,
            grants: BTreeMap::new(),
        }
    }

    /// Creates an empty permission set (denies everything).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a grant for a resource.
    #[must_use]
    pub fn with(mut self, resource: Resource, actions: &[Action]) -> Self {
        self.grants
            .insert(resource.as_str().to_string(), actions.to_vec());
        self
    }

    /// Returns whether this permission set allows `action` on `resource`.
    ///
    /// The sentinel grant allows everything; otherwise the action must appear
    /// in the list mapped from the resource key, and a missing key denies.
    #[must_use]
    pub fn allows(&self, resource: Resource, action: Action) -> bool {
        if self.all {
            return true;
        }
        self.grants
            .get(resource.as_str())
            .is_some_and(|actions| actions.contains(&action))
    }
}

/// A role record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    /// Canonical identifier; `None` before first persistence.
    pub role_id: Option<i64>,
    /// The unique, uppercase-normalized role name.
    pub name: RoleName,
    /// Optional description.
    pub description: Option<String>,
    /// Role status; inactive roles grant nothing.
    pub status: RoleStatus,
    /// System roles restrict mutation to description/status and forbid deletion.
    pub is_system_role: bool,
    /// The role's permission map.
    pub permissions: PermissionSet,
}

impl Role {
    /// Returns whether this role is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, RoleStatus::Active)
    }
}
