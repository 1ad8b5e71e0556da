// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::role::RoleName;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// A money amount in minor units (cents).
///
/// All amounts in the system are non-negative; fields that require a strictly
/// positive amount (premium, sum insured, estimated loss) are validated at the
/// point of use.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a money amount from minor units.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns whether the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign: &str = if self.0 < 0 { "-" } else { "" };
        let abs: i64 = self.0.abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

/// Activity status shared by farmers, farms, assessors, and products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EntityStatus {
    /// The entity is active and usable.
    #[default]
    Active,
    /// The entity has been deactivated.
    Inactive,
}

impl EntityStatus {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl FromStr for EntityStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            _ => Err(DomainError::InvalidStatus {
                kind: "entity",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account status for principals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UserStatus {
    /// The account may authenticate.
    #[default]
    Active,
    /// The account has been deactivated by an administrator.
    Inactive,
    /// The account is locked after repeated failed logins.
    Locked,
}

impl UserStatus {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Locked => "LOCKED",
        }
    }
}

impl FromStr for UserStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            "LOCKED" => Ok(Self::Locked),
            _ => Err(DomainError::InvalidStatus {
                kind: "user",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tenant organization.
///
/// Organizations are the scoping boundary for most business entities. They are
/// soft-deleted only; rows are retained for referential integrity. The
/// reserved `DEFAULT` code is the fallback tenant for self-registering users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    /// Canonical identifier; `None` before first persistence.
    pub organization_id: Option<i64>,
    /// Unique organization code (e.g. "DEFAULT").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Soft-delete flag; deleted organizations are excluded from default queries.
    pub is_deleted: bool,
}

impl Organization {
    /// The reserved code of the fallback tenant.
    pub const DEFAULT_CODE: &'static str = "DEFAULT";
}

/// An authenticated principal.
///
/// The role is held as a value-type name and validated against the role table
/// on every write; the permission evaluator resolves the role record per
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Canonical identifier; `None` before first persistence.
    pub user_id: Option<i64>,
    /// Login email, unique.
    pub email: String,
    /// Display name.
    pub name: String,
    /// The user's role name.
    pub role: RoleName,
    /// The organization this user belongs to.
    pub organization_id: i64,
    /// Account status.
    pub status: UserStatus,
    /// Consecutive failed login attempts since the last success.
    pub failed_login_attempts: i64,
    /// If set, the account is locked until this instant.
    pub locked_until: Option<OffsetDateTime>,
}

/// An insured party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Farmer {
    /// Canonical identifier; `None` before first persistence.
    pub farmer_id: Option<i64>,
    /// The owning organization.
    pub organization_id: i64,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// National identity number, globally unique.
    pub id_number: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Activity status.
    pub status: EntityStatus,
}

impl Farmer {
    /// Returns the farmer's full display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A farm owned by a farmer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Farm {
    /// Canonical identifier; `None` before first persistence.
    pub farm_id: Option<i64>,
    /// The owning farmer.
    pub farmer_id: i64,
    /// Farm display name.
    pub name: String,
    /// Farm size in hundredths of the unit of measure.
    pub size: i64,
    /// The unit of measure for the size (e.g. "HA").
    pub unit_of_measure: String,
    /// Activity status.
    pub status: EntityStatus,
}

/// A user alert with a read flag.
///
/// Marking an already-read notification as read is a no-op; `read_at` is
/// never overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Canonical identifier; `None` before first persistence.
    pub notification_id: Option<i64>,
    /// The recipient user.
    pub user_id: i64,
    /// Short title.
    pub title: String,
    /// Message body.
    pub body: String,
    /// Whether the notification has been read.
    pub is_read: bool,
    /// When the notification was read, if ever.
    pub read_at: Option<OffsetDateTime>,
}
