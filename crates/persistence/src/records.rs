// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Raw row shapes and their conversions back into domain values.
//!
//! Row mapping closures stay dumb (strings and integers only); parsing into
//! domain enums and timestamps happens afterwards so a bad stored value
//! surfaces as `PersistenceError::InvalidRow` instead of a panic.

use agrisure_domain::{
    Claim, ClaimStatus, EntityStatus, Farm, Farmer, Invoice, InvoiceStatus, LossAssessor,
    LossDetails, Money, Notification, PermissionSet, Quotation, QuotationStatus, Role, RoleName,
    RoleStatus, User, UserStatus,
};
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::PersistenceError;

/// Formats a timestamp as the RFC 3339 string stored in TEXT columns.
///
/// All stored timestamps are UTC, so lexicographic comparison in SQL matches
/// chronological order.
pub(crate) fn format_timestamp(ts: OffsetDateTime) -> Result<String, PersistenceError> {
    ts.format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a stored RFC 3339 timestamp.
pub(crate) fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .map_err(|e| PersistenceError::InvalidRow(format!("bad timestamp '{raw}': {e}")))
}

fn parse_optional_timestamp(
    raw: Option<String>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    raw.as_deref().map(parse_timestamp).transpose()
}

/// A user row together with its credential hash.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// The domain user.
    pub user: User,
    /// The stored bcrypt hash.
    pub password_hash: String,
}

pub(crate) struct UserRow {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: String,
    pub organization_id: i64,
    pub status: String,
    pub failed_login_attempts: i64,
    pub locked_until: Option<String>,
}

impl UserRow {
    pub(crate) fn into_record(self) -> Result<UserRecord, PersistenceError> {
        Ok(UserRecord {
            user: User {
                user_id: Some(self.user_id),
                email: self.email,
                name: self.name,
                role: RoleName::new(&self.role)?,
                organization_id: self.organization_id,
                status: UserStatus::from_str(&self.status)?,
                failed_login_attempts: self.failed_login_attempts,
                locked_until: parse_optional_timestamp(self.locked_until)?,
            },
            password_hash: self.password_hash,
        })
    }
}

/// A session row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// The session identifier.
    pub session_id: i64,
    /// The opaque bearer token.
    pub session_token: String,
    /// The owning user.
    pub user_id: i64,
    /// Expiry as a stored RFC 3339 string.
    pub expires_at: String,
}

pub(crate) struct RoleRow {
    pub role_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub is_system_role: bool,
    pub permissions_json: String,
}

impl RoleRow {
    pub(crate) fn into_domain(self) -> Result<Role, PersistenceError> {
        let permissions: PermissionSet = serde_json::from_str(&self.permissions_json)?;
        Ok(Role {
            role_id: Some(self.role_id),
            name: RoleName::new(&self.name)?,
            description: self.description,
            status: RoleStatus::from_str(&self.status)?,
            is_system_role: self.is_system_role,
            permissions,
        })
    }
}

pub(crate) struct FarmerRow {
    pub farmer_id: i64,
    pub organization_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub id_number: String,
    pub phone_number: String,
    pub status: String,
}

impl FarmerRow {
    pub(crate) fn into_domain(self) -> Result<Farmer, PersistenceError> {
        Ok(Farmer {
            farmer_id: Some(self.farmer_id),
            organization_id: self.organization_id,
            first_name: self.first_name,
            last_name: self.last_name,
            id_number: self.id_number,
            phone_number: self.phone_number,
            status: EntityStatus::from_str(&self.status)?,
        })
    }
}

pub(crate) struct FarmRow {
    pub farm_id: i64,
    pub farmer_id: i64,
    pub name: String,
    pub size: i64,
    pub unit_of_measure: String,
    pub status: String,
}

impl FarmRow {
    pub(crate) fn into_domain(self) -> Result<Farm, PersistenceError> {
        Ok(Farm {
            farm_id: Some(self.farm_id),
            farmer_id: self.farmer_id,
            name: self.name,
            size: self.size,
            unit_of_measure: self.unit_of_measure,
            status: EntityStatus::from_str(&self.status)?,
        })
    }
}

pub(crate) struct AssessorRow {
    pub assessor_id: i64,
    pub user_id: i64,
    pub organization_id: i64,
    pub status: String,
}

impl AssessorRow {
    pub(crate) fn into_domain(self) -> Result<LossAssessor, PersistenceError> {
        Ok(LossAssessor {
            assessor_id: Some(self.assessor_id),
            user_id: self.user_id,
            organization_id: self.organization_id,
            status: EntityStatus::from_str(&self.status)?,
        })
    }
}

pub(crate) struct QuotationRow {
    pub quotation_id: i64,
    pub farmer_id: i64,
    pub farm_id: i64,
    pub product_id: i64,
    pub policy_number: Option<String>,
    pub premium_amount: i64,
    pub sum_insured: i64,
    pub status: String,
    pub payment_date: Option<String>,
    pub payment_reference: Option<String>,
}

impl QuotationRow {
    pub(crate) fn into_domain(self) -> Result<Quotation, PersistenceError> {
        Ok(Quotation {
            quotation_id: Some(self.quotation_id),
            farmer_id: self.farmer_id,
            farm_id: self.farm_id,
            product_id: self.product_id,
            policy_number: self.policy_number,
            premium_amount: Money::from_minor(self.premium_amount),
            sum_insured: Money::from_minor(self.sum_insured),
            status: QuotationStatus::from_str(&self.status)?,
            payment_date: parse_optional_timestamp(self.payment_date)?,
            payment_reference: self.payment_reference,
        })
    }
}

pub(crate) struct ClaimRow {
    pub claim_id: i64,
    pub farmer_id: i64,
    pub quotation_id: i64,
    pub loss_assessor_id: Option<i64>,
    pub claim_number: String,
    pub estimated_loss_amount: i64,
    pub approved_amount: Option<i64>,
    pub status: String,
    pub approval_date: Option<String>,
    pub loss_details_json: String,
}

impl ClaimRow {
    pub(crate) fn into_domain(self) -> Result<Claim, PersistenceError> {
        let loss_details: LossDetails = serde_json::from_str(&self.loss_details_json)?;
        Ok(Claim {
            claim_id: Some(self.claim_id),
            farmer_id: self.farmer_id,
            quotation_id: self.quotation_id,
            loss_assessor_id: self.loss_assessor_id,
            claim_number: self.claim_number,
            estimated_loss_amount: Money::from_minor(self.estimated_loss_amount),
            approved_amount: self.approved_amount.map(Money::from_minor),
            status: ClaimStatus::from_str(&self.status)?,
            approval_date: parse_optional_timestamp(self.approval_date)?,
            loss_details,
        })
    }
}

pub(crate) struct InvoiceRow {
    pub invoice_id: i64,
    pub organization_id: i64,
    pub subsidy_id: i64,
    pub invoice_number: String,
    pub amount: i64,
    pub status: String,
    pub approved_date: Option<String>,
    pub settlement_date: Option<String>,
    pub payment_reference: Option<String>,
    pub rejection_reason: Option<String>,
}

impl InvoiceRow {
    pub(crate) fn into_domain(self) -> Result<Invoice, PersistenceError> {
        Ok(Invoice {
            invoice_id: Some(self.invoice_id),
            organization_id: self.organization_id,
            subsidy_id: self.subsidy_id,
            invoice_number: self.invoice_number,
            amount: Money::from_minor(self.amount),
            status: InvoiceStatus::from_str(&self.status)?,
            approved_date: parse_optional_timestamp(self.approved_date)?,
            settlement_date: parse_optional_timestamp(self.settlement_date)?,
            payment_reference: self.payment_reference,
            rejection_reason: self.rejection_reason,
        })
    }
}

pub(crate) struct NotificationRow {
    pub notification_id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub read_at: Option<String>,
}

impl NotificationRow {
    pub(crate) fn into_domain(self) -> Result<Notification, PersistenceError> {
        Ok(Notification {
            notification_id: Some(self.notification_id),
            user_id: self.user_id,
            title: self.title,
            body: self.body,
            is_read: self.is_read,
            read_at: parse_optional_timestamp(self.read_at)?,
        })
    }
}

/// A per-status aggregate used by the statistics endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTotal {
    /// The status bucket.
    pub status: String,
    /// The number of rows in the bucket.
    pub count: i64,
    /// The summed amount for the bucket, in minor units.
    pub total_amount: i64,
}
