// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{EntityStatus, Money};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// The settlement state of a subsidy invoice.
///
/// PENDING → APPROVED → SETTLED is forward-only; REJECTED is reachable only
/// from PENDING or APPROVED, never from SETTLED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InvoiceStatus {
    /// Submitted, awaiting approval.
    #[default]
    Pending,
    /// Approved for disbursement.
    Approved,
    /// Disbursed. Terminal.
    Settled,
    /// Declined. Terminal.
    Rejected,
}

impl InvoiceStatus {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Settled => "SETTLED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Checks if a transition from this state to another is valid.
    ///
    /// Valid transitions are:
    /// - Pending → Approved
    /// - Approved → Settled
    /// - Pending | Approved → Rejected
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Approved)
                | (Self::Approved, Self::Settled)
                | (Self::Pending | Self::Approved, Self::Rejected)
        )
    }
}

impl FromStr for InvoiceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "SETTLED" => Ok(Self::Settled),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidStatus {
                kind: "invoice",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A premium subsidy program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsidy {
    /// Canonical identifier; `None` before first persistence.
    pub subsidy_id: Option<i64>,
    /// The owning organization.
    pub organization_id: i64,
    /// Program display name.
    pub name: String,
    /// Subsidy rate in basis points.
    pub rate_basis_points: i64,
    /// Activity status.
    pub status: EntityStatus,
}

/// An invoice for subsidy disbursement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    /// Canonical identifier; `None` before first persistence.
    pub invoice_id: Option<i64>,
    /// The billed organization.
    pub organization_id: i64,
    /// The subsidy program being disbursed.
    pub subsidy_id: i64,
    /// Unique invoice number.
    pub invoice_number: String,
    /// The invoice amount.
    pub amount: Money,
    /// Settlement status.
    pub status: InvoiceStatus,
    /// When the invoice was approved, if ever.
    pub approved_date: Option<OffsetDateTime>,
    /// When the invoice was settled, if ever.
    pub settlement_date: Option<OffsetDateTime>,
    /// The payment reference captured on settlement.
    pub payment_reference: Option<String>,
    /// Why the invoice was rejected, if it was.
    pub rejection_reason: Option<String>,
}
