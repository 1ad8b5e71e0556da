// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{EntityStatus, Money};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// The lifecycle state of a quotation.
///
/// Transitions are strictly forward: OPEN → PAID → WRITTEN. No state is ever
/// skipped and no backward transition exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum QuotationStatus {
    /// Initial state: an offer awaiting payment.
    #[default]
    Open,
    /// Premium received; awaiting policy issuance.
    Paid,
    /// Policy issued; `policy_number` is permanently set.
    Written,
}

impl QuotationStatus {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Paid => "PAID",
            Self::Written => "WRITTEN",
        }
    }

    /// Checks if a transition from this state to another is valid.
    ///
    /// Valid transitions are:
    /// - Open → Paid
    /// - Paid → Written
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::Paid) | (Self::Paid, Self::Written)
        )
    }
}

impl FromStr for QuotationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "PAID" => Ok(Self::Paid),
            "WRITTEN" => Ok(Self::Written),
            _ => Err(DomainError::InvalidStatus {
                kind: "quotation",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An insurance product a quotation is priced against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsuranceProduct {
    /// Canonical identifier; `None` before first persistence.
    pub product_id: Option<i64>,
    /// Product display name.
    pub name: String,
    /// Activity status.
    pub status: EntityStatus,
}

/// A pending insurance offer that becomes the policy once written.
///
/// `policy_number` is null until the quotation reaches WRITTEN, then
/// permanently set and never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quotation {
    /// Canonical identifier; `None` before first persistence.
    pub quotation_id: Option<i64>,
    /// The insured farmer.
    pub farmer_id: i64,
    /// The insured farm; must belong to the farmer.
    pub farm_id: i64,
    /// The insurance product.
    pub product_id: i64,
    /// Permanent policy number, set on transition to WRITTEN.
    pub policy_number: Option<String>,
    /// The premium amount; strictly positive.
    pub premium_amount: Money,
    /// The sum insured; strictly positive and the cap for claims.
    pub sum_insured: Money,
    /// Lifecycle status.
    pub status: QuotationStatus,
    /// When the premium was received.
    pub payment_date: Option<OffsetDateTime>,
    /// The external payment reference captured on `mark_paid`.
    pub payment_reference: Option<String>,
}

impl Quotation {
    /// Returns whether a claim may be filed against this quotation.
    ///
    /// Claims require a written or paid policy.
    #[must_use]
    pub const fn is_claimable(&self) -> bool {
        matches!(self.status, QuotationStatus::Written | QuotationStatus::Paid)
    }
}
