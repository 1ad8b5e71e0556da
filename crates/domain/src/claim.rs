// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{EntityStatus, Money};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use time::OffsetDateTime;

/// The schemaless loss document attached to a claim.
///
/// Always a JSON object; never null in any output representation.
pub type LossDetails = Map<String, Value>;

/// The lifecycle state of a claim.
///
/// Forward progression via explicit actions only:
/// OPEN → UNDER_ASSESSMENT → PENDING_PAYMENT → PAID.
/// REJECTED is reachable from OPEN or UNDER_ASSESSMENT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ClaimStatus {
    /// Filed, awaiting assessor assignment.
    #[default]
    Open,
    /// An assessor has been assigned.
    UnderAssessment,
    /// Approved; awaiting settlement by the payment collaborator.
    PendingPayment,
    /// Settled. Terminal.
    Paid,
    /// Declined. Terminal.
    Rejected,
}

impl ClaimStatus {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::UnderAssessment => "UNDER_ASSESSMENT",
            Self::PendingPayment => "PENDING_PAYMENT",
            Self::Paid => "PAID",
            Self::Rejected => "REJECTED",
        }
    }

    /// Checks if a transition from this state to another is valid.
    ///
    /// Valid transitions are:
    /// - Open → `UnderAssessment` (assessor assignment)
    /// - `UnderAssessment` → `UnderAssessment` (re-assignment)
    /// - `UnderAssessment` → `PendingPayment` (approval)
    /// - `PendingPayment` → Paid (external settlement)
    /// - Open | `UnderAssessment` → Rejected
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open | Self::UnderAssessment, Self::UnderAssessment)
                | (Self::UnderAssessment, Self::PendingPayment)
                | (Self::PendingPayment, Self::Paid)
                | (Self::Open | Self::UnderAssessment, Self::Rejected)
        )
    }
}

impl FromStr for ClaimStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "UNDER_ASSESSMENT" => Ok(Self::UnderAssessment),
            "PENDING_PAYMENT" => Ok(Self::PendingPayment),
            "PAID" => Ok(Self::Paid),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidStatus {
                kind: "claim",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user empowered to evaluate claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LossAssessor {
    /// Canonical identifier; `None` before first persistence.
    pub assessor_id: Option<i64>,
    /// The backing user account.
    pub user_id: i64,
    /// The owning organization.
    pub organization_id: i64,
    /// Activity status.
    pub status: EntityStatus,
}

/// A loss report filed against a written or paid policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    /// Canonical identifier; `None` before first persistence.
    pub claim_id: Option<i64>,
    /// The claiming farmer; must match the quotation's farmer.
    pub farmer_id: i64,
    /// The policy the loss is claimed against.
    pub quotation_id: i64,
    /// The assigned assessor, if any.
    pub loss_assessor_id: Option<i64>,
    /// Globally unique claim number (`CLM-YYYYMMDD-NNNNNN`), system-generated
    /// when absent.
    pub claim_number: String,
    /// The estimated loss; strictly positive and capped by the quotation's
    /// sum insured.
    pub estimated_loss_amount: Money,
    /// Set only on approval.
    pub approved_amount: Option<Money>,
    /// Lifecycle status.
    pub status: ClaimStatus,
    /// When the claim was approved, if ever.
    pub approval_date: Option<OffsetDateTime>,
    /// The schemaless loss document; normalized to a non-null object.
    pub loss_details: LossDetails,
}

/// An append-only audit record of an assessor assignment event.
///
/// Never updated or deleted; re-assigning a claim appends another row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimAssignment {
    /// Canonical identifier; `None` before first persistence.
    pub assignment_id: Option<i64>,
    /// The assigned claim.
    pub claim_id: i64,
    /// The assigned assessor.
    pub loss_assessor_id: i64,
    /// The user who performed the assignment.
    pub assigned_by: i64,
    /// When the assignment happened.
    pub assignment_date: OffsetDateTime,
}

/// Normalizes an inbound loss-details value to a non-null JSON object.
///
/// - absent, null, or an empty string → an empty object
/// - an object → unchanged
/// - a non-empty string → parsed as JSON, which must be an object
///
/// Malformed JSON and non-object values are rejected rather than wrapped;
/// loss details are structured data, not prose.
///
/// # Errors
///
/// Returns `DomainError::InvalidLossDetails` if a string fails to parse as
/// JSON, or if the value (parsed or direct) is not a JSON object.
pub fn normalize_loss_details(value: Option<&Value>) -> Result<LossDetails, DomainError> {
    match value {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(Value::String(raw)) => {
            if raw.trim().is_empty() {
                return Ok(Map::new());
            }
            let parsed: Value = serde_json::from_str(raw)
                .map_err(|e| DomainError::InvalidLossDetails(format!("Invalid JSON: {e}")))?;
            match parsed {
                Value::Object(map) => Ok(map),
                _ => Err(DomainError::InvalidLossDetails(String::from(
                    "loss_details must be a JSON object",
                ))),
            }
        }
        Some(_) => Err(DomainError::InvalidLossDetails(String::from(
            "loss_details must be a JSON object",
        ))),
    }
}
