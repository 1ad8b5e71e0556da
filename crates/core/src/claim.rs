// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The claim lifecycle: OPEN → UNDER_ASSESSMENT → PENDING_PAYMENT → PAID,
//! with REJECTED reachable before approval.
//!
//! Assignment produces both the updated claim and an append-only audit row;
//! the persistence layer commits the pair in one transaction.

use crate::error::CoreError;
use agrisure_domain::{
    Claim, ClaimAssignment, ClaimStatus, DomainError, EntityStatus, Farmer, LossAssessor, Money,
    Quotation, normalize_loss_details, validate_claim_against_quotation, validate_positive_amount,
};
use serde_json::Value;
use time::OffsetDateTime;

/// The result of assigning an assessor: the updated claim plus the immutable
/// assignment audit row to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentOutcome {
    /// The claim with the assessor and UNDER_ASSESSMENT status applied.
    pub claim: Claim,
    /// The audit row recording who assigned whom, and when.
    pub assignment: ClaimAssignment,
}

/// Creates a new claim in OPEN status against a written or paid policy.
///
/// `claim_number` is the pre-generated identifier; uniqueness is enforced at
/// persistence time by constraint and retry. `loss_details` is normalized to
/// a non-null JSON object.
///
/// # Errors
///
/// Returns an error if the farmer is inactive or does not match the
/// quotation, the quotation is not claimable or lacks a policy number, the
/// estimated loss is out of range, or the loss details are malformed.
pub fn create_claim(
    farmer: &Farmer,
    quotation: &Quotation,
    claim_number: String,
    estimated_loss_amount: Money,
    loss_details: Option<&Value>,
) -> Result<Claim, CoreError> {
    validate_claim_against_quotation(farmer, quotation, estimated_loss_amount)?;
    let details = normalize_loss_details(loss_details)?;

    let farmer_id: i64 = farmer
        .farmer_id
        .ok_or(DomainError::MissingField { field: "farmer_id" })?;
    let quotation_id: i64 = quotation.quotation_id.ok_or(DomainError::MissingField {
        field: "quotation_id",
    })?;

    Ok(Claim {
        claim_id: None,
        farmer_id,
        quotation_id,
        loss_assessor_id: None,
        claim_number,
        estimated_loss_amount,
        approved_amount: None,
        status: ClaimStatus::Open,
        approval_date: None,
        loss_details: details,
    })
}

/// Assigns (or re-assigns) a loss assessor to a claim.
///
/// Allowed from OPEN or UNDER_ASSESSMENT; re-assignment appends another
/// audit row rather than rewriting the first.
///
/// # Errors
///
/// Returns an error if the assessor is missing or inactive, the claim has
/// not been persisted, or the claim is past assessment.
pub fn assign_assessor(
    claim: &Claim,
    assessor: &LossAssessor,
    assigned_by: i64,
    now: OffsetDateTime,
) -> Result<AssignmentOutcome, CoreError> {
    let assessor_id: i64 = assessor.assessor_id.ok_or(DomainError::MissingAssessor)?;
    if assessor.status != EntityStatus::Active {
        return Err(CoreError::DomainViolation(DomainError::AssessorNotActive {
            assessor_id,
        }));
    }
    let claim_id: i64 = claim
        .claim_id
        .ok_or(DomainError::MissingField { field: "claim_id" })?;

    if !claim
        .status
        .can_transition_to(ClaimStatus::UnderAssessment)
    {
        return Err(CoreError::StateConflict {
            entity: "claim",
            entity_id: claim_id,
            current: claim.status.to_string(),
            attempted: ClaimStatus::UnderAssessment.as_str(),
        });
    }

    let mut assigned: Claim = claim.clone();
    assigned.loss_assessor_id = Some(assessor_id);
    assigned.status = ClaimStatus::UnderAssessment;

    let assignment: ClaimAssignment = ClaimAssignment {
        assignment_id: None,
        claim_id,
        loss_assessor_id: assessor_id,
        assigned_by,
        assignment_date: now,
    };

    Ok(AssignmentOutcome {
        claim: assigned,
        assignment,
    })
}

/// Approves a claim under assessment, moving it to PENDING_PAYMENT.
///
/// The approved amount must be strictly positive. It is not capped at the
/// estimated loss; assessors may approve above the estimate.
///
/// # Errors
///
/// Returns an error if the amount is not positive, no assessor is assigned,
/// or the claim is not UNDER_ASSESSMENT.
pub fn approve_claim(
    claim: &Claim,
    approved_amount: Money,
    now: OffsetDateTime,
) -> Result<Claim, CoreError> {
    validate_positive_amount("approved_amount", approved_amount)?;
    if claim.loss_assessor_id.is_none() {
        return Err(CoreError::DomainViolation(DomainError::MissingAssessor));
    }

    if !claim.status.can_transition_to(ClaimStatus::PendingPayment) {
        return Err(CoreError::StateConflict {
            entity: "claim",
            entity_id: claim.claim_id.unwrap_or_default(),
            current: claim.status.to_string(),
            attempted: ClaimStatus::PendingPayment.as_str(),
        });
    }

    let mut approved: Claim = claim.clone();
    approved.status = ClaimStatus::PendingPayment;
    approved.approved_amount = Some(approved_amount);
    approved.approval_date = Some(now);
    Ok(approved)
}

/// Rejects a claim. Allowed from OPEN or UNDER_ASSESSMENT only.
///
/// # Errors
///
/// Returns a state conflict if the claim is past assessment.
pub fn reject_claim(claim: &Claim) -> Result<Claim, CoreError> {
    if !claim.status.can_transition_to(ClaimStatus::Rejected) {
        return Err(CoreError::StateConflict {
            entity: "claim",
            entity_id: claim.claim_id.unwrap_or_default(),
            current: claim.status.to_string(),
            attempted: ClaimStatus::Rejected.as_str(),
        });
    }
    let mut rejected: Claim = claim.clone();
    rejected.status = ClaimStatus::Rejected;
    Ok(rejected)
}

/// Records settlement of an approved claim: PENDING_PAYMENT → PAID.
///
/// # Errors
///
/// Returns a state conflict if the claim is not PENDING_PAYMENT.
pub fn mark_claim_paid(claim: &Claim) -> Result<Claim, CoreError> {
    if !claim.status.can_transition_to(ClaimStatus::Paid) {
        return Err(CoreError::StateConflict {
            entity: "claim",
            entity_id: claim.claim_id.unwrap_or_default(),
            current: claim.status.to_string(),
            attempted: ClaimStatus::Paid.as_str(),
        });
    }
    let mut paid: Claim = claim.clone();
    paid.status = ClaimStatus::Paid;
    Ok(paid)
}
