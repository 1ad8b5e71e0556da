// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Claim handlers.

use agrisure::{
    AssignmentOutcome, approve_claim, assign_assessor, create_claim, mark_claim_paid, reject_claim,
};
use agrisure::authorize;
use agrisure_domain::{
    Action, Claim, ClaimStatus, Farmer, LossAssessor, Money, Quotation, Resource,
};
use agrisure_persistence::Store;
use time::OffsetDateTime;

use crate::auth::Principal;
use crate::dto::{ApproveClaimRequest, AssignAssessorRequest, ClaimDto, CreateClaimRequest,
    StatusTotalDto};
use crate::error::ApiError;

fn farmer_in_org(store: &Store, principal: &Principal, farmer_id: i64) -> Result<Farmer, ApiError> {
    let farmer: Farmer = store
        .farmer_by_id(farmer_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Farmer {farmer_id}")))?;
    if farmer.organization_id != principal.user.organization_id {
        return Err(ApiError::NotFound(format!("Farmer {farmer_id}")));
    }
    Ok(farmer)
}

fn claim_or_not_found(
    store: &Store,
    principal: &Principal,
    claim_id: i64,
) -> Result<Claim, ApiError> {
    let claim: Claim = store
        .claim_by_id(claim_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Claim {claim_id}")))?;
    // Tenancy goes through the filing farmer; claims from another
    // organization read as missing.
    let farmer: Option<Farmer> = store.farmer_by_id(claim.farmer_id)?;
    match farmer {
        Some(f) if f.organization_id == principal.user.organization_id => Ok(claim),
        _ => Err(ApiError::NotFound(format!("Claim {claim_id}"))),
    }
}

fn conflict_from_current(claim: &Claim, claim_id: i64, attempted: ClaimStatus) -> ApiError {
    ApiError::StateConflict {
        entity: "claim",
        entity_id: claim_id,
        current: claim.status.as_str().to_string(),
        attempted: attempted.as_str(),
    }
}

/// Files a claim against a written or paid policy.
///
/// The claim number is generated under today's date; collisions with
/// concurrent filers are retried inside the store.
///
/// # Errors
///
/// Returns an error if the caller is not permitted, a referenced entity is
/// missing, or validation fails.
pub fn create(
    store: &Store,
    principal: &Principal,
    request: &CreateClaimRequest,
    now: OffsetDateTime,
) -> Result<ClaimDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Claims,
        Action::Create,
    )?;

    let farmer: Farmer = farmer_in_org(store, principal, request.farmer_id)?;
    let quotation: Quotation = store
        .quotation_by_id(request.quotation_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Quotation {}", request.quotation_id)))?;

    // The number is derived at insert time; the engine only validates here.
    let claim: Claim = create_claim(
        &farmer,
        &quotation,
        String::new(),
        Money::from_minor(request.estimated_loss_amount),
        request.loss_details.as_ref(),
    )?;

    let (claim_id, _) = store.file_claim(&claim, now.date(), now)?;
    Ok(ClaimDto::from(&claim_or_not_found(
        store, principal, claim_id,
    )?))
}

/// Retrieves a claim.
///
/// # Errors
///
/// Returns an error if the caller is not permitted or the claim does not
/// exist.
pub fn get(store: &Store, principal: &Principal, claim_id: i64) -> Result<ClaimDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Claims,
        Action::Read,
    )?;
    Ok(ClaimDto::from(&claim_or_not_found(
        store, principal, claim_id,
    )?))
}

/// Lists a farmer's claims.
///
/// # Errors
///
/// Returns an error if the caller is not permitted.
pub fn list_for_farmer(
    store: &Store,
    principal: &Principal,
    farmer_id: i64,
) -> Result<Vec<ClaimDto>, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Claims,
        Action::Read,
    )?;
    let _: Farmer = farmer_in_org(store, principal, farmer_id)?;
    let claims: Vec<Claim> = store.list_claims_for_farmer(farmer_id)?;
    Ok(claims.iter().map(ClaimDto::from).collect())
}

/// Assigns (or re-assigns) a loss assessor to a claim.
///
/// One transaction moves the claim to UNDER_ASSESSMENT and appends the
/// immutable assignment audit row.
///
/// # Errors
///
/// Returns an error if the caller is not permitted, the assessor is missing
/// or inactive, or the claim is past assessment.
pub fn assign(
    store: &mut Store,
    principal: &Principal,
    claim_id: i64,
    request: &AssignAssessorRequest,
    now: OffsetDateTime,
) -> Result<ClaimDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Claims,
        Action::Update,
    )?;
    let assigned_by: i64 = principal
        .user
        .user_id
        .ok_or_else(|| ApiError::Internal("principal without id".to_string()))?;

    let claim: Claim = claim_or_not_found(store, principal, claim_id)?;
    let assessor: LossAssessor = store
        .assessor_by_id(request.assessor_id)?
        .filter(|a| a.organization_id == principal.user.organization_id)
        .ok_or_else(|| ApiError::NotFound(format!("Assessor {}", request.assessor_id)))?;

    let outcome: AssignmentOutcome = assign_assessor(&claim, &assessor, assigned_by, now)?;

    if !store.commit_assignment(&outcome.assignment)? {
        let fresh: Claim = claim_or_not_found(store, principal, claim_id)?;
        return Err(conflict_from_current(
            &fresh,
            claim_id,
            ClaimStatus::UnderAssessment,
        ));
    }
    Ok(ClaimDto::from(&claim_or_not_found(
        store, principal, claim_id,
    )?))
}

/// Approves a claim: UNDER_ASSESSMENT to PENDING_PAYMENT.
///
/// Notifies the assessor's user account of the approval.
///
/// # Errors
///
/// Returns an error if the caller is not permitted, the amount is not
/// positive, no assessor is assigned, or the claim is not under assessment.
pub fn approve(
    store: &Store,
    principal: &Principal,
    claim_id: i64,
    request: &ApproveClaimRequest,
    now: OffsetDateTime,
) -> Result<ClaimDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Claims,
        Action::Update,
    )?;

    let claim: Claim = claim_or_not_found(store, principal, claim_id)?;
    let approved: Claim = approve_claim(&claim, Money::from_minor(request.approved_amount), now)?;
    let amount: i64 = request.approved_amount;

    if !store.commit_claim_approved(claim_id, amount, now)? {
        let fresh: Claim = claim_or_not_found(store, principal, claim_id)?;
        return Err(conflict_from_current(
            &fresh,
            claim_id,
            ClaimStatus::PendingPayment,
        ));
    }

    if let Some(assessor_id) = approved.loss_assessor_id
        && let Some(assessor) = store.assessor_by_id(assessor_id)?
    {
        store.insert_notification(
            assessor.user_id,
            "Claim approved",
            &format!("Claim {} was approved", approved.claim_number),
        )?;
    }

    Ok(ClaimDto::from(&claim_or_not_found(
        store, principal, claim_id,
    )?))
}

/// Rejects a claim. Allowed from OPEN or UNDER_ASSESSMENT only.
///
/// # Errors
///
/// Returns an error if the caller is not permitted or the claim is past
/// assessment.
pub fn reject(
    store: &Store,
    principal: &Principal,
    claim_id: i64,
    now: OffsetDateTime,
) -> Result<ClaimDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Claims,
        Action::Update,
    )?;

    let claim: Claim = claim_or_not_found(store, principal, claim_id)?;
    let _: Claim = reject_claim(&claim)?;

    if !store.commit_claim_rejected(claim_id, now)? {
        let fresh: Claim = claim_or_not_found(store, principal, claim_id)?;
        return Err(conflict_from_current(&fresh, claim_id, ClaimStatus::Rejected));
    }
    Ok(ClaimDto::from(&claim_or_not_found(
        store, principal, claim_id,
    )?))
}

/// Records payout of an approved claim: PENDING_PAYMENT to PAID.
///
/// # Errors
///
/// Returns an error if the caller is not permitted or the claim is not
/// pending payment.
pub fn mark_paid(
    store: &Store,
    principal: &Principal,
    claim_id: i64,
    now: OffsetDateTime,
) -> Result<ClaimDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Claims,
        Action::Update,
    )?;

    let claim: Claim = claim_or_not_found(store, principal, claim_id)?;
    let _: Claim = mark_claim_paid(&claim)?;

    if !store.commit_claim_paid(claim_id, now)? {
        let fresh: Claim = claim_or_not_found(store, principal, claim_id)?;
        return Err(conflict_from_current(&fresh, claim_id, ClaimStatus::Paid));
    }
    Ok(ClaimDto::from(&claim_or_not_found(
        store, principal, claim_id,
    )?))
}

/// Aggregates the caller's organization's claims by status.
///
/// # Errors
///
/// Returns an error if the caller is not permitted.
pub fn statistics(store: &Store, principal: &Principal) -> Result<Vec<StatusTotalDto>, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Claims,
        Action::Read,
    )?;
    let totals = store.claim_statistics(principal.user.organization_id)?;
    Ok(totals
        .into_iter()
        .map(|t| StatusTotalDto {
            status: t.status,
            count: t.count,
            total_amount: t.total_amount,
        })
        .collect())
}
