// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Quotation handlers.
//!
//! Each handler validates through the lifecycle engine first, then commits
//! the transition with a compare-and-set write; a lost race is re-read and
//! reported as a state conflict against the fresh status.

use agrisure::{authorize, create_quotation, mark_paid, write_policy};
use agrisure_domain::{
    Action, Farm, Farmer, InsuranceProduct, Money, Quotation, QuotationStatus, Resource,
};
use agrisure_persistence::Store;
use time::OffsetDateTime;

use crate::auth::Principal;
use crate::dto::{CreateQuotationRequest, MarkPaidRequest, QuotationDto};
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

fn quotation_or_not_found(
    store: &Store,
    principal: &Principal,
    quotation_id: i64,
) -> Result<Quotation, ApiError> {
    let quotation: Quotation = store
        .quotation_by_id(quotation_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Quotation {quotation_id}")))?;
    // Quotations carry no organization column; tenancy goes through the
    // farmer. Rows outside the caller's organization read as missing.
    let farmer: Option<Farmer> = store.farmer_by_id(quotation.farmer_id)?;
    match farmer {
        Some(f) if f.organization_id == principal.user.organization_id => Ok(quotation),
        _ => Err(ApiError::NotFound(format!("Quotation {quotation_id}"))),
    }
}

fn conflict_from_current(
    quotation: &Quotation,
    quotation_id: i64,
    attempted: QuotationStatus,
) -> ApiError {
    ApiError::StateConflict {
        entity: "quotation",
        entity_id: quotation_id,
        current: quotation.status.as_str().to_string(),
        attempted: attempted.as_str(),
    }
}

/// Creates a quotation in OPEN status.
///
/// # Errors
///
/// Returns an error if the caller is not permitted, a referenced entity is
/// missing, or validation fails.
pub fn create(
    store: &Store,
    principal: &Principal,
    request: &CreateQuotationRequest,
    now: OffsetDateTime,
) -> Result<QuotationDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Quotations,
        Action::Create,
    )?;

    let farmer: Farmer = farmer_in_org(store, principal, request.farmer_id)?;
    let farm: Farm = store
        .farm_by_id(request.farm_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Farm {}", request.farm_id)))?;
    let product: InsuranceProduct = store
        .product_by_id(request.product_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Product {}", request.product_id)))?;

    let quotation: Quotation = create_quotation(
        &farmer,
        &farm,
        &product,
        Money::from_minor(request.premium_amount),
        Money::from_minor(request.sum_insured),
    )?;
    let quotation_id: i64 = store.insert_quotation(&quotation, now)?;

    Ok(QuotationDto::from(&quotation_or_not_found(
        store,
        principal,
        quotation_id,
    )?))
}

/// Retrieves a quotation.
///
/// # Errors
///
/// Returns an error if the caller is not permitted or the quotation does
/// not exist.
pub fn get(
    store: &Store,
    principal: &Principal,
    quotation_id: i64,
) -> Result<QuotationDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Quotations,
        Action::Read,
    )?;
    Ok(QuotationDto::from(&quotation_or_not_found(
        store,
        principal,
        quotation_id,
    )?))
}

/// Lists a farmer's quotations.
///
/// # Errors
///
/// Returns an error if the caller is not permitted.
pub fn list_for_farmer(
    store: &Store,
    principal: &Principal,
    farmer_id: i64,
) -> Result<Vec<QuotationDto>, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Quotations,
        Action::Read,
    )?;
    let _: Farmer = farmer_in_org(store, principal, farmer_id)?;
    let quotations: Vec<Quotation> = store.list_quotations_for_farmer(farmer_id)?;
    Ok(quotations.iter().map(QuotationDto::from).collect())
}

/// Records a premium payment: OPEN to PAID.
///
/// # Errors
///
/// Returns a state conflict if the quotation is not OPEN, and a validation
/// error if the payment reference is blank.
pub fn mark_as_paid(
    store: &Store,
    principal: &Principal,
    quotation_id: i64,
    request: &MarkPaidRequest,
    now: OffsetDateTime,
) -> Result<QuotationDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Quotations,
        Action::Update,
    )?;

    let quotation: Quotation = quotation_or_not_found(store, principal, quotation_id)?;
    let paid: Quotation = mark_paid(&quotation, &request.payment_reference, now)?;
    let reference: &str = paid.payment_reference.as_deref().unwrap_or_default();

    if !store.commit_quotation_paid(quotation_id, reference, now)? {
        let fresh: Quotation = quotation_or_not_found(store, principal, quotation_id)?;
        return Err(conflict_from_current(
            &fresh,
            quotation_id,
            QuotationStatus::Paid,
        ));
    }
    Ok(QuotationDto::from(&quotation_or_not_found(
        store,
        principal,
        quotation_id,
    )?))
}

/// Writes the policy: PAID to WRITTEN with a permanent policy number.
///
/// Notifies the acting user that the policy was issued.
///
/// # Errors
///
/// Returns a state conflict if the quotation is not PAID or already has a
/// policy number.
pub fn write(
    store: &Store,
    principal: &Principal,
    quotation_id: i64,
    now: OffsetDateTime,
) -> Result<QuotationDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Quotations,
        Action::Update,
    )?;

    let quotation: Quotation = quotation_or_not_found(store, principal, quotation_id)?;
    let written: Quotation = write_policy(&quotation, now.date())?;
    let policy_number: &str = written.policy_number.as_deref().unwrap_or_default();

    if !store.commit_policy_written(quotation_id, policy_number, now)? {
        let fresh: Quotation = quotation_or_not_found(store, principal, quotation_id)?;
        return Err(conflict_from_current(
            &fresh,
            quotation_id,
            QuotationStatus::Written,
        ));
    }

    if let Some(user_id) = principal.user.user_id {
        store.insert_notification(
            user_id,
            "Policy written",
            &format!("Policy {policy_number} was issued for quotation {quotation_id}"),
        )?;
    }

    Ok(QuotationDto::from(&quotation_or_not_found(
        store,
        principal,
        quotation_id,
    )?))
}
