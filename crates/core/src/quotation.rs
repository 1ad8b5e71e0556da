// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The quotation lifecycle: OPEN → PAID → WRITTEN.
//!
//! Transitions are pure: each function takes the current entity and returns
//! the updated one without touching storage. The persistence layer commits
//! the result with a compare-and-set update on the prior status, so a lost
//! race surfaces as zero affected rows rather than a double transition.

use crate::error::CoreError;
use agrisure_domain::{
    DomainError, Farm, Farmer, InsuranceProduct, Money, Quotation, QuotationStatus, policy_number,
    validate_payment_reference, validate_quotation_inputs,
};
use time::{Date, OffsetDateTime};

/// Creates a new quotation in OPEN status.
///
/// # Errors
///
/// Returns an error if the premium or sum insured is not strictly positive,
/// or if the farm does not belong to the farmer.
pub fn create_quotation(
    farmer: &Farmer,
    farm: &Farm,
    product: &InsuranceProduct,
    premium_amount: Money,
    sum_insured: Money,
) -> Result<Quotation, CoreError> {
    validate_quotation_inputs(farmer, farm, premium_amount, sum_insured)?;

    let farmer_id: i64 = farmer
        .farmer_id
        .ok_or(DomainError::MissingField { field: "farmer_id" })?;
    let farm_id: i64 = farm
        .farm_id
        .ok_or(DomainError::MissingField { field: "farm_id" })?;
    let product_id: i64 = product.product_id.ok_or(DomainError::MissingField {
        field: "product_id",
    })?;

    Ok(Quotation {
        quotation_id: None,
        farmer_id,
        farm_id,
        product_id,
        policy_number: None,
        premium_amount,
        sum_insured,
        status: QuotationStatus::Open,
        payment_date: None,
        payment_reference: None,
    })
}

/// Records premium payment on an OPEN quotation.
///
/// Strictly OPEN → PAID; a quotation that is already PAID or WRITTEN is a
/// state conflict, not a silent no-op.
///
/// # Errors
///
/// Returns an error if the payment reference is empty or the quotation is
/// not OPEN.
pub fn mark_paid(
    quotation: &Quotation,
    payment_reference: &str,
    now: OffsetDateTime,
) -> Result<Quotation, CoreError> {
    validate_payment_reference(payment_reference)?;

    if !quotation.status.can_transition_to(QuotationStatus::Paid) {
        return Err(CoreError::StateConflict {
            entity: "quotation",
            entity_id: quotation.quotation_id.unwrap_or_default(),
            current: quotation.status.to_string(),
            attempted: QuotationStatus::Paid.as_str(),
        });
    }

    let mut paid: Quotation = quotation.clone();
    paid.status = QuotationStatus::Paid;
    paid.payment_date = Some(now);
    paid.payment_reference = Some(payment_reference.trim().to_string());
    Ok(paid)
}

/// Writes the policy for a PAID quotation, issuing its permanent number.
///
/// Requires PAID status and no existing policy number; the number is
/// `POL-YYYYMMDD-{quotation_id}` and is never changed or reused once set.
///
/// # Errors
///
/// Returns an error if the quotation has not been persisted, is not PAID,
/// or already carries a policy number.
pub fn write_policy(quotation: &Quotation, today: Date) -> Result<Quotation, CoreError> {
    let quotation_id: i64 = quotation.quotation_id.ok_or(DomainError::MissingField {
        field: "quotation_id",
    })?;

    if !quotation.status.can_transition_to(QuotationStatus::Written)
        || quotation.policy_number.is_some()
    {
        return Err(CoreError::StateConflict {
            entity: "quotation",
            entity_id: quotation_id,
            current: quotation.status.to_string(),
            attempted: QuotationStatus::Written.as_str(),
        });
    }

    let mut written: Quotation = quotation.clone();
    written.status = QuotationStatus::Written;
    written.policy_number = Some(policy_number(today, quotation_id));
    Ok(written)
}
