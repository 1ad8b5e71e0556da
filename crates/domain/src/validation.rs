// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cross-field validation rules shared by the lifecycle engines.

use crate::error::DomainError;
use crate::quotation::Quotation;
use crate::types::{EntityStatus, Farm, Farmer, Money};

/// Validates that a money amount is strictly positive.
///
/// # Errors
///
/// Returns `DomainError::NonPositiveAmount` naming the field otherwise.
pub fn validate_positive_amount(field: &'static str, amount: Money) -> Result<(), DomainError> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(DomainError::NonPositiveAmount { field, amount })
    }
}

/// Validates that a payment reference is present and non-empty.
///
/// # Errors
///
/// Returns `DomainError::MissingPaymentReference` otherwise.
pub fn validate_payment_reference(reference: &str) -> Result<(), DomainError> {
    if reference.trim().is_empty() {
        Err(DomainError::MissingPaymentReference)
    } else {
        Ok(())
    }
}

/// Validates the inputs for quotation creation.
///
/// Premium and sum insured must be strictly positive, and the farm must
/// belong to the named farmer.
///
/// # Errors
///
/// Returns the first violated rule.
pub fn validate_quotation_inputs(
    farmer: &Farmer,
    farm: &Farm,
    premium_amount: Money,
    sum_insured: Money,
) -> Result<(), DomainError> {
    validate_positive_amount("premium_amount", premium_amount)?;
    validate_positive_amount("sum_insured", sum_insured)?;

    let farmer_id: i64 = farmer.farmer_id.unwrap_or_default();
    if farm.farmer_id != farmer_id {
        return Err(DomainError::FarmOwnershipMismatch {
            farm_id: farm.farm_id.unwrap_or_default(),
            farm_farmer_id: farm.farmer_id,
            farmer_id,
        });
    }
    Ok(())
}

/// Validates a claim's relationship to its farmer and quotation.
///
/// The farmer must be active and match the quotation's farmer; the quotation
/// must be a written or paid policy carrying a policy number; the estimated
/// loss must be strictly positive and no greater than the sum insured.
///
/// # Errors
///
/// Returns the first violated rule.
pub fn validate_claim_against_quotation(
    farmer: &Farmer,
    quotation: &Quotation,
    estimated_loss: Money,
) -> Result<(), DomainError> {
    let farmer_id: i64 = farmer.farmer_id.unwrap_or_default();

    if farmer.status != EntityStatus::Active {
        return Err(DomainError::FarmerNotActive { farmer_id });
    }
    if !quotation.is_claimable() {
        return Err(DomainError::QuotationNotClaimable {
            quotation_id: quotation.quotation_id.unwrap_or_default(),
            status: quotation.status.to_string(),
        });
    }
    if quotation.policy_number.is_none() {
        return Err(DomainError::MissingPolicyNumber {
            quotation_id: quotation.quotation_id.unwrap_or_default(),
        });
    }
    if quotation.farmer_id != farmer_id {
        return Err(DomainError::ClaimFarmerMismatch {
            farmer_id,
            quotation_farmer_id: quotation.farmer_id,
        });
    }
    validate_positive_amount("estimated_loss_amount", estimated_loss)?;
    if estimated_loss > quotation.sum_insured {
        return Err(DomainError::EstimatedLossExceedsSumInsured {
            estimated_loss,
            sum_insured: quotation.sum_insured,
        });
    }
    Ok(())
}
