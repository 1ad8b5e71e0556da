// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::Money;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A money amount that must be strictly positive was zero or negative.
    NonPositiveAmount {
        /// The field that carried the invalid amount.
        field: &'static str,
        /// The offending amount in minor units.
        amount: Money,
    },
    /// The selected farm does not belong to the selected farmer.
    FarmOwnershipMismatch {
        /// The farm identifier.
        farm_id: i64,
        /// The farmer the farm actually belongs to.
        farm_farmer_id: i64,
        /// The farmer named in the request.
        farmer_id: i64,
    },
    /// The farmer on a claim does not match the quotation's farmer.
    ClaimFarmerMismatch {
        /// The farmer named in the claim.
        farmer_id: i64,
        /// The farmer on the quotation.
        quotation_farmer_id: i64,
    },
    /// The farmer is not in ACTIVE status.
    FarmerNotActive {
        /// The farmer identifier.
        farmer_id: i64,
    },
    /// The loss assessor is not in ACTIVE status.
    AssessorNotActive {
        /// The assessor identifier.
        assessor_id: i64,
    },
    /// A claim was filed against a quotation that is not a written or paid policy.
    QuotationNotClaimable {
        /// The quotation identifier.
        quotation_id: i64,
        /// The quotation's current status.
        status: String,
    },
    /// The quotation has no policy number.
    MissingPolicyNumber {
        /// The quotation identifier.
        quotation_id: i64,
    },
    /// The estimated loss exceeds the quotation's sum insured.
    EstimatedLossExceedsSumInsured {
        /// The estimated loss amount.
        estimated_loss: Money,
        /// The quotation's sum insured.
        sum_insured: Money,
    },
    /// A status string did not match any known status value.
    InvalidStatus {
        /// The status kind being parsed.
        kind: &'static str,
        /// The unrecognized value.
        value: String,
    },
    /// A payment reference was missing or empty.
    MissingPaymentReference,
    /// An assessor identifier was required but absent.
    MissingAssessor,
    /// The loss details document was not a valid JSON object.
    InvalidLossDetails(String),
    /// A role name was empty or invalid.
    InvalidRoleName(String),
    /// A system role may only have its description and status changed.
    SystemRoleImmutable {
        /// The role name.
        role: String,
    },
    /// A system role may never be deleted.
    SystemRoleUndeletable {
        /// The role name.
        role: String,
    },
    /// A role referenced by existing users cannot be deleted.
    RoleInUse {
        /// The role name.
        role: String,
        /// The number of users holding the role.
        user_count: i64,
    },
    /// A required field was missing or empty.
    MissingField {
        /// The field name.
        field: &'static str,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveAmount { field, amount } => {
                write!(f, "{field} must be greater than zero (got {amount})")
            }
            Self::FarmOwnershipMismatch {
                farm_id,
                farm_farmer_id,
                farmer_id,
            } => {
                write!(
                    f,
                    "Farm {farm_id} belongs to farmer {farm_farmer_id}, not farmer {farmer_id}"
                )
            }
            Self::ClaimFarmerMismatch {
                farmer_id,
                quotation_farmer_id,
            } => {
                write!(
                    f,
                    "Farmer {farmer_id} does not match the quotation's farmer {quotation_farmer_id}"
                )
            }
            Self::FarmerNotActive { farmer_id } => {
                write!(f, "Farmer {farmer_id} is not active")
            }
            Self::AssessorNotActive { assessor_id } => {
                write!(f, "Loss assessor {assessor_id} is not active")
            }
            Self::QuotationNotClaimable {
                quotation_id,
                status,
            } => {
                write!(
                    f,
                    "Claims require a written or paid policy; quotation {quotation_id} is {status}"
                )
            }
            Self::MissingPolicyNumber { quotation_id } => {
                write!(f, "Quotation {quotation_id} has no policy number")
            }
            Self::EstimatedLossExceedsSumInsured {
                estimated_loss,
                sum_insured,
            } => {
                write!(
                    f,
                    "Estimated loss ({estimated_loss}) cannot exceed sum insured ({sum_insured})"
                )
            }
            Self::InvalidStatus { kind, value } => {
                write!(f, "Invalid {kind} status: '{value}'")
            }
            Self::MissingPaymentReference => write!(f, "Payment reference is required"),
            Self::MissingAssessor => write!(f, "Assessor ID required"),
            Self::InvalidLossDetails(msg) => write!(f, "Invalid loss details: {msg}"),
            Self::InvalidRoleName(msg) => write!(f, "Invalid role name: {msg}"),
            Self::SystemRoleImmutable { role } => {
                write!(
                    f,
                    "System role '{role}' only allows description and status changes"
                )
            }
            Self::SystemRoleUndeletable { role } => {
                write!(f, "System role '{role}' cannot be deleted")
            }
            Self::RoleInUse { role, user_count } => {
                write!(
                    f,
                    "Role '{role}' is assigned to {user_count} user(s) and cannot be deleted"
                )
            }
            Self::MissingField { field } => write!(f, "Missing required field: {field}"),
        }
    }
}

impl std::error::Error for DomainError {}
