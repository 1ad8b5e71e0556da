// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod claim;
mod error;
mod identifiers;
mod invoice;
mod quotation;
mod role;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use claim::{
    Claim, ClaimAssignment, ClaimStatus, LossAssessor, LossDetails, normalize_loss_details,
};
pub use error::DomainError;
pub use identifiers::{
    CLAIM_NUMBER_PREFIX, POLICY_NUMBER_PREFIX, claim_number_prefix, next_claim_number,
    policy_number,
};
pub use invoice::{Invoice, InvoiceStatus, Subsidy};
pub use quotation::{InsuranceProduct, Quotation, QuotationStatus};
pub use role::{Action, PermissionSet, Resource, Role, RoleName, RoleStatus};
pub use types::{
    EntityStatus, Farm, Farmer, Money, Notification, Organization, User, UserStatus,
};
pub use validation::{
    validate_claim_against_quotation, validate_payment_reference, validate_positive_amount,
    validate_quotation_inputs,
};
