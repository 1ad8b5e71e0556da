// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::claim::ClaimStatus;
use crate::invoice::InvoiceStatus;
use crate::quotation::QuotationStatus;
use std::str::FromStr;

#[test]
fn quotation_moves_forward_only() {
    assert!(QuotationStatus::Open.can_transition_to(QuotationStatus::Paid));
    assert!(QuotationStatus::Paid.can_transition_to(QuotationStatus::Written));

    // No skips, no backwards motion.
    assert!(!QuotationStatus::Open.can_transition_to(QuotationStatus::Written));
    assert!(!QuotationStatus::Paid.can_transition_to(QuotationStatus::Open));
    assert!(!QuotationStatus::Written.can_transition_to(QuotationStatus::Paid));
    assert!(!QuotationStatus::Written.can_transition_to(QuotationStatus::Open));
}

#[test]
fn quotation_status_round_trips_through_strings() {
    for status in [
        QuotationStatus::Open,
        QuotationStatus::Paid,
        QuotationStatus::Written,
    ] {
        assert_eq!(QuotationStatus::from_str(status.as_str()), Ok(status));
    }
    assert!(QuotationStatus::from_str("CANCELLED").is_err());
}

#[test]
fn claim_progresses_via_explicit_actions() {
    assert!(ClaimStatus::Open.can_transition_to(ClaimStatus::UnderAssessment));
    assert!(ClaimStatus::UnderAssessment.can_transition_to(ClaimStatus::PendingPayment));
    assert!(ClaimStatus::PendingPayment.can_transition_to(ClaimStatus::Paid));

    assert!(!ClaimStatus::Open.can_transition_to(ClaimStatus::PendingPayment));
    assert!(!ClaimStatus::Open.can_transition_to(ClaimStatus::Paid));
    assert!(!ClaimStatus::Paid.can_transition_to(ClaimStatus::Open));
}

#[test]
fn claim_reassignment_stays_under_assessment() {
    assert!(ClaimStatus::UnderAssessment.can_transition_to(ClaimStatus::UnderAssessment));
}

#[test]
fn claim_rejection_only_before_approval() {
    assert!(ClaimStatus::Open.can_transition_to(ClaimStatus::Rejected));
    assert!(ClaimStatus::UnderAssessment.can_transition_to(ClaimStatus::Rejected));

    assert!(!ClaimStatus::PendingPayment.can_transition_to(ClaimStatus::Rejected));
    assert!(!ClaimStatus::Paid.can_transition_to(ClaimStatus::Rejected));
    assert!(!ClaimStatus::Rejected.can_transition_to(ClaimStatus::Open));
}

#[test]
fn invoice_settlement_is_forward_only() {
    assert!(InvoiceStatus::Pending.can_transition_to(InvoiceStatus::Approved));
    assert!(InvoiceStatus::Approved.can_transition_to(InvoiceStatus::Settled));

    assert!(!InvoiceStatus::Pending.can_transition_to(InvoiceStatus::Settled));
    assert!(!InvoiceStatus::Settled.can_transition_to(InvoiceStatus::Approved));
}

#[test]
fn settled_invoice_cannot_be_rejected() {
    assert!(InvoiceStatus::Pending.can_transition_to(InvoiceStatus::Rejected));
    assert!(InvoiceStatus::Approved.can_transition_to(InvoiceStatus::Rejected));

    assert!(!InvoiceStatus::Settled.can_transition_to(InvoiceStatus::Rejected));
    assert!(!InvoiceStatus::Rejected.can_transition_to(InvoiceStatus::Pending));
}
