// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::invoice::{approve_invoice, reject_invoice, settle_invoice};
use agrisure_domain::{DomainError, Invoice, InvoiceStatus, Money};
use time::macros::datetime;

fn pending_invoice(invoice_id: i64) -> Invoice {
    Invoice {
        invoice_id: Some(invoice_id),
        organization_id: 1,
        subsidy_id: 2,
        invoice_number: format!("INV-{invoice_id}"),
        amount: Money::from_minor(12_500_00),
        status: InvoiceStatus::Pending,
        approved_date: None,
        settlement_date: None,
        payment_reference: None,
        rejection_reason: None,
    }
}

#[test]
fn approve_then_settle_records_dates_and_reference() {
    let approved_at = datetime!(2026-08-23 09:00 UTC);
    let settled_at = datetime!(2026-08-24 09:00 UTC);

    let approved: Invoice = approve_invoice(&pending_invoice(1), approved_at).unwrap();
    assert_eq!(approved.status, InvoiceStatus::Approved);
    assert_eq!(approved.approved_date, Some(approved_at));

    let settled: Invoice = settle_invoice(&approved, "TREASURY-881", settled_at).unwrap();
    assert_eq!(settled.status, InvoiceStatus::Settled);
    assert_eq!(settled.settlement_date, Some(settled_at));
    assert_eq!(settled.payment_reference.as_deref(), Some("TREASURY-881"));
}

#[test]
fn settle_requires_approval_and_a_reference() {
    let now = datetime!(2026-08-23 09:00 UTC);

    let err = settle_invoice(&pending_invoice(1), "TREASURY-881", now).unwrap_err();
    assert!(matches!(err, CoreError::StateConflict { entity: "invoice", .. }));

    let approved: Invoice = approve_invoice(&pending_invoice(1), now).unwrap();
    let err = settle_invoice(&approved, "  ", now).unwrap_err();
    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::MissingPaymentReference)
    ));
}

#[test]
fn reject_stores_the_reason_and_is_closed_after_settlement() {
    let now = datetime!(2026-08-23 09:00 UTC);

    let rejected: Invoice =
        reject_invoice(&pending_invoice(1), Some("duplicate submission")).unwrap();
    assert_eq!(rejected.status, InvoiceStatus::Rejected);
    assert_eq!(
        rejected.rejection_reason.as_deref(),
        Some("duplicate submission")
    );
    assert_eq!(rejected.payment_reference, None);

    let approved: Invoice = approve_invoice(&pending_invoice(2), now).unwrap();
    assert!(reject_invoice(&approved, None).is_ok());

    let settled: Invoice = settle_invoice(&approved, "TREASURY-881", now).unwrap();
    assert!(matches!(
        reject_invoice(&settled, None).unwrap_err(),
        CoreError::StateConflict { .. }
    ));
}

#[test]
fn double_approval_is_a_state_conflict() {
    let now = datetime!(2026-08-23 09:00 UTC);
    let approved: Invoice = approve_invoice(&pending_invoice(1), now).unwrap();
    assert!(approve_invoice(&approved, now).is_err());
}
