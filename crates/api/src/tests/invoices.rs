// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::dto::{
    BulkApproveRequest, BulkResult, BulkSettleRequest, CreateInvoiceRequest, InvoiceDto,
    RejectInvoiceRequest, SettleInvoiceRequest,
};
use crate::error::ApiError;
use crate::invoices;
use crate::tests::{T0, T1, admin, principal_in_other_org, seed_invoice, seed_subsidy, store};

#[test]
fn create_validates_inputs() {
    let store = store();
    let actor = admin(&store);
    let subsidy_id: i64 = seed_subsidy(&store);

    let blank_number = invoices::create(
        &store,
        &actor,
        &CreateInvoiceRequest {
            subsidy_id,
            invoice_number: "  ".to_string(),
            amount: 1_000_00,
        },
    )
    .unwrap_err();
    assert!(matches!(blank_number, ApiError::Validation(_)));

    let zero_amount = invoices::create(
        &store,
        &actor,
        &CreateInvoiceRequest {
            subsidy_id,
            invoice_number: "INV-4001".to_string(),
            amount: 0,
        },
    )
    .unwrap_err();
    assert!(matches!(zero_amount, ApiError::Validation(_)));
}

#[test]
fn approval_and_settlement() {
    let store = store();
    let actor = admin(&store);
    let subsidy_id: i64 = seed_subsidy(&store);
    let invoice: InvoiceDto = invoices::create(
        &store,
        &actor,
        &CreateInvoiceRequest {
            subsidy_id,
            invoice_number: "INV-4002".to_string(),
            amount: 1_250_00,
        },
    )
    .unwrap();
    let invoice_id: i64 = invoice.invoice_id.unwrap();
    assert_eq!(invoice.status, "PENDING");

    let approved: InvoiceDto = invoices::approve(&store, &actor, invoice_id, T0).unwrap();
    assert_eq!(approved.status, "APPROVED");
    assert!(approved.approved_date.is_some());

    let settled: InvoiceDto = invoices::settle(
        &store,
        &actor,
        invoice_id,
        &SettleInvoiceRequest {
            payment_reference: "TT-889900".to_string(),
        },
        T1,
    )
    .unwrap();
    assert_eq!(settled.status, "SETTLED");
    assert_eq!(settled.payment_reference.as_deref(), Some("TT-889900"));

    // Settlement cannot be repeated.
    let err = invoices::settle(
        &store,
        &actor,
        invoice_id,
        &SettleInvoiceRequest {
            payment_reference: "TT-889901".to_string(),
        },
        T1,
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::StateConflict { .. }));
}

#[test]
fn rejection_keeps_the_reason() {
    let store = store();
    let actor = admin(&store);
    let subsidy_id: i64 = seed_subsidy(&store);
    let invoice_id: i64 = seed_invoice(&store, subsidy_id, "INV-4003");

    let rejected: InvoiceDto = invoices::reject(
        &store,
        &actor,
        invoice_id,
        &RejectInvoiceRequest {
            reason: Some("Duplicate submission".to_string()),
        },
    )
    .unwrap();
    assert_eq!(rejected.status, "REJECTED");
    assert_eq!(
        rejected.rejection_reason.as_deref(),
        Some("Duplicate submission")
    );
    assert_eq!(rejected.payment_reference, None);
}

#[test]
fn invoices_are_invisible_outside_their_organization() {
    let store = store();
    let actor = admin(&store);
    let subsidy_id: i64 = seed_subsidy(&store);
    let invoice_id: i64 = seed_invoice(&store, subsidy_id, "INV-4020");
    let actor_elsewhere = principal_in_other_org(&store, &actor);

    let err = invoices::get(&store, &actor_elsewhere, invoice_id).unwrap_err();
    assert_eq!(err, ApiError::NotFound(format!("Invoice {invoice_id}")));

    let err = invoices::approve(&store, &actor_elsewhere, invoice_id, T0).unwrap_err();
    assert_eq!(err, ApiError::NotFound(format!("Invoice {invoice_id}")));

    // Bulk operations silently skip foreign rows.
    let result: BulkResult = invoices::bulk_approve(
        &store,
        &actor_elsewhere,
        &BulkApproveRequest {
            invoice_ids: vec![invoice_id],
        },
        T0,
    )
    .unwrap();
    assert_eq!(
        result,
        BulkResult {
            requested: 1,
            affected: 0,
        }
    );
    let unchanged: InvoiceDto = invoices::get(&store, &actor, invoice_id).unwrap();
    assert_eq!(unchanged.status, "PENDING");

    // Statistics only count the caller's organization.
    let totals = invoices::statistics(&store, &actor_elsewhere).unwrap();
    assert!(totals.is_empty());
}

#[test]
fn bulk_approval_skips_rows_in_other_states() {
    let store = store();
    let actor = admin(&store);
    let subsidy_id: i64 = seed_subsidy(&store);
    let first: i64 = seed_invoice(&store, subsidy_id, "INV-4004");
    let second: i64 = seed_invoice(&store, subsidy_id, "INV-4005");
    let third: i64 = seed_invoice(&store, subsidy_id, "INV-4006");
    invoices::approve(&store, &actor, first, T0).unwrap();

    let result: BulkResult = invoices::bulk_approve(
        &store,
        &actor,
        &BulkApproveRequest {
            invoice_ids: vec![first, second, third],
        },
        T1,
    )
    .unwrap();
    assert_eq!(
        result,
        BulkResult {
            requested: 3,
            affected: 2,
        }
    );
}

#[test]
fn bulk_settlement_shares_one_reference() {
    let store = store();
    let actor = admin(&store);
    let subsidy_id: i64 = seed_subsidy(&store);
    let first: i64 = seed_invoice(&store, subsidy_id, "INV-4007");
    let second: i64 = seed_invoice(&store, subsidy_id, "INV-4008");
    invoices::bulk_approve(
        &store,
        &actor,
        &BulkApproveRequest {
            invoice_ids: vec![first, second],
        },
        T0,
    )
    .unwrap();

    let blank = invoices::bulk_settle(
        &store,
        &actor,
        &BulkSettleRequest {
            invoice_ids: vec![first, second],
            payment_reference: "  ".to_string(),
        },
        T1,
    )
    .unwrap_err();
    assert!(matches!(blank, ApiError::Validation(_)));

    let result: BulkResult = invoices::bulk_settle(
        &store,
        &actor,
        &BulkSettleRequest {
            invoice_ids: vec![first, second],
            payment_reference: "BATCH-2026-08".to_string(),
        },
        T1,
    )
    .unwrap();
    assert_eq!(result.affected, 2);

    let settled: InvoiceDto = invoices::get(&store, &actor, second).unwrap();
    assert_eq!(settled.payment_reference.as_deref(), Some("BATCH-2026-08"));
}

#[test]
fn statistics_bucket_by_status() {
    let store = store();
    let actor = admin(&store);
    let subsidy_id: i64 = seed_subsidy(&store);
    let first: i64 = seed_invoice(&store, subsidy_id, "INV-4009");
    seed_invoice(&store, subsidy_id, "INV-4010");
    invoices::approve(&store, &actor, first, T0).unwrap();

    let totals = invoices::statistics(&store, &actor).unwrap();
    let pending = totals.iter().find(|t| t.status == "PENDING").unwrap();
    assert_eq!(pending.count, 1);
    assert_eq!(pending.total_amount, 1_250_00);
    let approved = totals.iter().find(|t| t.status == "APPROVED").unwrap();
    assert_eq!(approved.count, 1);
}
