// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use agrisure_domain::{Invoice, InvoiceStatus};

use crate::Store;
use crate::records::StatusTotal;
use crate::tests::{T1, T2, default_org, seed_invoice, seed_subsidy, store};

#[test]
fn single_invoice_walks_the_settlement_chain() {
    let store: Store = store();
    let subsidy_id: i64 = seed_subsidy(&store);
    let invoice_id: i64 = seed_invoice(&store, subsidy_id, "INV-0001");

    // Settlement before approval changes nothing.
    assert!(!store.commit_invoice_settled(invoice_id, "EFT-7001", T1).unwrap());

    assert!(store.commit_invoice_approved(invoice_id, T1).unwrap());
    assert!(store.commit_invoice_settled(invoice_id, "EFT-7001", T2).unwrap());

    let settled: Invoice = store.invoice_by_id(invoice_id).unwrap().unwrap();
    assert_eq!(settled.status, InvoiceStatus::Settled);
    assert_eq!(settled.approved_date, Some(T1));
    assert_eq!(settled.settlement_date, Some(T2));
    assert_eq!(settled.payment_reference.as_deref(), Some("EFT-7001"));
}

#[test]
fn rejection_stores_the_reason_and_closes_after_settlement() {
    let store: Store = store();
    let subsidy_id: i64 = seed_subsidy(&store);
    let invoice_id: i64 = seed_invoice(&store, subsidy_id, "INV-0001");

    assert!(store
        .commit_invoice_rejected(invoice_id, Some("Duplicate submission"))
        .unwrap());
    let rejected: Invoice = store.invoice_by_id(invoice_id).unwrap().unwrap();
    assert_eq!(rejected.status, InvoiceStatus::Rejected);
    assert_eq!(
        rejected.rejection_reason.as_deref(),
        Some("Duplicate submission")
    );
    assert_eq!(rejected.payment_reference, None);

    let other_id: i64 = seed_invoice(&store, subsidy_id, "INV-0002");
    store.commit_invoice_approved(other_id, T1).unwrap();
    store.commit_invoice_settled(other_id, "EFT-7001", T2).unwrap();
    assert!(!store.commit_invoice_rejected(other_id, None).unwrap());
}

#[test]
fn bulk_approval_skips_rows_in_the_wrong_state() {
    let store: Store = store();
    let subsidy_id: i64 = seed_subsidy(&store);
    let org: i64 = default_org(&store);
    let pending_a: i64 = seed_invoice(&store, subsidy_id, "INV-0001");
    let pending_b: i64 = seed_invoice(&store, subsidy_id, "INV-0002");
    let approved: i64 = seed_invoice(&store, subsidy_id, "INV-0003");
    store.commit_invoice_approved(approved, T1).unwrap();

    let moved: usize = store
        .bulk_approve_invoices(org, &[pending_a, pending_b, approved], T2)
        .unwrap();
    assert_eq!(moved, 2);

    for invoice_id in [pending_a, pending_b, approved] {
        let invoice: Invoice = store.invoice_by_id(invoice_id).unwrap().unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Approved);
    }
    // The already-approved row kept its original approval date.
    let kept: Invoice = store.invoice_by_id(approved).unwrap().unwrap();
    assert_eq!(kept.approved_date, Some(T1));
}

#[test]
fn bulk_settlement_shares_one_reference() {
    let store: Store = store();
    let subsidy_id: i64 = seed_subsidy(&store);
    let org: i64 = default_org(&store);
    let first: i64 = seed_invoice(&store, subsidy_id, "INV-0001");
    let second: i64 = seed_invoice(&store, subsidy_id, "INV-0002");
    let still_pending: i64 = seed_invoice(&store, subsidy_id, "INV-0003");
    store
        .bulk_approve_invoices(org, &[first, second], T1)
        .unwrap();

    let moved: usize = store
        .bulk_settle_invoices(org, &[first, second, still_pending], "EFT-8001", T2)
        .unwrap();
    assert_eq!(moved, 2);

    for invoice_id in [first, second] {
        let invoice: Invoice = store.invoice_by_id(invoice_id).unwrap().unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Settled);
        assert_eq!(invoice.payment_reference.as_deref(), Some("EFT-8001"));
    }
    let untouched: Invoice = store.invoice_by_id(still_pending).unwrap().unwrap();
    assert_eq!(untouched.status, InvoiceStatus::Pending);
}

#[test]
fn empty_bulk_requests_are_no_ops() {
    let store: Store = store();
    let org: i64 = default_org(&store);
    assert_eq!(store.bulk_approve_invoices(org, &[], T1).unwrap(), 0);
    assert_eq!(store.bulk_settle_invoices(org, &[], "EFT-1", T1).unwrap(), 0);
}

#[test]
fn bulk_approval_skips_rows_from_other_organizations() {
    let store: Store = store();
    let subsidy_id: i64 = seed_subsidy(&store);
    let invoice_id: i64 = seed_invoice(&store, subsidy_id, "INV-0001");
    let other_org: i64 = store
        .insert_organization("COOP-EAST", "Eastern Coop")
        .unwrap();

    let moved: usize = store
        .bulk_approve_invoices(other_org, &[invoice_id], T1)
        .unwrap();
    assert_eq!(moved, 0);

    let untouched: Invoice = store.invoice_by_id(invoice_id).unwrap().unwrap();
    assert_eq!(untouched.status, InvoiceStatus::Pending);
}

#[test]
fn statistics_bucket_by_status() {
    let store: Store = store();
    let subsidy_id: i64 = seed_subsidy(&store);
    let org: i64 = default_org(&store);
    let first: i64 = seed_invoice(&store, subsidy_id, "INV-0001");
    seed_invoice(&store, subsidy_id, "INV-0002");
    store.commit_invoice_approved(first, T1).unwrap();

    let totals: Vec<StatusTotal> = store.invoice_statistics(org).unwrap();
    let pending: &StatusTotal = totals.iter().find(|t| t.status == "PENDING").unwrap();
    assert_eq!(pending.count, 1);
    assert_eq!(pending.total_amount, 1_250_00);

    let approved: &StatusTotal = totals.iter().find(|t| t.status == "APPROVED").unwrap();
    assert_eq!(approved.count, 1);
}
