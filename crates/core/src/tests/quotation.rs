// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::quotation::{create_quotation, mark_paid, write_policy};
use crate::tests::{farm, farmer, paid_quotation, product};
use agrisure_domain::{DomainError, Money, Quotation, QuotationStatus};
use time::macros::{date, datetime};

#[test]
fn create_starts_open_without_a_policy_number() {
    let quotation: Quotation = create_quotation(
        &farmer(1),
        &farm(7, 1),
        &product(3),
        Money::from_minor(75_00),
        Money::from_minor(20_000_00),
    )
    .unwrap();

    assert_eq!(quotation.status, QuotationStatus::Open);
    assert!(quotation.policy_number.is_none());
    assert!(quotation.payment_date.is_none());
}

#[test]
fn create_rejects_a_foreign_farm() {
    let err = create_quotation(
        &farmer(1),
        &farm(7, 9),
        &product(3),
        Money::from_minor(75_00),
        Money::from_minor(20_000_00),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::FarmOwnershipMismatch { .. })
    ));
}

#[test]
fn mark_paid_records_reference_and_date() {
    let mut quotation: Quotation = paid_quotation(5, 1);
    quotation.status = QuotationStatus::Open;
    quotation.payment_reference = None;

    let now = datetime!(2026-08-23 10:00 UTC);
    let paid: Quotation = mark_paid(&quotation, "  EFT-2002  ", now).unwrap();

    assert_eq!(paid.status, QuotationStatus::Paid);
    assert_eq!(paid.payment_reference.as_deref(), Some("EFT-2002"));
    assert_eq!(paid.payment_date, Some(now));
}

#[test]
fn mark_paid_requires_a_reference() {
    let mut quotation: Quotation = paid_quotation(5, 1);
    quotation.status = QuotationStatus::Open;

    let err = mark_paid(&quotation, "   ", datetime!(2026-08-23 10:00 UTC)).unwrap_err();
    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::MissingPaymentReference)
    ));
}

#[test]
fn mark_paid_rejects_paid_and_written_quotations() {
    let paid: Quotation = paid_quotation(5, 1);
    let err = mark_paid(&paid, "EFT-3003", datetime!(2026-08-23 10:00 UTC)).unwrap_err();
    assert!(matches!(err, CoreError::StateConflict { .. }));

    let mut written: Quotation = paid_quotation(5, 1);
    written.status = QuotationStatus::Written;
    written.policy_number = Some("POL-20260820-5".to_string());
    let err = mark_paid(&written, "EFT-3003", datetime!(2026-08-23 10:00 UTC)).unwrap_err();
    assert!(matches!(err, CoreError::StateConflict { .. }));
}

#[test]
fn write_policy_issues_the_permanent_number() {
    let quotation: Quotation = paid_quotation(42, 1);
    let written: Quotation = write_policy(&quotation, date!(2026 - 08 - 23)).unwrap();

    assert_eq!(written.status, QuotationStatus::Written);
    assert_eq!(written.policy_number.as_deref(), Some("POL-20260823-42"));
}

#[test]
fn write_policy_requires_paid_status() {
    let mut quotation: Quotation = paid_quotation(42, 1);
    quotation.status = QuotationStatus::Open;

    let err = write_policy(&quotation, date!(2026 - 08 - 23)).unwrap_err();
    assert!(matches!(
        err,
        CoreError::StateConflict {
            entity: "quotation",
            ..
        }
    ));
}

#[test]
fn write_policy_never_overwrites_an_existing_number() {
    let mut quotation: Quotation = paid_quotation(42, 1);
    quotation.policy_number = Some("POL-20260820-42".to_string());

    assert!(write_policy(&quotation, date!(2026 - 08 - 23)).is_err());
    assert_eq!(
        quotation.policy_number.as_deref(),
        Some("POL-20260820-42")
    );
}
