// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Subsidy invoice settlement: PENDING → APPROVED → SETTLED, with REJECTED
//! reachable only before settlement.
//!
//! Bulk approve/settle are not expressed here; they are conditional
//! set-filtered updates in the persistence layer, which is the race-safe
//! idiom for batches.

use crate::error::CoreError;
use agrisure_domain::{Invoice, InvoiceStatus, validate_payment_reference};
use time::OffsetDateTime;

fn guard(invoice: &Invoice, target: InvoiceStatus) -> Result<(), CoreError> {
    if invoice.status.can_transition_to(target) {
        Ok(())
    } else {
        Err(CoreError::StateConflict {
            entity: "invoice",
            entity_id: invoice.invoice_id.unwrap_or_default(),
            current: invoice.status.to_string(),
            attempted: target.as_str(),
        })
    }
}

/// Approves a pending invoice for disbursement.
///
/// # Errors
///
/// Returns a state conflict if the invoice is not PENDING.
pub fn approve_invoice(invoice: &Invoice, now: OffsetDateTime) -> Result<Invoice, CoreError> {
    guard(invoice, InvoiceStatus::Approved)?;
    let mut approved: Invoice = invoice.clone();
    approved.status = InvoiceStatus::Approved;
    approved.approved_date = Some(now);
    Ok(approved)
}

/// Settles an approved invoice, recording the payment reference.
///
/// # Errors
///
/// Returns an error if the payment reference is empty or the invoice is not
/// APPROVED.
pub fn settle_invoice(
    invoice: &Invoice,
    payment_reference: &str,
    now: OffsetDateTime,
) -> Result<Invoice, CoreError> {
    validate_payment_reference(payment_reference)?;
    guard(invoice, InvoiceStatus::Settled)?;
    let mut settled: Invoice = invoice.clone();
    settled.status = InvoiceStatus::Settled;
    settled.settlement_date = Some(now);
    settled.payment_reference = Some(payment_reference.trim().to_string());
    Ok(settled)
}

/// Rejects an invoice, storing the rejection reason.
///
/// Settled invoices cannot be rejected.
///
/// # Errors
///
/// Returns a state conflict if the invoice is SETTLED or already REJECTED.
pub fn reject_invoice(invoice: &Invoice, reason: Option<&str>) -> Result<Invoice, CoreError> {
    guard(invoice, InvoiceStatus::Rejected)?;
    let mut rejected: Invoice = invoice.clone();
    rejected.status = InvoiceStatus::Rejected;
    rejected.rejection_reason = reason.map(str::trim).map(str::to_string);
    Ok(rejected)
}
