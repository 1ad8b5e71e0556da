// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Invoice handlers, including the partial-success bulk operations.

use agrisure::{approve_invoice, authorize, reject_invoice, settle_invoice};
use agrisure_domain::{Action, Invoice, InvoiceStatus, Money, Resource, validate_positive_amount};
use agrisure_persistence::Store;
use time::OffsetDateTime;

use crate::auth::Principal;
use crate::dto::{
    BulkApproveRequest, BulkResult, BulkSettleRequest, CreateInvoiceRequest, InvoiceDto,
    RejectInvoiceRequest, SettleInvoiceRequest, StatusTotalDto,
};
use crate::error::ApiError;

fn invoice_or_not_found(
    store: &Store,
    principal: &Principal,
    invoice_id: i64,
) -> Result<Invoice, ApiError> {
    let invoice: Invoice = store
        .invoice_by_id(invoice_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Invoice {invoice_id}")))?;
    // Rows outside the caller's organization are indistinguishable from
    // missing ones.
    if invoice.organization_id != principal.user.organization_id {
        return Err(ApiError::NotFound(format!("Invoice {invoice_id}")));
    }
    Ok(invoice)
}

fn conflict_from_current(invoice: &Invoice, invoice_id: i64, attempted: InvoiceStatus) -> ApiError {
    ApiError::StateConflict {
        entity: "invoice",
        entity_id: invoice_id,
        current: invoice.status.as_str().to_string(),
        attempted: attempted.as_str(),
    }
}

/// Creates an invoice in PENDING status, billed to the caller's
/// organization.
///
/// # Errors
///
/// Returns an error if the caller is not permitted or validation fails.
pub fn create(
    store: &Store,
    principal: &Principal,
    request: &CreateInvoiceRequest,
) -> Result<InvoiceDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Invoices,
        Action::Create,
    )?;
    validate_positive_amount("amount", Money::from_minor(request.amount))?;
    if request.invoice_number.trim().is_empty() {
        return Err(ApiError::Validation(
            "Invoice number cannot be empty".to_string(),
        ));
    }

    let invoice: Invoice = Invoice {
        invoice_id: None,
        organization_id: principal.user.organization_id,
        subsidy_id: request.subsidy_id,
        invoice_number: request.invoice_number.trim().to_string(),
        amount: Money::from_minor(request.amount),
        status: InvoiceStatus::Pending,
        approved_date: None,
        settlement_date: None,
        payment_reference: None,
        rejection_reason: None,
    };
    let invoice_id: i64 = store.insert_invoice(&invoice)?;
    Ok(InvoiceDto::from(&invoice_or_not_found(
        store, principal, invoice_id,
    )?))
}

/// Retrieves an invoice.
///
/// # Errors
///
/// Returns an error if the caller is not permitted or the invoice does not
/// exist.
pub fn get(store: &Store, principal: &Principal, invoice_id: i64) -> Result<InvoiceDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Invoices,
        Action::Read,
    )?;
    Ok(InvoiceDto::from(&invoice_or_not_found(
        store, principal, invoice_id,
    )?))
}

/// Lists the caller's organization's invoices.
///
/// # Errors
///
/// Returns an error if the caller is not permitted.
pub fn list(store: &Store, principal: &Principal) -> Result<Vec<InvoiceDto>, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Invoices,
        Action::Read,
    )?;
    let invoices: Vec<Invoice> = store.list_invoices(principal.user.organization_id)?;
    Ok(invoices.iter().map(InvoiceDto::from).collect())
}

/// Approves an invoice: PENDING to APPROVED.
///
/// # Errors
///
/// Returns a state conflict if the invoice is not PENDING.
pub fn approve(
    store: &Store,
    principal: &Principal,
    invoice_id: i64,
    now: OffsetDateTime,
) -> Result<InvoiceDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Invoices,
        Action::Update,
    )?;

    let invoice: Invoice = invoice_or_not_found(store, principal, invoice_id)?;
    let _: Invoice = approve_invoice(&invoice, now)?;

    if !store.commit_invoice_approved(invoice_id, now)? {
        let fresh: Invoice = invoice_or_not_found(store, principal, invoice_id)?;
        return Err(conflict_from_current(
            &fresh,
            invoice_id,
            InvoiceStatus::Approved,
        ));
    }
    Ok(InvoiceDto::from(&invoice_or_not_found(
        store, principal, invoice_id,
    )?))
}

/// Settles an invoice: APPROVED to SETTLED with a payment reference.
///
/// # Errors
///
/// Returns a validation error for a blank reference and a state conflict if
/// the invoice is not APPROVED.
pub fn settle(
    store: &Store,
    principal: &Principal,
    invoice_id: i64,
    request: &SettleInvoiceRequest,
    now: OffsetDateTime,
) -> Result<InvoiceDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Invoices,
        Action::Update,
    )?;

    let invoice: Invoice = invoice_or_not_found(store, principal, invoice_id)?;
    let settled: Invoice = settle_invoice(&invoice, &request.payment_reference, now)?;
    let reference: &str = settled.payment_reference.as_deref().unwrap_or_default();

    if !store.commit_invoice_settled(invoice_id, reference, now)? {
        let fresh: Invoice = invoice_or_not_found(store, principal, invoice_id)?;
        return Err(conflict_from_current(
            &fresh,
            invoice_id,
            InvoiceStatus::Settled,
        ));
    }
    Ok(InvoiceDto::from(&invoice_or_not_found(
        store, principal, invoice_id,
    )?))
}

/// Rejects an invoice from PENDING or APPROVED, storing the reason.
///
/// # Errors
///
/// Returns a state conflict if the invoice is already settled or rejected.
pub fn reject(
    store: &Store,
    principal: &Principal,
    invoice_id: i64,
    request: &RejectInvoiceRequest,
) -> Result<InvoiceDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Invoices,
        Action::Update,
    )?;

    let invoice: Invoice = invoice_or_not_found(store, principal, invoice_id)?;
    let _: Invoice = reject_invoice(&invoice, request.reason.as_deref())?;

    if !store.commit_invoice_rejected(invoice_id, request.reason.as_deref())? {
        let fresh: Invoice = invoice_or_not_found(store, principal, invoice_id)?;
        return Err(conflict_from_current(
            &fresh,
            invoice_id,
            InvoiceStatus::Rejected,
        ));
    }
    Ok(InvoiceDto::from(&invoice_or_not_found(
        store, principal, invoice_id,
    )?))
}

/// Approves every listed invoice still PENDING; rows in any other state are
/// skipped rather than failing the batch.
///
/// # Errors
///
/// Returns an error if the caller is not permitted or the update fails.
pub fn bulk_approve(
    store: &Store,
    principal: &Principal,
    request: &BulkApproveRequest,
    now: OffsetDateTime,
) -> Result<BulkResult, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Invoices,
        Action::Update,
    )?;
    let affected: usize = store.bulk_approve_invoices(
        principal.user.organization_id,
        &request.invoice_ids,
        now,
    )?;
    Ok(BulkResult {
        requested: request.invoice_ids.len(),
        affected,
    })
}

/// Settles every listed invoice still APPROVED, sharing one payment
/// reference.
///
/// # Errors
///
/// Returns a validation error for a blank reference.
pub fn bulk_settle(
    store: &Store,
    principal: &Principal,
    request: &BulkSettleRequest,
    now: OffsetDateTime,
) -> Result<BulkResult, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Invoices,
        Action::Update,
    )?;
    let reference: &str = request.payment_reference.trim();
    if reference.is_empty() {
        return Err(ApiError::Validation(
            "Payment reference cannot be empty".to_string(),
        ));
    }
    let affected: usize = store.bulk_settle_invoices(
        principal.user.organization_id,
        &request.invoice_ids,
        reference,
        now,
    )?;
    Ok(BulkResult {
        requested: request.invoice_ids.len(),
        affected,
    })
}

/// Aggregates the caller's organization's invoices by status.
///
/// # Errors
///
/// Returns an error if the caller is not permitted.
pub fn statistics(store: &Store, principal: &Principal) -> Result<Vec<StatusTotalDto>, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Invoices,
        Action::Read,
    )?;
    let totals = store.invoice_statistics(principal.user.organization_id)?;
    Ok(totals
        .into_iter()
        .map(|t| StatusTotalDto {
            status: t.status,
            count: t.count,
            total_amount: t.total_amount,
        })
        .collect())
}
