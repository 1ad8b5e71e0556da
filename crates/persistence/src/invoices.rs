// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Invoice persistence.
//!
//! Bulk operations are single set-filtered updates conditional on the
//! expected prior status, so rows in the wrong state are skipped and the
//! affected count tells the caller how many actually moved.

use agrisure_domain::{Invoice, InvoiceStatus};
use rusqlite::types::Value as SqlValue;
use rusqlite::{OptionalExtension, params, params_from_iter};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::Store;
use crate::error::PersistenceError;
use crate::records::{InvoiceRow, StatusTotal, format_timestamp};

const INVOICE_COLUMNS: &str = "invoice_id, organization_id, subsidy_id, invoice_number, amount,
                               status, approved_date, settlement_date, payment_reference,
                               rejection_reason";

fn map_invoice_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<InvoiceRow> {
    Ok(InvoiceRow {
        invoice_id: row.get(0)?,
        organization_id: row.get(1)?,
        subsidy_id: row.get(2)?,
        invoice_number: row.get(3)?,
        amount: row.get(4)?,
        status: row.get(5)?,
        approved_date: row.get(6)?,
        settlement_date: row.get(7)?,
        payment_reference: row.get(8)?,
        rejection_reason: row.get(9)?,
    })
}

fn placeholders(from: usize, count: usize) -> String {
    let mut list: Vec<String> = Vec::with_capacity(count);
    for i in 0..count {
        list.push(format!("?{}", from + i));
    }
    list.join(", ")
}

impl Store {
    /// Inserts an invoice in its initial state.
    ///
    /// # Errors
    ///
    /// Returns an error if the number is taken or a referenced row is
    /// missing.
    pub fn insert_invoice(&self, invoice: &Invoice) -> Result<i64, PersistenceError> {
        self.conn.execute(
            "INSERT INTO invoices
                 (organization_id, subsidy_id, invoice_number, amount, status)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                invoice.organization_id,
                invoice.subsidy_id,
                invoice.invoice_number,
                invoice.amount.minor(),
                invoice.status.as_str(),
            ],
        )?;
        let invoice_id: i64 = self.conn.last_insert_rowid();
        info!(invoice_id, invoice_number = invoice.invoice_number, "Created invoice");
        Ok(invoice_id)
    }

    /// Retrieves an invoice by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed.
    pub fn invoice_by_id(&self, invoice_id: i64) -> Result<Option<Invoice>, PersistenceError> {
        let row: Option<InvoiceRow> = self
            .conn
            .query_row(
                &format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE invoice_id = ?1"),
                params![invoice_id],
                map_invoice_row,
            )
            .optional()?;
        row.map(InvoiceRow::into_domain).transpose()
    }

    /// Lists an organization's invoices, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub fn list_invoices(&self, organization_id: i64) -> Result<Vec<Invoice>, PersistenceError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices
             WHERE organization_id = ?1
             ORDER BY invoice_id DESC"
        ))?;
        let rows = stmt.query_map(params![organization_id], map_invoice_row)?;

        let mut invoices: Vec<Invoice> = Vec::new();
        for row in rows {
            invoices.push(row?.into_domain()?);
        }
        Ok(invoices)
    }

    /// Commits an invoice approval: PENDING to APPROVED.
    ///
    /// Returns `false` if no row transitioned.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn commit_invoice_approved(
        &self,
        invoice_id: i64,
        approved_date: OffsetDateTime,
    ) -> Result<bool, PersistenceError> {
        let approved_at: String = format_timestamp(approved_date)?;
        let affected: usize = self.conn.execute(
            "UPDATE invoices
             SET status = ?2, approved_date = ?3
             WHERE invoice_id = ?1 AND status = ?4",
            params![
                invoice_id,
                InvoiceStatus::Approved.as_str(),
                approved_at,
                InvoiceStatus::Pending.as_str(),
            ],
        )?;
        debug!(invoice_id, affected, "Committed invoice approval");
        Ok(affected == 1)
    }

    /// Commits an invoice settlement: APPROVED to SETTLED with the payment
    /// reference.
    ///
    /// Returns `false` if no row transitioned.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn commit_invoice_settled(
        &self,
        invoice_id: i64,
        payment_reference: &str,
        settlement_date: OffsetDateTime,
    ) -> Result<bool, PersistenceError> {
        let settled_at: String = format_timestamp(settlement_date)?;
        let affected: usize = self.conn.execute(
            "UPDATE invoices
             SET status = ?2, settlement_date = ?3, payment_reference = ?4
             WHERE invoice_id = ?1 AND status = ?5",
            params![
                invoice_id,
                InvoiceStatus::Settled.as_str(),
                settled_at,
                payment_reference,
                InvoiceStatus::Approved.as_str(),
            ],
        )?;
        debug!(invoice_id, affected, "Committed invoice settlement");
        Ok(affected == 1)
    }

    /// Commits an invoice rejection from either pre-settlement state,
    /// storing the optional reason.
    ///
    /// Returns `false` if no row transitioned.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn commit_invoice_rejected(
        &self,
        invoice_id: i64,
        reason: Option<&str>,
    ) -> Result<bool, PersistenceError> {
        let affected: usize = self.conn.execute(
            "UPDATE invoices
             SET status = ?2, rejection_reason = ?3
             WHERE invoice_id = ?1 AND status IN (?4, ?5)",
            params![
                invoice_id,
                InvoiceStatus::Rejected.as_str(),
                reason,
                InvoiceStatus::Pending.as_str(),
                InvoiceStatus::Approved.as_str(),
            ],
        )?;
        debug!(invoice_id, affected, "Committed invoice rejection");
        Ok(affected == 1)
    }

    /// Approves every listed invoice of the organization still PENDING, in
    /// one update.
    ///
    /// Returns how many rows transitioned; invoices in any other state, or
    /// belonging to another organization, are left untouched rather than
    /// failing the batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn bulk_approve_invoices(
        &self,
        organization_id: i64,
        invoice_ids: &[i64],
        approved_date: OffsetDateTime,
    ) -> Result<usize, PersistenceError> {
        if invoice_ids.is_empty() {
            return Ok(0);
        }
        let approved_at: String = format_timestamp(approved_date)?;
        let sql: String = format!(
            "UPDATE invoices
             SET status = ?1, approved_date = ?2
             WHERE status = ?3 AND organization_id = ?4 AND invoice_id IN ({})",
            placeholders(5, invoice_ids.len())
        );

        let mut values: Vec<SqlValue> = vec![
            SqlValue::from(InvoiceStatus::Approved.as_str().to_string()),
            SqlValue::from(approved_at),
            SqlValue::from(InvoiceStatus::Pending.as_str().to_string()),
            SqlValue::from(organization_id),
        ];
        values.extend(invoice_ids.iter().copied().map(SqlValue::from));

        let affected: usize = self.conn.execute(&sql, params_from_iter(values))?;
        info!(requested = invoice_ids.len(), affected, "Bulk-approved invoices");
        Ok(affected)
    }

    /// Settles every listed invoice of the organization still APPROVED,
    /// sharing one payment reference, in one update.
    ///
    /// Returns how many rows transitioned.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn bulk_settle_invoices(
        &self,
        organization_id: i64,
        invoice_ids: &[i64],
        payment_reference: &str,
        settlement_date: OffsetDateTime,
    ) -> Result<usize, PersistenceError> {
        if invoice_ids.is_empty() {
            return Ok(0);
        }
        let settled_at: String = format_timestamp(settlement_date)?;
        let sql: String = format!(
            "UPDATE invoices
             SET status = ?1, settlement_date = ?2, payment_reference = ?3
             WHERE status = ?4 AND organization_id = ?5 AND invoice_id IN ({})",
            placeholders(6, invoice_ids.len())
        );

        let mut values: Vec<SqlValue> = vec![
            SqlValue::from(InvoiceStatus::Settled.as_str().to_string()),
            SqlValue::from(settled_at),
            SqlValue::from(payment_reference.to_string()),
            SqlValue::from(InvoiceStatus::Approved.as_str().to_string()),
            SqlValue::from(organization_id),
        ];
        values.extend(invoice_ids.iter().copied().map(SqlValue::from));

        let affected: usize = self.conn.execute(&sql, params_from_iter(values))?;
        info!(requested = invoice_ids.len(), affected, "Bulk-settled invoices");
        Ok(affected)
    }

    /// Aggregates an organization's invoices by status with summed amounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn invoice_statistics(
        &self,
        organization_id: i64,
    ) -> Result<Vec<StatusTotal>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*), COALESCE(SUM(amount), 0)
             FROM invoices
             WHERE organization_id = ?1
             GROUP BY status
             ORDER BY status ASC",
        )?;
        let rows = stmt.query_map(params![organization_id], |row| {
            Ok(StatusTotal {
                status: row.get(0)?,
                count: row.get(1)?,
                total_amount: row.get(2)?,
            })
        })?;

        let mut totals: Vec<StatusTotal> = Vec::new();
        for row in rows {
            totals.push(row?);
        }
        Ok(totals)
    }
}
