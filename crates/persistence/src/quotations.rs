// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Quotation persistence.
//!
//! Transitions are committed with compare-and-set updates keyed on the
//! expected prior status. Zero affected rows means another writer got there
//! first; the caller re-reads and reports the conflict.

use agrisure_domain::{Quotation, QuotationStatus};
use rusqlite::{OptionalExtension, params};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::Store;
use crate::error::PersistenceError;
use crate::records::{QuotationRow, format_timestamp};

const QUOTATION_COLUMNS: &str = "quotation_id, farmer_id, farm_id, product_id, policy_number,
                                 premium_amount, sum_insured, status, payment_date,
                                 payment_reference";

fn map_quotation_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<QuotationRow> {
    Ok(QuotationRow {
        quotation_id: row.get(0)?,
        farmer_id: row.get(1)?,
        farm_id: row.get(2)?,
        product_id: row.get(3)?,
        policy_number: row.get(4)?,
        premium_amount: row.get(5)?,
        sum_insured: row.get(6)?,
        status: row.get(7)?,
        payment_date: row.get(8)?,
        payment_reference: row.get(9)?,
    })
}

impl Store {
    /// Inserts a quotation in its initial state.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced row is missing or the insert fails.
    pub fn insert_quotation(
        &self,
        quotation: &Quotation,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        let updated_at: String = format_timestamp(now)?;
        self.conn.execute(
            "INSERT INTO quotations
                 (farmer_id, farm_id, product_id, premium_amount, sum_insured,
                  status, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                quotation.farmer_id,
                quotation.farm_id,
                quotation.product_id,
                quotation.premium_amount.minor(),
                quotation.sum_insured.minor(),
                quotation.status.as_str(),
                updated_at,
            ],
        )?;
        let quotation_id: i64 = self.conn.last_insert_rowid();
        info!(quotation_id, farmer_id = quotation.farmer_id, "Created quotation");
        Ok(quotation_id)
    }

    /// Retrieves a quotation by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed.
    pub fn quotation_by_id(
        &self,
        quotation_id: i64,
    ) -> Result<Option<Quotation>, PersistenceError> {
        let row: Option<QuotationRow> = self
            .conn
            .query_row(
                &format!("SELECT {QUOTATION_COLUMNS} FROM quotations WHERE quotation_id = ?1"),
                params![quotation_id],
                map_quotation_row,
            )
            .optional()?;
        row.map(QuotationRow::into_domain).transpose()
    }

    /// Lists a farmer's quotations, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub fn list_quotations_for_farmer(
        &self,
        farmer_id: i64,
    ) -> Result<Vec<Quotation>, PersistenceError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {QUOTATION_COLUMNS} FROM quotations
             WHERE farmer_id = ?1
             ORDER BY quotation_id DESC"
        ))?;
        let rows = stmt.query_map(params![farmer_id], map_quotation_row)?;

        let mut quotations: Vec<Quotation> = Vec::new();
        for row in rows {
            quotations.push(row?.into_domain()?);
        }
        Ok(quotations)
    }

    /// Updates the amounts on a quotation that is still OPEN.
    ///
    /// Returns `false` if the quotation had already moved past OPEN; paid and
    /// written quotations are immutable to offline edits.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_open_quotation(
        &self,
        quotation_id: i64,
        premium_amount_minor: i64,
        sum_insured_minor: i64,
        now: OffsetDateTime,
    ) -> Result<bool, PersistenceError> {
        let updated_at: String = format_timestamp(now)?;
        let affected: usize = self.conn.execute(
            "UPDATE quotations
             SET premium_amount = ?2, sum_insured = ?3, updated_at = ?4
             WHERE quotation_id = ?1 AND status = ?5",
            params![
                quotation_id,
                premium_amount_minor,
                sum_insured_minor,
                updated_at,
                QuotationStatus::Open.as_str(),
            ],
        )?;
        Ok(affected == 1)
    }

    /// Commits a premium payment: OPEN to PAID, conditional on the row still
    /// being OPEN.
    ///
    /// Returns `false` if no row transitioned, meaning the quotation was not
    /// in the expected state when the update ran.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn commit_quotation_paid(
        &self,
        quotation_id: i64,
        payment_reference: &str,
        payment_date: OffsetDateTime,
    ) -> Result<bool, PersistenceError> {
        let paid_at: String = format_timestamp(payment_date)?;
        let affected: usize = self.conn.execute(
            "UPDATE quotations
             SET status = ?2, payment_date = ?3, payment_reference = ?4, updated_at = ?3
             WHERE quotation_id = ?1 AND status = ?5",
            params![
                quotation_id,
                QuotationStatus::Paid.as_str(),
                paid_at,
                payment_reference,
                QuotationStatus::Open.as_str(),
            ],
        )?;
        debug!(quotation_id, affected, "Committed quotation payment");
        Ok(affected == 1)
    }

    /// Commits policy issuance: PAID to WRITTEN with the policy number set,
    /// conditional on the row still being PAID with no number.
    ///
    /// Returns `false` if no row transitioned.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails, including a unique violation on
    /// the policy number.
    pub fn commit_policy_written(
        &self,
        quotation_id: i64,
        policy_number: &str,
        now: OffsetDateTime,
    ) -> Result<bool, PersistenceError> {
        let updated_at: String = format_timestamp(now)?;
        let affected: usize = self.conn.execute(
            "UPDATE quotations
             SET status = ?2, policy_number = ?3, updated_at = ?4
             WHERE quotation_id = ?1 AND status = ?5 AND policy_number IS NULL",
            params![
                quotation_id,
                QuotationStatus::Written.as_str(),
                policy_number,
                updated_at,
                QuotationStatus::Paid.as_str(),
            ],
        )?;
        if affected == 1 {
            info!(quotation_id, policy_number, "Issued policy");
        }
        Ok(affected == 1)
    }
}
