// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Claim persistence.
//!
//! Claim numbers are derived read-then-increment from the highest suffix
//! under the day's prefix; the UNIQUE constraint on `claim_number` plus a
//! bounded re-derive loop closes the concurrent-filing race. Status
//! transitions commit with compare-and-set updates like quotations do.

use agrisure_domain::{Claim, ClaimAssignment, ClaimStatus, next_claim_number};
use rusqlite::{OptionalExtension, Transaction, params};
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::Store;
use crate::error::{PersistenceError, is_unique_violation};
use crate::records::{ClaimRow, StatusTotal, format_timestamp};

/// How many times a colliding claim number is re-derived before giving up.
const CLAIM_NUMBER_RETRIES: u32 = 5;

const CLAIM_COLUMNS: &str = "claim_id, farmer_id, quotation_id, loss_assessor_id, claim_number,
                             estimated_loss_amount, approved_amount, status, approval_date,
                             loss_details_json";

fn map_claim_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClaimRow> {
    Ok(ClaimRow {
        claim_id: row.get(0)?,
        farmer_id: row.get(1)?,
        quotation_id: row.get(2)?,
        loss_assessor_id: row.get(3)?,
        claim_number: row.get(4)?,
        estimated_loss_amount: row.get(5)?,
        approved_amount: row.get(6)?,
        status: row.get(7)?,
        approval_date: row.get(8)?,
        loss_details_json: row.get(9)?,
    })
}

impl Store {
    /// Returns the most recently issued claim number under a prefix, if any.
    ///
    /// Zero-padded suffixes make the lexicographic maximum the numeric
    /// maximum.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn last_claim_number(&self, prefix: &str) -> Result<Option<String>, PersistenceError> {
        let pattern: String = format!("{prefix}-%");
        let last: Option<String> = self
            .conn
            .query_row(
                "SELECT claim_number FROM claims
                 WHERE claim_number LIKE ?1
                 ORDER BY claim_number DESC
                 LIMIT 1",
                params![pattern],
                |row| row.get(0),
            )
            .optional()?;
        Ok(last)
    }

    /// Files a claim, generating its claim number under the given date.
    ///
    /// The number is derived from the latest one issued today; if a
    /// concurrent filer wins the race for it, derivation retries against the
    /// fresh maximum a bounded number of times.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails for a reason other than a number
    /// collision, or if the retry budget is exhausted.
    pub fn file_claim(
        &self,
        claim: &Claim,
        filing_date: Date,
        now: OffsetDateTime,
    ) -> Result<(i64, String), PersistenceError> {
        let updated_at: String = format_timestamp(now)?;
        let loss_details_json: String = serde_json::to_string(&claim.loss_details)?;
        let prefix: String = agrisure_domain::claim_number_prefix(filing_date);

        for attempt in 0..CLAIM_NUMBER_RETRIES {
            let last: Option<String> = self.last_claim_number(&prefix)?;
            let claim_number: String = next_claim_number(filing_date, last.as_deref());

            let inserted = self.conn.execute(
                "INSERT INTO claims
                     (farmer_id, quotation_id, claim_number, estimated_loss_amount,
                      status, loss_details_json, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    claim.farmer_id,
                    claim.quotation_id,
                    claim_number,
                    claim.estimated_loss_amount.minor(),
                    claim.status.as_str(),
                    loss_details_json,
                    updated_at,
                ],
            );

            match inserted {
                Ok(_) => {
                    let claim_id: i64 = self.conn.last_insert_rowid();
                    info!(claim_id, claim_number, "Filed claim");
                    return Ok((claim_id, claim_number));
                }
                Err(ref e) if is_unique_violation(e) => {
                    warn!(claim_number, attempt, "Claim number collision, re-deriving");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(PersistenceError::ClaimNumberExhausted {
            attempts: CLAIM_NUMBER_RETRIES,
        })
    }

    /// Retrieves a claim by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed.
    pub fn claim_by_id(&self, claim_id: i64) -> Result<Option<Claim>, PersistenceError> {
        let row: Option<ClaimRow> = self
            .conn
            .query_row(
                &format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE claim_id = ?1"),
                params![claim_id],
                map_claim_row,
            )
            .optional()?;
        row.map(ClaimRow::into_domain).transpose()
    }

    /// Lists a farmer's claims, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub fn list_claims_for_farmer(&self, farmer_id: i64) -> Result<Vec<Claim>, PersistenceError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims
             WHERE farmer_id = ?1
             ORDER BY claim_id DESC"
        ))?;
        let rows = stmt.query_map(params![farmer_id], map_claim_row)?;

        let mut claims: Vec<Claim> = Vec::new();
        for row in rows {
            claims.push(row?.into_domain()?);
        }
        Ok(claims)
    }

    /// Updates the estimate and loss details on a claim that is still OPEN.
    ///
    /// Returns `false` if the claim had already entered assessment; offline
    /// edits never override an in-progress assessment.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the update fails.
    pub fn update_open_claim(
        &self,
        claim_id: i64,
        estimated_loss_minor: i64,
        loss_details: &agrisure_domain::LossDetails,
        now: OffsetDateTime,
    ) -> Result<bool, PersistenceError> {
        let updated_at: String = format_timestamp(now)?;
        let loss_details_json: String = serde_json::to_string(loss_details)?;
        let affected: usize = self.conn.execute(
            "UPDATE claims
             SET estimated_loss_amount = ?2, loss_details_json = ?3, updated_at = ?4
             WHERE claim_id = ?1 AND status = ?5",
            params![
                claim_id,
                estimated_loss_minor,
                loss_details_json,
                updated_at,
                ClaimStatus::Open.as_str(),
            ],
        )?;
        Ok(affected == 1)
    }

    /// Commits an assessor assignment: moves the claim to UNDER_ASSESSMENT
    /// and appends the audit row in one transaction.
    ///
    /// Re-assignment of a claim already under assessment is allowed; each
    /// assignment appends its own audit row. Returns `false` without writing
    /// anything if the claim was no longer assignable.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails.
    pub fn commit_assignment(
        &mut self,
        assignment: &ClaimAssignment,
    ) -> Result<bool, PersistenceError> {
        let assigned_at: String = format_timestamp(assignment.assignment_date)?;
        let tx: Transaction<'_> = self.conn.transaction()?;

        let affected: usize = tx.execute(
            "UPDATE claims
             SET status = ?2, loss_assessor_id = ?3, updated_at = ?4
             WHERE claim_id = ?1 AND status IN (?5, ?2)",
            params![
                assignment.claim_id,
                ClaimStatus::UnderAssessment.as_str(),
                assignment.loss_assessor_id,
                assigned_at,
                ClaimStatus::Open.as_str(),
            ],
        )?;
        if affected != 1 {
            // Claim left the assignable states; drop the transaction.
            return Ok(false);
        }

        tx.execute(
            "INSERT INTO claim_assignments
                 (claim_id, loss_assessor_id, assigned_by, assignment_date)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                assignment.claim_id,
                assignment.loss_assessor_id,
                assignment.assigned_by,
                assigned_at,
            ],
        )?;

        tx.commit()?;
        info!(
            claim_id = assignment.claim_id,
            loss_assessor_id = assignment.loss_assessor_id,
            "Assigned assessor"
        );
        Ok(true)
    }

    /// Lists a claim's assignment audit trail, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub fn list_assignments(
        &self,
        claim_id: i64,
    ) -> Result<Vec<ClaimAssignment>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT assignment_id, claim_id, loss_assessor_id, assigned_by, assignment_date
             FROM claim_assignments
             WHERE claim_id = ?1
             ORDER BY assignment_id ASC",
        )?;
        let rows = stmt.query_map(params![claim_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut assignments: Vec<ClaimAssignment> = Vec::new();
        for row in rows {
            let (assignment_id, claim_id, loss_assessor_id, assigned_by, assignment_date) = row?;
            assignments.push(ClaimAssignment {
                assignment_id: Some(assignment_id),
                claim_id,
                loss_assessor_id,
                assigned_by,
                assignment_date: crate::records::parse_timestamp(&assignment_date)?,
            });
        }
        Ok(assignments)
    }

    /// Commits a claim approval: UNDER_ASSESSMENT to PENDING_PAYMENT with the
    /// approved amount and date, conditional on the expected prior state.
    ///
    /// Returns `false` if no row transitioned.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn commit_claim_approved(
        &self,
        claim_id: i64,
        approved_amount_minor: i64,
        approval_date: OffsetDateTime,
    ) -> Result<bool, PersistenceError> {
        let approved_at: String = format_timestamp(approval_date)?;
        let affected: usize = self.conn.execute(
            "UPDATE claims
             SET status = ?2, approved_amount = ?3, approval_date = ?4, updated_at = ?4
             WHERE claim_id = ?1 AND status = ?5",
            params![
                claim_id,
                ClaimStatus::PendingPayment.as_str(),
                approved_amount_minor,
                approved_at,
                ClaimStatus::UnderAssessment.as_str(),
            ],
        )?;
        debug!(claim_id, affected, "Committed claim approval");
        Ok(affected == 1)
    }

    /// Commits a claim rejection from either pre-payment state.
    ///
    /// Returns `false` if no row transitioned.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn commit_claim_rejected(
        &self,
        claim_id: i64,
        now: OffsetDateTime,
    ) -> Result<bool, PersistenceError> {
        let updated_at: String = format_timestamp(now)?;
        let affected: usize = self.conn.execute(
            "UPDATE claims
             SET status = ?2, updated_at = ?3
             WHERE claim_id = ?1 AND status IN (?4, ?5)",
            params![
                claim_id,
                ClaimStatus::Rejected.as_str(),
                updated_at,
                ClaimStatus::Open.as_str(),
                ClaimStatus::UnderAssessment.as_str(),
            ],
        )?;
        debug!(claim_id, affected, "Committed claim rejection");
        Ok(affected == 1)
    }

    /// Commits a claim payout: PENDING_PAYMENT to PAID.
    ///
    /// Returns `false` if no row transitioned.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn commit_claim_paid(
        &self,
        claim_id: i64,
        now: OffsetDateTime,
    ) -> Result<bool, PersistenceError> {
        let updated_at: String = format_timestamp(now)?;
        let affected: usize = self.conn.execute(
            "UPDATE claims
             SET status = ?2, updated_at = ?3
             WHERE claim_id = ?1 AND status = ?4",
            params![
                claim_id,
                ClaimStatus::Paid.as_str(),
                updated_at,
                ClaimStatus::PendingPayment.as_str(),
            ],
        )?;
        debug!(claim_id, affected, "Committed claim payout");
        Ok(affected == 1)
    }

    /// Aggregates an organization's claims by status with summed estimated
    /// losses.
    ///
    /// Claims carry no organization column; tenancy goes through the filing
    /// farmer.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn claim_statistics(
        &self,
        organization_id: i64,
    ) -> Result<Vec<StatusTotal>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT c.status, COUNT(*), COALESCE(SUM(c.estimated_loss_amount), 0)
             FROM claims c
             JOIN farmers f ON f.farmer_id = c.farmer_id
             WHERE f.organization_id = ?1
             GROUP BY c.status
             ORDER BY c.status ASC",
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
