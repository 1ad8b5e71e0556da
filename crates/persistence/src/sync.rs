// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Delta queries for offline-client synchronization.
//!
//! Every syncable table carries an `updated_at` RFC 3339 TEXT column in UTC,
//! so `updated_at > ?since` is a plain string comparison. Farms, quotations,
//! and claims have no organization column of their own; tenancy is resolved
//! through the owning farmer.

use agrisure_domain::{Claim, Farm, Farmer, Quotation};
use rusqlite::params;
use time::OffsetDateTime;
use tracing::debug;

use crate::Store;
use crate::error::PersistenceError;
use crate::records::{ClaimRow, FarmRow, FarmerRow, QuotationRow, format_timestamp};

/// Everything that changed in one organization since a client's last sync.
#[derive(Debug, Clone, Default)]
pub struct SyncDeltas {
    /// Farmers changed since the cutoff.
    pub farmers: Vec<Farmer>,
    /// Farms changed since the cutoff.
    pub farms: Vec<Farm>,
    /// Quotations changed since the cutoff.
    pub quotations: Vec<Quotation>,
    /// Claims changed since the cutoff.
    pub claims: Vec<Claim>,
}

impl SyncDeltas {
    /// Returns the total number of changed rows across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.farmers.len() + self.farms.len() + self.quotations.len() + self.claims.len()
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the IDs of the changed quotations.
    #[must_use]
    pub fn quotation_ids(&self) -> Vec<i64> {
        self.quotations.iter().filter_map(|q| q.quotation_id).collect()
    }

    /// Returns the IDs of the changed claims.
    #[must_use]
    pub fn claim_ids(&self) -> Vec<i64> {
        self.claims.iter().filter_map(|c| c.claim_id).collect()
    }

    /// Returns the IDs of the changed farmers.
    #[must_use]
    pub fn farmer_ids(&self) -> Vec<i64> {
        self.farmers.iter().filter_map(|f| f.farmer_id).collect()
    }

    /// Returns the IDs of the changed farms.
    #[must_use]
    pub fn farm_ids(&self) -> Vec<i64> {
        self.farms.iter().filter_map(|f| f.farm_id).collect()
    }
}

impl Store {
    /// Collects every row in the organization changed strictly after `since`.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a row is malformed.
    pub fn sync_deltas(
        &self,
        organization_id: i64,
        since: OffsetDateTime,
    ) -> Result<SyncDeltas, PersistenceError> {
        let cutoff: String = format_timestamp(since)?;

        let deltas: SyncDeltas = SyncDeltas {
            farmers: self.farmers_modified_since(organization_id, &cutoff)?,
            farms: self.farms_modified_since(organization_id, &cutoff)?,
            quotations: self.quotations_modified_since(organization_id, &cutoff)?,
            claims: self.claims_modified_since(organization_id, &cutoff)?,
        };
        debug!(organization_id, changed = deltas.len(), "Collected sync deltas");
        Ok(deltas)
    }

    fn farmers_modified_since(
        &self,
        organization_id: i64,
        cutoff: &str,
    ) -> Result<Vec<Farmer>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT farmer_id, organization_id, first_name, last_name, id_number,
                    phone_number, status
             FROM farmers
             WHERE organization_id = ?1 AND updated_at > ?2
             ORDER BY farmer_id ASC",
        )?;
        let rows = stmt.query_map(params![organization_id, cutoff], |row| {
            Ok(FarmerRow {
                farmer_id: row.get(0)?,
                organization_id: row.get(1)?,
                first_name: row.get(2)?,
                last_name: row.get(3)?,
                id_number: row.get(4)?,
                phone_number: row.get(5)?,
                status: row.get(6)?,
            })
        })?;

        let mut farmers: Vec<Farmer> = Vec::new();
        for row in rows {
            farmers.push(row?.into_domain()?);
        }
        Ok(farmers)
    }

    fn farms_modified_since(
        &self,
        organization_id: i64,
        cutoff: &str,
    ) -> Result<Vec<Farm>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT f.farm_id, f.farmer_id, f.name, f.size, f.unit_of_measure, f.status
             FROM farms f
             JOIN farmers o ON o.farmer_id = f.farmer_id
             WHERE o.organization_id = ?1 AND f.updated_at > ?2
             ORDER BY f.farm_id ASC",
        )?;
        let rows = stmt.query_map(params![organization_id, cutoff], |row| {
            Ok(FarmRow {
                farm_id: row.get(0)?,
                farmer_id: row.get(1)?,
                name: row.get(2)?,
                size: row.get(3)?,
                unit_of_measure: row.get(4)?,
                status: row.get(5)?,
            })
        })?;

        let mut farms: Vec<Farm> = Vec::new();
        for row in rows {
            farms.push(row?.into_domain()?);
        }
        Ok(farms)
    }

    fn quotations_modified_since(
        &self,
        organization_id: i64,
        cutoff: &str,
    ) -> Result<Vec<Quotation>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT q.quotation_id, q.farmer_id, q.farm_id, q.product_id, q.policy_number,
                    q.premium_amount, q.sum_insured, q.status, q.payment_date,
                    q.payment_reference
             FROM quotations q
             JOIN farmers o ON o.farmer_id = q.farmer_id
             WHERE o.organization_id = ?1 AND q.updated_at > ?2
             ORDER BY q.quotation_id ASC",
        )?;
        let rows = stmt.query_map(params![organization_id, cutoff], |row| {
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
        })?;

        let mut quotations: Vec<Quotation> = Vec::new();
        for row in rows {
            quotations.push(row?.into_domain()?);
        }
        Ok(quotations)
    }

    fn claims_modified_since(
        &self,
        organization_id: i64,
        cutoff: &str,
    ) -> Result<Vec<Claim>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT c.claim_id, c.farmer_id, c.quotation_id, c.loss_assessor_id,
                    c.claim_number, c.estimated_loss_amount, c.approved_amount, c.status,
                    c.approval_date, c.loss_details_json
             FROM claims c
             JOIN farmers o ON o.farmer_id = c.farmer_id
             WHERE o.organization_id = ?1 AND c.updated_at > ?2
             ORDER BY c.claim_id ASC",
        )?;
        let rows = stmt.query_map(params![organization_id, cutoff], |row| {
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
        })?;

        let mut claims: Vec<Claim> = Vec::new();
        for row in rows {
            claims.push(row?.into_domain()?);
        }
        Ok(claims)
    }
}
