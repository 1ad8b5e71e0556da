// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Organization, farmer, farm, product, assessor, and subsidy persistence.

use agrisure_domain::{Farm, Farmer, InsuranceProduct, LossAssessor, Organization, Subsidy};
use rusqlite::{OptionalExtension, params};
use time::OffsetDateTime;
use tracing::info;

use crate::Store;
use crate::error::PersistenceError;
use crate::records::{AssessorRow, FarmRow, FarmerRow, format_timestamp};

fn map_farmer_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FarmerRow> {
    Ok(FarmerRow {
        farmer_id: row.get(0)?,
        organization_id: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        id_number: row.get(4)?,
        phone_number: row.get(5)?,
        status: row.get(6)?,
    })
}

impl Store {
    /// Creates an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is already taken.
    pub fn insert_organization(&self, code: &str, name: &str) -> Result<i64, PersistenceError> {
        self.conn.execute(
            "INSERT INTO organizations (code, name) VALUES (?1, ?2)",
            params![code, name],
        )?;
        let organization_id: i64 = self.conn.last_insert_rowid();
        info!(organization_id, code, "Created organization");
        Ok(organization_id)
    }

    /// Retrieves a non-deleted organization by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn organization_by_code(
        &self,
        code: &str,
    ) -> Result<Option<Organization>, PersistenceError> {
        let org: Option<Organization> = self
            .conn
            .query_row(
                "SELECT organization_id, code, name, is_deleted
                 FROM organizations
                 WHERE code = ?1 AND is_deleted = 0",
                params![code],
                |row| {
                    Ok(Organization {
                        organization_id: Some(row.get(0)?),
                        code: row.get(1)?,
                        name: row.get(2)?,
                        is_deleted: row.get::<_, i64>(3)? != 0,
                    })
                },
            )
            .optional()?;
        Ok(org)
    }

    /// Soft-deletes an organization by code.
    ///
    /// The row stays behind so foreign keys keep resolving.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn soft_delete_organization(&self, code: &str) -> Result<usize, PersistenceError> {
        let updated: usize = self.conn.execute(
            "UPDATE organizations SET is_deleted = 1 WHERE code = ?1",
            params![code],
        )?;
        info!(code, updated, "Soft-deleted organization");
        Ok(updated)
    }

    // ------------------------------------------------------------------
    // Farmers
    // ------------------------------------------------------------------

    /// Creates a farmer.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID number is already registered or the insert
    /// fails.
    pub fn insert_farmer(
        &self,
        farmer: &Farmer,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        let updated_at: String = format_timestamp(now)?;
        self.conn.execute(
            "INSERT INTO farmers
                 (organization_id, first_name, last_name, id_number, phone_number,
                  status, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                farmer.organization_id,
                farmer.first_name,
                farmer.last_name,
                farmer.id_number,
                farmer.phone_number,
                farmer.status.as_str(),
                updated_at,
            ],
        )?;
        let farmer_id: i64 = self.conn.last_insert_rowid();
        info!(farmer_id, id_number = farmer.id_number, "Created farmer");
        Ok(farmer_id)
    }

    /// Retrieves a farmer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed.
    pub fn farmer_by_id(&self, farmer_id: i64) -> Result<Option<Farmer>, PersistenceError> {
        let row: Option<FarmerRow> = self
            .conn
            .query_row(
                "SELECT farmer_id, organization_id, first_name, last_name, id_number,
                        phone_number, status
                 FROM farmers
                 WHERE farmer_id = ?1",
                params![farmer_id],
                map_farmer_row,
            )
            .optional()?;
        row.map(FarmerRow::into_domain).transpose()
    }

    /// Updates a farmer's contact details and status, bumping `updated_at`
    /// so the row surfaces in sync deltas.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_farmer(
        &self,
        farmer: &Farmer,
        now: OffsetDateTime,
    ) -> Result<usize, PersistenceError> {
        let farmer_id: i64 = farmer
            .farmer_id
            .ok_or_else(|| PersistenceError::InvalidRow("farmer without id".to_string()))?;
        let updated_at: String = format_timestamp(now)?;
        Ok(self.conn.execute(
            "UPDATE farmers
             SET first_name = ?2, last_name = ?3, phone_number = ?4, status = ?5,
                 updated_at = ?6
             WHERE farmer_id = ?1",
            params![
                farmer_id,
                farmer.first_name,
                farmer.last_name,
                farmer.phone_number,
                farmer.status.as_str(),
                updated_at,
            ],
        )?)
    }

    /// Lists an organization's farmers, most recently changed first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub fn list_farmers(&self, organization_id: i64) -> Result<Vec<Farmer>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT farmer_id, organization_id, first_name, last_name, id_number,
                    phone_number, status
             FROM farmers
             WHERE organization_id = ?1
             ORDER BY updated_at DESC, farmer_id DESC",
        )?;
        let rows = stmt.query_map(params![organization_id], map_farmer_row)?;

        let mut farmers: Vec<Farmer> = Vec::new();
        for row in rows {
            farmers.push(row?.into_domain()?);
        }
        Ok(farmers)
    }

    // ------------------------------------------------------------------
    // Farms
    // ------------------------------------------------------------------

    /// Creates a farm under a farmer.
    ///
    /// # Errors
    ///
    /// Returns an error if the farmer does not exist or the insert fails.
    pub fn insert_farm(&self, farm: &Farm, now: OffsetDateTime) -> Result<i64, PersistenceError> {
        let updated_at: String = format_timestamp(now)?;
        self.conn.execute(
            "INSERT INTO farms (farmer_id, name, size, unit_of_measure, status, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                farm.farmer_id,
                farm.name,
                farm.size,
                farm.unit_of_measure,
                farm.status.as_str(),
                updated_at,
            ],
        )?;
        let farm_id: i64 = self.conn.last_insert_rowid();
        info!(farm_id, farmer_id = farm.farmer_id, "Created farm");
        Ok(farm_id)
    }

    /// Retrieves a farm by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed.
    pub fn farm_by_id(&self, farm_id: i64) -> Result<Option<Farm>, PersistenceError> {
        let row: Option<FarmRow> = self
            .conn
            .query_row(
                "SELECT farm_id, farmer_id, name, size, unit_of_measure, status
                 FROM farms
                 WHERE farm_id = ?1",
                params![farm_id],
                |row| {
                    Ok(FarmRow {
                        farm_id: row.get(0)?,
                        farmer_id: row.get(1)?,
                        name: row.get(2)?,
                        size: row.get(3)?,
                        unit_of_measure: row.get(4)?,
                        status: row.get(5)?,
                    })
                },
            )
            .optional()?;
        row.map(FarmRow::into_domain).transpose()
    }

    /// Updates a farm's descriptive fields and status, bumping `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_farm(&self, farm: &Farm, now: OffsetDateTime) -> Result<usize, PersistenceError> {
        let farm_id: i64 = farm
            .farm_id
            .ok_or_else(|| PersistenceError::InvalidRow("farm without id".to_string()))?;
        let updated_at: String = format_timestamp(now)?;
        Ok(self.conn.execute(
            "UPDATE farms
             SET name = ?2, size = ?3, unit_of_measure = ?4, status = ?5, updated_at = ?6
             WHERE farm_id = ?1",
            params![
                farm_id,
                farm.name,
                farm.size,
                farm.unit_of_measure,
                farm.status.as_str(),
                updated_at,
            ],
        )?)
    }

    // ------------------------------------------------------------------
    // Insurance products
    // ------------------------------------------------------------------

    /// Creates an insurance product.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_product(&self, product: &InsuranceProduct) -> Result<i64, PersistenceError> {
        self.conn.execute(
            "INSERT INTO insurance_products (name, status) VALUES (?1, ?2)",
            params![product.name, product.status.as_str()],
        )?;
        let product_id: i64 = self.conn.last_insert_rowid();
        info!(product_id, name = product.name, "Created insurance product");
        Ok(product_id)
    }

    /// Retrieves an insurance product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed.
    pub fn product_by_id(
        &self,
        product_id: i64,
    ) -> Result<Option<InsuranceProduct>, PersistenceError> {
        let raw: Option<(i64, String, String)> = self
            .conn
            .query_row(
                "SELECT product_id, name, status FROM insurance_products WHERE product_id = ?1",
                params![product_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        raw.map(|(id, name, status)| {
            Ok(InsuranceProduct {
                product_id: Some(id),
                name,
                status: status.parse()?,
            })
        })
        .transpose()
    }

    // ------------------------------------------------------------------
    // Loss assessors
    // ------------------------------------------------------------------

    /// Registers a user as a loss assessor.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the insert fails.
    pub fn insert_assessor(&self, assessor: &LossAssessor) -> Result<i64, PersistenceError> {
        self.conn.execute(
            "INSERT INTO loss_assessors (user_id, organization_id, status)
             VALUES (?1, ?2, ?3)",
            params![
                assessor.user_id,
                assessor.organization_id,
                assessor.status.as_str(),
            ],
        )?;
        let assessor_id: i64 = self.conn.last_insert_rowid();
        info!(assessor_id, user_id = assessor.user_id, "Created loss assessor");
        Ok(assessor_id)
    }

    /// Retrieves a loss assessor by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed.
    pub fn assessor_by_id(
        &self,
        assessor_id: i64,
    ) -> Result<Option<LossAssessor>, PersistenceError> {
        let row: Option<AssessorRow> = self
            .conn
            .query_row(
                "SELECT assessor_id, user_id, organization_id, status
                 FROM loss_assessors
                 WHERE assessor_id = ?1",
                params![assessor_id],
                |row| {
                    Ok(AssessorRow {
                        assessor_id: row.get(0)?,
                        user_id: row.get(1)?,
                        organization_id: row.get(2)?,
                        status: row.get(3)?,
                    })
                },
            )
            .optional()?;
        row.map(AssessorRow::into_domain).transpose()
    }

    // ------------------------------------------------------------------
    // Subsidies
    // ------------------------------------------------------------------

    /// Creates a subsidy program.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_subsidy(&self, subsidy: &Subsidy) -> Result<i64, PersistenceError> {
        self.conn.execute(
            "INSERT INTO subsidies (organization_id, name, rate_basis_points, status)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                subsidy.organization_id,
                subsidy.name,
                subsidy.rate_basis_points,
                subsidy.status.as_str(),
            ],
        )?;
        let subsidy_id: i64 = self.conn.last_insert_rowid();
        info!(subsidy_id, name = subsidy.name, "Created subsidy");
        Ok(subsidy_id)
    }
}
