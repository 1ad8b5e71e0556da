// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The offline-client synchronization handler.
//!
//! Uploads apply best-effort: item failures collect into per-entity error
//! lists and never fail the batch. Rows changed on the server since the
//! client's last sync ride back as server updates; ids present on both
//! sides are conflicts resolved server-wins, so their uploads are skipped
//! and the server version prevails.

use agrisure::{SyncConflict, SyncEntity, authorize, create_claim, create_quotation,
    detect_conflicts, parse_last_sync};
use agrisure_domain::{
    Action, Claim, EntityStatus, Farm, Farmer, LossDetails, Money, Quotation, Resource,
    normalize_loss_details,
};
use agrisure_persistence::{Store, SyncDeltas};
use std::str::FromStr;
use time::OffsetDateTime;
use tracing::info;

use crate::auth::Principal;
use crate::dto::{
    ClaimDto, ClaimUpload, ConflictDto, FarmDto, FarmUpload, FarmerDto, FarmerUpload, QuotationDto,
    QuotationUpload, ServerUpdates, SyncRequest, SyncResponse, UploadError, UploadOutcome,
    UploadResults, fmt_ts,
};
use crate::error::ApiError;

struct UploadContext<'a> {
    store: &'a Store,
    organization_id: i64,
    now: OffsetDateTime,
}

impl UploadContext<'_> {
    /// Fetches a farmer only if it belongs to the syncing organization;
    /// cross-tenant ids read as missing.
    fn own_farmer(&self, farmer_id: i64) -> Result<Farmer, ApiError> {
        self.store
            .farmer_by_id(farmer_id)?
            .filter(|farmer| farmer.organization_id == self.organization_id)
            .ok_or_else(|| ApiError::NotFound(format!("Farmer {farmer_id}")))
    }

    fn apply_farmer(&self, upload: &FarmerUpload) -> Result<(), ApiError> {
        let status: EntityStatus = match upload.status.as_deref() {
            Some(raw) => EntityStatus::from_str(raw)?,
            None => EntityStatus::Active,
        };

        if let Some(farmer_id) = upload.farmer_id {
            let mut farmer: Farmer = self.own_farmer(farmer_id)?;
            farmer.first_name = upload.first_name.clone();
            farmer.last_name = upload.last_name.clone();
            farmer.phone_number = upload.phone_number.clone();
            farmer.status = status;
            self.store.update_farmer(&farmer, self.now)?;
        } else {
            let farmer: Farmer = Farmer {
                farmer_id: None,
                organization_id: self.organization_id,
                first_name: upload.first_name.clone(),
                last_name: upload.last_name.clone(),
                id_number: upload.id_number.clone(),
                phone_number: upload.phone_number.clone(),
                status,
            };
            self.store.insert_farmer(&farmer, self.now)?;
        }
        Ok(())
    }

    fn apply_farm(&self, upload: &FarmUpload) -> Result<(), ApiError> {
        let status: EntityStatus = match upload.status.as_deref() {
            Some(raw) => EntityStatus::from_str(raw)?,
            None => EntityStatus::Active,
        };
        // The owning farmer anchors tenancy either way.
        let _: Farmer = self.own_farmer(upload.farmer_id)?;

        if let Some(farm_id) = upload.farm_id {
            let mut farm: Farm = self
                .store
                .farm_by_id(farm_id)?
                .filter(|farm| farm.farmer_id == upload.farmer_id)
                .ok_or_else(|| ApiError::NotFound(format!("Farm {farm_id}")))?;
            farm.name = upload.name.clone();
            farm.size = upload.size;
            farm.unit_of_measure = upload.unit_of_measure.clone();
            farm.status = status;
            self.store.update_farm(&farm, self.now)?;
        } else {
            let farm: Farm = Farm {
                farm_id: None,
                farmer_id: upload.farmer_id,
                name: upload.name.clone(),
                size: upload.size,
                unit_of_measure: upload.unit_of_measure.clone(),
                status,
            };
            self.store.insert_farm(&farm, self.now)?;
        }
        Ok(())
    }

    fn apply_quotation(&self, upload: &QuotationUpload) -> Result<(), ApiError> {
        let farmer: Farmer = self.own_farmer(upload.farmer_id)?;

        if let Some(quotation_id) = upload.quotation_id {
            let _: Quotation = self
                .store
                .quotation_by_id(quotation_id)?
                .filter(|quotation| quotation.farmer_id == upload.farmer_id)
                .ok_or_else(|| ApiError::NotFound(format!("Quotation {quotation_id}")))?;
            if !self.store.update_open_quotation(
                quotation_id,
                upload.premium_amount,
                upload.sum_insured,
                self.now,
            )? {
                return Err(ApiError::Validation(format!(
                    "Quotation {quotation_id} is no longer editable"
                )));
            }
        } else {
            let farm: Farm = self
                .store
                .farm_by_id(upload.farm_id)?
                .ok_or_else(|| ApiError::NotFound(format!("Farm {}", upload.farm_id)))?;
            let product = self
                .store
                .product_by_id(upload.product_id)?
                .ok_or_else(|| ApiError::NotFound(format!("Product {}", upload.product_id)))?;
            let quotation: Quotation = create_quotation(
                &farmer,
                &farm,
                &product,
                Money::from_minor(upload.premium_amount),
                Money::from_minor(upload.sum_insured),
            )?;
            self.store.insert_quotation(&quotation, self.now)?;
        }
        Ok(())
    }

    fn apply_claim(&self, upload: &ClaimUpload) -> Result<(), ApiError> {
        let farmer: Farmer = self.own_farmer(upload.farmer_id)?;

        if let Some(claim_id) = upload.claim_id {
            let _: Claim = self
                .store
                .claim_by_id(claim_id)?
                .filter(|claim| claim.farmer_id == upload.farmer_id)
                .ok_or_else(|| ApiError::NotFound(format!("Claim {claim_id}")))?;
            let details: LossDetails = normalize_loss_details(upload.loss_details.as_ref())?;
            if !self.store.update_open_claim(
                claim_id,
                upload.estimated_loss_amount,
                &details,
                self.now,
            )? {
                return Err(ApiError::Validation(format!(
                    "Claim {claim_id} is no longer editable"
                )));
            }
        } else {
            let quotation: Quotation = self
                .store
                .quotation_by_id(upload.quotation_id)?
                .ok_or_else(|| ApiError::NotFound(format!("Quotation {}", upload.quotation_id)))?;
            let claim: Claim = create_claim(
                &farmer,
                &quotation,
                String::new(),
                Money::from_minor(upload.estimated_loss_amount),
                upload.loss_details.as_ref(),
            )?;
            self.store.file_claim(&claim, self.now.date(), self.now)?;
        }
        Ok(())
    }
}

fn apply_all<T>(
    items: &[T],
    item_id: impl Fn(&T) -> Option<i64>,
    skip: &[i64],
    mut apply: impl FnMut(&T) -> Result<(), ApiError>,
) -> UploadOutcome {
    let mut outcome: UploadOutcome = UploadOutcome::default();
    for (index, item) in items.iter().enumerate() {
        let entity_id: Option<i64> = item_id(item);
        if entity_id.is_some_and(|id| skip.contains(&id)) {
            // Conflicted: the server version wins, the upload is dropped.
            continue;
        }
        match apply(item) {
            Ok(()) => outcome.applied += 1,
            Err(err) => outcome.errors.push(UploadError {
                index,
                entity_id,
                message: err.to_string(),
            }),
        }
    }
    outcome
}

fn conflicts_for<T>(
    entity: SyncEntity,
    items: &[T],
    item_id: impl Fn(&T) -> Option<i64>,
    server_ids: &[i64],
) -> Vec<SyncConflict> {
    let uploaded: Vec<i64> = items.iter().filter_map(item_id).collect();
    detect_conflicts(entity, &uploaded, server_ids)
}

/// Runs one synchronization round for the caller's organization.
///
/// # Errors
///
/// Returns an error if the caller is not permitted or a delta query fails;
/// individual upload failures are reported in the response instead.
pub fn sync(
    store: &Store,
    principal: &Principal,
    request: &SyncRequest,
    now: OffsetDateTime,
) -> Result<SyncResponse, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Sync,
        Action::Create,
    )?;
    let organization_id: i64 = principal.user.organization_id;

    let since: OffsetDateTime = parse_last_sync(request.last_sync_timestamp.as_deref());
    let deltas: SyncDeltas = store.sync_deltas(organization_id, since)?;

    let pending = &request.pending_data;
    let mut conflicts: Vec<SyncConflict> = Vec::new();
    conflicts.extend(conflicts_for(
        SyncEntity::Farmers,
        &pending.farmers,
        |f| f.farmer_id,
        &deltas.farmer_ids(),
    ));
    conflicts.extend(conflicts_for(
        SyncEntity::Farms,
        &pending.farms,
        |f| f.farm_id,
        &deltas.farm_ids(),
    ));
    conflicts.extend(conflicts_for(
        SyncEntity::Quotations,
        &pending.quotations,
        |q| q.quotation_id,
        &deltas.quotation_ids(),
    ));
    conflicts.extend(conflicts_for(
        SyncEntity::Claims,
        &pending.claims,
        |c| c.claim_id,
        &deltas.claim_ids(),
    ));

    let skip_farmers: Vec<i64> = conflict_ids(&conflicts, SyncEntity::Farmers);
    let skip_farms: Vec<i64> = conflict_ids(&conflicts, SyncEntity::Farms);
    let skip_quotations: Vec<i64> = conflict_ids(&conflicts, SyncEntity::Quotations);
    let skip_claims: Vec<i64> = conflict_ids(&conflicts, SyncEntity::Claims);

    let ctx: UploadContext<'_> = UploadContext {
        store,
        organization_id,
        now,
    };
    let upload_results: UploadResults = UploadResults {
        farmers: apply_all(&pending.farmers, |f| f.farmer_id, &skip_farmers, |f| {
            ctx.apply_farmer(f)
        }),
        farms: apply_all(&pending.farms, |f| f.farm_id, &skip_farms, |f| {
            ctx.apply_farm(f)
        }),
        quotations: apply_all(
            &pending.quotations,
            |q| q.quotation_id,
            &skip_quotations,
            |q| ctx.apply_quotation(q),
        ),
        claims: apply_all(&pending.claims, |c| c.claim_id, &skip_claims, |c| {
            ctx.apply_claim(c)
        }),
    };

    info!(
        organization_id,
        server_changes = deltas.len(),
        conflicts = conflicts.len(),
        "Sync round complete"
    );

    Ok(SyncResponse {
        upload_results,
        server_updates: ServerUpdates {
            farmers: deltas.farmers.iter().map(FarmerDto::from).collect(),
            farms: deltas.farms.iter().map(FarmDto::from).collect(),
            quotations: deltas.quotations.iter().map(QuotationDto::from).collect(),
            claims: deltas.claims.iter().map(ClaimDto::from).collect(),
        },
        conflicts: conflicts
            .iter()
            .map(|c| ConflictDto {
                entity: c.entity.as_str().to_string(),
                entity_id: c.entity_id,
                resolution: c.resolution.as_str().to_string(),
            })
            .collect(),
        sync_timestamp: fmt_ts(now),
    })
}

fn conflict_ids(conflicts: &[SyncConflict], entity: SyncEntity) -> Vec<i64> {
    conflicts
        .iter()
        .filter(|c| c.entity == entity)
        .map(|c| c.entity_id)
        .collect()
}
