// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Farmer and farm handlers.

use agrisure::authorize;
use agrisure_domain::{Action, EntityStatus, Farm, Farmer, Resource};
use agrisure_persistence::Store;
use time::OffsetDateTime;

use crate::auth::Principal;
use crate::dto::{CreateFarmRequest, CreateFarmerRequest, FarmDto, FarmerDto};
use crate::error::ApiError;

/// Registers a farmer in the caller's organization.
///
/// # Errors
///
/// Returns an error if the caller is not permitted, a field is blank, or
/// the national ID is already registered.
pub fn create_farmer(
    store: &Store,
    principal: &Principal,
    request: &CreateFarmerRequest,
    now: OffsetDateTime,
) -> Result<FarmerDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Farmers,
        Action::Create,
    )?;

    for (field, value) in [
        ("first_name", &request.first_name),
        ("last_name", &request.last_name),
        ("id_number", &request.id_number),
        ("phone_number", &request.phone_number),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::Validation(format!("{field} cannot be empty")));
        }
    }

    let farmer: Farmer = Farmer {
        farmer_id: None,
        organization_id: principal.user.organization_id,
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        id_number: request.id_number.trim().to_string(),
        phone_number: request.phone_number.trim().to_string(),
        status: EntityStatus::Active,
    };
    let farmer_id: i64 = store.insert_farmer(&farmer, now)?;

    let stored: Farmer = store
        .farmer_by_id(farmer_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Farmer {farmer_id}")))?;
    Ok(FarmerDto::from(&stored))
}

/// Retrieves a farmer.
///
/// # Errors
///
/// Returns an error if the caller is not permitted or the farmer does not
/// exist.
pub fn get_farmer(
    store: &Store,
    principal: &Principal,
    farmer_id: i64,
) -> Result<FarmerDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Farmers,
        Action::Read,
    )?;
    let farmer: Farmer = store
        .farmer_by_id(farmer_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Farmer {farmer_id}")))?;
    if farmer.organization_id != principal.user.organization_id {
        return Err(ApiError::NotFound(format!("Farmer {farmer_id}")));
    }
    Ok(FarmerDto::from(&farmer))
}

/// Lists the caller's organization's farmers.
///
/// # Errors
///
/// Returns an error if the caller is not permitted.
pub fn list_farmers(store: &Store, principal: &Principal) -> Result<Vec<FarmerDto>, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Farmers,
        Action::Read,
    )?;
    let farmers: Vec<Farmer> = store.list_farmers(principal.user.organization_id)?;
    Ok(farmers.iter().map(FarmerDto::from).collect())
}

/// Registers a farm under a farmer in the caller's organization.
///
/// # Errors
///
/// Returns an error if the caller is not permitted, the farmer does not
/// exist or belongs to another organization, or a field is invalid.
pub fn create_farm(
    store: &Store,
    principal: &Principal,
    request: &CreateFarmRequest,
    now: OffsetDateTime,
) -> Result<FarmDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Farms,
        Action::Create,
    )?;

    let farmer: Farmer = store
        .farmer_by_id(request.farmer_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Farmer {}", request.farmer_id)))?;
    if farmer.organization_id != principal.user.organization_id {
        return Err(ApiError::NotFound(format!("Farmer {}", request.farmer_id)));
    }
    if request.name.trim().is_empty() {
        return Err(ApiError::Validation("name cannot be empty".to_string()));
    }
    if request.size <= 0 {
        return Err(ApiError::Validation("size must be positive".to_string()));
    }

    let farm: Farm = Farm {
        farm_id: None,
        farmer_id: request.farmer_id,
        name: request.name.trim().to_string(),
        size: request.size,
        unit_of_measure: request.unit_of_measure.trim().to_string(),
        status: EntityStatus::Active,
    };
    let farm_id: i64 = store.insert_farm(&farm, now)?;

    let stored: Farm = store
        .farm_by_id(farm_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Farm {farm_id}")))?;
    Ok(FarmDto::from(&stored))
}
