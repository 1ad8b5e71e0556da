// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::dto::{CreateFarmRequest, CreateFarmerRequest, FarmDto, FarmerDto};
use crate::error::ApiError;
use crate::registry;
use crate::tests::{T0, admin, default_org, principal_in_other_org, seed_farmer, store};

fn farmer_request(id_number: &str) -> CreateFarmerRequest {
    CreateFarmerRequest {
        first_name: "  Rudo ".to_string(),
        last_name: "Chirwa".to_string(),
        id_number: id_number.to_string(),
        phone_number: "+265991234567".to_string(),
    }
}

#[test]
fn farmer_registration_trims_and_scopes() {
    let store = store();
    let actor = admin(&store);

    let farmer: FarmerDto =
        registry::create_farmer(&store, &actor, &farmer_request("NID-1001"), T0).unwrap();
    assert_eq!(farmer.first_name, "Rudo");
    assert_eq!(farmer.organization_id, default_org(&store));
    assert_eq!(farmer.status, "ACTIVE");

    let listed = registry::list_farmers(&store, &actor).unwrap();
    assert_eq!(listed.len(), 1);
}

#[test]
fn blank_fields_are_rejected() {
    let store = store();
    let actor = admin(&store);
    let mut request = farmer_request("NID-1002");
    request.phone_number = "   ".to_string();

    let err = registry::create_farmer(&store, &actor, &request, T0).unwrap_err();
    assert_eq!(
        err,
        ApiError::Validation("phone_number cannot be empty".to_string())
    );
}

#[test]
fn farm_requires_a_farmer_in_the_callers_organization() {
    let store = store();
    let actor = admin(&store);
    let farmer_id: i64 = seed_farmer(&store, "NID-1003");

    let farm: FarmDto = registry::create_farm(
        &store,
        &actor,
        &CreateFarmRequest {
            farmer_id,
            name: "River Plot".to_string(),
            size: 1200,
            unit_of_measure: "HA".to_string(),
        },
        T0,
    )
    .unwrap();
    assert_eq!(farm.farmer_id, farmer_id);

    // A farmer in another organization reads as missing.
    let other_org: i64 = store.insert_organization("COOP-EAST", "Eastern Coop").unwrap();
    let mut actor_elsewhere = actor.clone();
    actor_elsewhere.user.organization_id = other_org;
    let err = registry::create_farm(
        &store,
        &actor_elsewhere,
        &CreateFarmRequest {
            farmer_id,
            name: "Hill Plot".to_string(),
            size: 300,
            unit_of_measure: "HA".to_string(),
        },
        T0,
    )
    .unwrap_err();
    assert_eq!(err, ApiError::NotFound(format!("Farmer {farmer_id}")));
}

#[test]
fn farmers_are_invisible_outside_their_organization() {
    let store = store();
    let actor = admin(&store);
    let farmer_id: i64 = seed_farmer(&store, "NID-1005");
    let actor_elsewhere = principal_in_other_org(&store, &actor);

    let err = registry::get_farmer(&store, &actor_elsewhere, farmer_id).unwrap_err();
    assert_eq!(err, ApiError::NotFound(format!("Farmer {farmer_id}")));

    let owned: FarmerDto = registry::get_farmer(&store, &actor, farmer_id).unwrap();
    assert_eq!(owned.id_number, "NID-1005");
}

#[test]
fn farm_size_must_be_positive() {
    let store = store();
    let actor = admin(&store);
    let farmer_id: i64 = seed_farmer(&store, "NID-1004");

    let err = registry::create_farm(
        &store,
        &actor,
        &CreateFarmRequest {
            farmer_id,
            name: "River Plot".to_string(),
            size: 0,
            unit_of_measure: "HA".to_string(),
        },
        T0,
    )
    .unwrap_err();
    assert_eq!(err, ApiError::Validation("size must be positive".to_string()));
}
