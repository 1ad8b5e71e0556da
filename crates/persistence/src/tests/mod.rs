// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod accounts;
mod invoices;
mod seed;

use agrisure_domain::{
    Claim, ClaimStatus, EntityStatus, Farm, Farmer, InsuranceProduct, Invoice, InvoiceStatus,
    LossAssessor, Money, Quotation, QuotationStatus, RoleName, Subsidy,
};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::Store;

pub const T0: OffsetDateTime = datetime!(2026-08-23 08:00 UTC);
pub const T1: OffsetDateTime = datetime!(2026-08-23 09:00 UTC);
pub const T2: OffsetDateTime = datetime!(2026-08-23 10:00 UTC);

pub fn store() -> Store {
    Store::new_in_memory().unwrap()
}

pub fn default_org(store: &Store) -> i64 {
    store
        .default_organization()
        .unwrap()
        .organization_id
        .unwrap()
}

pub fn seed_user(store: &Store, email: &str) -> i64 {
    let org: i64 = default_org(store);
    store
        .create_user(
            email,
            "Tamanda Phiri",
            &RoleName::new("ADMIN").unwrap(),
            org,
            "correct horse battery",
        )
        .unwrap()
}

pub fn seed_farmer(store: &Store, id_number: &str) -> i64 {
    let org: i64 = default_org(store);
    let farmer: Farmer = Farmer {
        farmer_id: None,
        organization_id: org,
        first_name: "Rudo".to_string(),
        last_name: "Chirwa".to_string(),
        id_number: id_number.to_string(),
        phone_number: "+265991234567".to_string(),
        status: EntityStatus::Active,
    };
    store.insert_farmer(&farmer, T0).unwrap()
}

pub fn seed_farm(store: &Store, farmer_id: i64) -> i64 {
    let farm: Farm = Farm {
        farm_id: None,
        farmer_id,
        name: "River Plot".to_string(),
        size: 1200,
        unit_of_measure: "HA".to_string(),
        status: EntityStatus::Active,
    };
    store.insert_farm(&farm, T0).unwrap()
}

pub fn seed_product(store: &Store) -> i64 {
    let product: InsuranceProduct = InsuranceProduct {
        product_id: None,
        name: "Maize Multi-Peril".to_string(),
        status: EntityStatus::Active,
    };
    store.insert_product(&product).unwrap()
}

pub fn seed_open_quotation(store: &Store, farmer_id: i64, farm_id: i64, product_id: i64) -> i64 {
    let quotation: Quotation = Quotation {
        quotation_id: None,
        farmer_id,
        farm_id,
        product_id,
        policy_number: None,
        premium_amount: Money::from_minor(75_00),
        sum_insured: Money::from_minor(20_000_00),
        status: QuotationStatus::Open,
        payment_date: None,
        payment_reference: None,
    };
    store.insert_quotation(&quotation, T0).unwrap()
}

pub fn seed_assessor(store: &Store, user_id: i64) -> i64 {
    let org: i64 = default_org(store);
    let assessor: LossAssessor = LossAssessor {
        assessor_id: None,
        user_id,
        organization_id: org,
        status: EntityStatus::Active,
    };
    store.insert_assessor(&assessor).unwrap()
}

pub fn seed_claim(store: &Store, farmer_id: i64, quotation_id: i64) -> (i64, String) {
    let claim: Claim = Claim {
        claim_id: None,
        farmer_id,
        quotation_id,
        loss_assessor_id: None,
        claim_number: String::new(),
        estimated_loss_amount: Money::from_minor(5_000_00),
        approved_amount: None,
        status: ClaimStatus::Open,
        approval_date: None,
        loss_details: serde_json::Map::new(),
    };
    store.file_claim(&claim, T0.date(), T0).unwrap()
}

pub fn seed_subsidy(store: &Store) -> i64 {
    let org: i64 = default_org(store);
    let subsidy: Subsidy = Subsidy {
        subsidy_id: None,
        organization_id: org,
        name: "Input Support".to_string(),
        rate_basis_points: 2500,
        status: EntityStatus::Active,
    };
    store.insert_subsidy(&subsidy).unwrap()
}

pub fn seed_invoice(store: &Store, subsidy_id: i64, invoice_number: &str) -> i64 {
    let org: i64 = default_org(store);
    let invoice: Invoice = Invoice {
        invoice_id: None,
        organization_id: org,
        subsidy_id,
        invoice_number: invoice_number.to_string(),
        amount: Money::from_minor(1_250_00),
        status: InvoiceStatus::Pending,
        approved_date: None,
        settlement_date: None,
        payment_reference: None,
        rejection_reason: None,
    };
    store.insert_invoice(&invoice).unwrap()
}
