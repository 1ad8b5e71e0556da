// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod invoice;
mod permission;
mod quotation;

use agrisure_domain::{
    EntityStatus, Farm, Farmer, InsuranceProduct, Money, Quotation, QuotationStatus,
};

pub fn farmer(farmer_id: i64) -> Farmer {
    Farmer {
        farmer_id: Some(farmer_id),
        organization_id: 1,
        first_name: "Rudo".to_string(),
        last_name: "Chirwa".to_string(),
        id_number: format!("ID-{farmer_id}"),
        phone_number: "+265991234567".to_string(),
        status: EntityStatus::Active,
    }
}

pub fn farm(farm_id: i64, farmer_id: i64) -> Farm {
    Farm {
        farm_id: Some(farm_id),
        farmer_id,
        name: "River Plot".to_string(),
        size: 1200,
        unit_of_measure: "HA".to_string(),
        status: EntityStatus::Active,
    }
}

pub fn product(product_id: i64) -> InsuranceProduct {
    InsuranceProduct {
        product_id: Some(product_id),
        name: "Maize Multi-Peril".to_string(),
        status: EntityStatus::Active,
    }
}

pub fn paid_quotation(quotation_id: i64, farmer_id: i64) -> Quotation {
    Quotation {
        quotation_id: Some(quotation_id),
        farmer_id,
        farm_id: 7,
        product_id: 3,
        policy_number: None,
        premium_amount: Money::from_minor(75_00),
        sum_insured: Money::from_minor(20_000_00),
        status: QuotationStatus::Paid,
        payment_date: None,
        payment_reference: Some("EFT-1001".to_string()),
    }
}
