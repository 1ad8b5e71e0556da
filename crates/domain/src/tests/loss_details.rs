// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::claim::{LossDetails, normalize_loss_details};
use serde_json::{Value, json};

#[test]
fn absent_and_null_normalize_to_empty_object() {
    assert_eq!(normalize_loss_details(None).unwrap(), LossDetails::new());
    assert_eq!(
        normalize_loss_details(Some(&Value::Null)).unwrap(),
        LossDetails::new()
    );
}

#[test]
fn empty_string_normalizes_to_empty_object() {
    let value = json!("   ");
    assert_eq!(
        normalize_loss_details(Some(&value)).unwrap(),
        LossDetails::new()
    );
}

#[test]
fn object_passes_through_unchanged() {
    let value = json!({"cause": "flood", "area_ha": 2.5});
    let details: LossDetails = normalize_loss_details(Some(&value)).unwrap();
    assert_eq!(details.get("cause"), Some(&json!("flood")));
    assert_eq!(details.get("area_ha"), Some(&json!(2.5)));
}

#[test]
fn json_string_is_parsed_into_an_object() {
    let value = json!(r#"{"cause": "drought"}"#);
    let details: LossDetails = normalize_loss_details(Some(&value)).unwrap();
    assert_eq!(details.get("cause"), Some(&json!("drought")));
}

#[test]
fn malformed_json_string_is_rejected() {
    let value = json!("{not json");
    assert!(normalize_loss_details(Some(&value)).is_err());
}

#[test]
fn non_object_values_are_rejected() {
    assert!(normalize_loss_details(Some(&json!(["a", "b"]))).is_err());
    assert!(normalize_loss_details(Some(&json!(12))).is_err());
    assert!(normalize_loss_details(Some(&json!("[1,2]"))).is_err());
}
