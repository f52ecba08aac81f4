// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCategory {
    pub id: i64,
    pub name: String,
}

/// `None` and `""` must resolve to the same model row, so the model number
/// is normalized to the empty string before any lookup or insert.
#[must_use]
pub fn normalize_model_number(raw: Option<&str>) -> String {
    raw.unwrap_or_default().to_string()
}

/// Natural key of an asset model. Two models are the same row iff all three
/// fields match exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelKey {
    pub name: String,
    pub manufacturer_id: i64,
    pub model_number: String,
}

impl ModelKey {
    #[must_use]
    pub fn new(name: &str, manufacturer_id: i64, model_number: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            manufacturer_id,
            model_number: normalize_model_number(model_number),
        }
    }
}

/// Active-user projection served by the `/users` pass-through read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    pub id: i64,
    pub employee_id: Option<String>,
    pub full_name: String,
    pub email: String,
    pub department_id: Option<i64>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRow {
    pub id: i64,
    pub name: String,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub country: Option<String>,
}
