// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status assigned to a freshly registered asset when the caller does not
/// supply one.
pub const DEFAULT_STATUS: &str = "in_stock";

/// One row of `hardware_assets`, as stored. `mac_addresses` carries the
/// opaque encoded blob (see [`crate::encode_mac_addresses`]), not a decoded
/// list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareAsset {
    pub id: i64,
    pub asset_tag: Option<String>,
    pub serial_number: String,
    pub asset_model_id: i64,
    pub status: String,
    pub purchase_date: Option<String>,
    pub purchase_cost: Option<f64>,
    pub po_number: Option<String>,
    pub vendor_id: Option<i64>,
    pub warranty_expiration_date: Option<String>,
    pub notes: Option<String>,
    pub mac_addresses: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Projection returned by the list endpoint: the asset columns plus the
/// joined model/manufacturer/category display names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSummaryRow {
    pub id: i64,
    pub asset_tag: Option<String>,
    pub serial_number: String,
    pub status: String,
    pub purchase_date: Option<String>,
    pub purchase_cost: Option<f64>,
    pub warranty_expiration_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub model_name: String,
    pub model_number: String,
    pub manufacturer_name: String,
    pub category_name: String,
}

/// Open assignment row joined to user and location display fields. At most
/// one open assignment exists per asset; the reader takes the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAssignment {
    pub id: i64,
    pub hardware_asset_id: i64,
    pub assigned_to_user_id: i64,
    pub location_id: i64,
    pub assignment_date: Option<String>,
    pub unassignment_date: Option<String>,
    pub assigned_user_name: String,
    pub assigned_user_email: String,
    pub location_name: String,
}

/// Full single-asset view: every asset column, the mandatory reference
/// chain, the optional vendor fields, and the current assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDetail {
    #[serde(flatten)]
    pub asset: HardwareAsset,
    pub model_name: String,
    pub model_number: String,
    pub specifications: Value,
    pub manufacturer_name: String,
    pub category_name: String,
    pub vendor_name: Option<String>,
    pub vendor_contact: Option<String>,
    pub vendor_email: Option<String>,
    pub current_assignment: Option<CurrentAssignment>,
}
