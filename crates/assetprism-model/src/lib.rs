#![forbid(unsafe_code)]
//! AssetPrism domain model: persisted row shapes and the opaque
//! specification encoding shared by the query and store crates.

mod asset;
mod audit;
mod reference;
mod specs;

pub use asset::{
    AssetDetail, AssetSummaryRow, CurrentAssignment, HardwareAsset, DEFAULT_STATUS,
};
pub use audit::{AuditLog, NewAuditRecord, AUDIT_ACTION_CREATE, ENTITY_HARDWARE_ASSET};
pub use reference::{
    normalize_model_number, AssetCategory, LocationRow, Manufacturer, ModelKey, UserRow,
};
pub use specs::{encode_mac_addresses, Specifications};

pub const CRATE_NAME: &str = "assetprism-model";
