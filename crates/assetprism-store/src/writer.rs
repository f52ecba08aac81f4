// SPDX-License-Identifier: Apache-2.0

//! Asset creation. Resolves the reference chain with get-or-create, inserts
//! the asset row, and appends a best-effort audit record. The request must
//! already have passed [`CreateAssetRequest::validate`].

use assetprism_api::CreateAssetRequest;
use assetprism_model::{
    encode_mac_addresses, HardwareAsset, ModelKey, NewAuditRecord, Specifications,
    DEFAULT_STATUS,
};
use rusqlite::{Connection, Row};
use serde_json::json;

use crate::{audit, resolver, StoreError};

const INSERT_ASSET_SQL: &str = "INSERT INTO hardware_assets \
     (asset_tag, serial_number, asset_model_id, status, purchase_date, purchase_cost, \
      po_number, vendor_id, warranty_expiration_date, notes, mac_addresses) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) \
     RETURNING id, asset_tag, serial_number, asset_model_id, status, purchase_date, \
      purchase_cost, po_number, vendor_id, warranty_expiration_date, notes, \
      mac_addresses, created_at, updated_at";

fn asset_from_row(row: &Row<'_>) -> rusqlite::Result<HardwareAsset> {
    Ok(HardwareAsset {
        id: row.get(0)?,
        asset_tag: row.get(1)?,
        serial_number: row.get(2)?,
        asset_model_id: row.get(3)?,
        status: row.get(4)?,
        purchase_date: row.get(5)?,
        purchase_cost: row.get(6)?,
        po_number: row.get(7)?,
        vendor_id: row.get(8)?,
        warranty_expiration_date: row.get(9)?,
        notes: row.get(10)?,
        mac_addresses: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

/// Create one hardware asset. Each resolution step commits independently;
/// a failure later in the chain leaves earlier reference rows behind, which
/// is harmless since they are shared and idempotent. `raw_payload` is the
/// caller's request body as received and lands verbatim in the audit record.
pub fn create_asset(
    conn: &Connection,
    req: &CreateAssetRequest,
    raw_payload: &serde_json::Value,
) -> Result<HardwareAsset, StoreError> {
    let make = req.make.as_deref().unwrap_or_default();
    let model = req.model.as_deref().unwrap_or_default();
    let asset_type = req.asset_type.as_deref().unwrap_or_default();
    let serial_number = req.serial_number.as_deref().unwrap_or_default();

    let manufacturer_id = resolver::resolve_manufacturer(conn, make)?;
    let category_id = resolver::resolve_category(conn, asset_type)?;

    let specifications = Specifications::new(
        req.cpu.clone(),
        req.ram.clone(),
        req.storage.clone(),
    )
    .encode();
    let key = ModelKey::new(model, manufacturer_id, req.model_number.as_deref());
    let model_id = resolver::resolve_model(conn, &key, category_id, &specifications)?;

    let status = req
        .initial_status
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_STATUS);
    let mac_blob = req
        .mac_addresses
        .as_deref()
        .filter(|list| !list.is_empty())
        .map(encode_mac_addresses);

    let asset = conn.query_row(
        INSERT_ASSET_SQL,
        rusqlite::params![
            req.asset_tag,
            serial_number,
            model_id,
            status,
            req.purchase_date,
            req.purchase_cost,
            req.po_number,
            req.vendor_id,
            req.warranty_expiration_date,
            req.notes,
            mac_blob,
        ],
        asset_from_row,
    )?;

    let record = NewAuditRecord::asset_created(asset.id, json!({"created": raw_payload}));
    if let Err(err) = audit::record_audit(conn, &record) {
        tracing::warn!(asset_id = asset.id, error = %err, "audit record failed");
    }

    Ok(asset)
}
