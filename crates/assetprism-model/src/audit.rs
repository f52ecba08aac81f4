// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const AUDIT_ACTION_CREATE: &str = "CREATE";
pub const ENTITY_HARDWARE_ASSET: &str = "hardware_asset";

/// One stored `audit_logs` row. Append-only; never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: i64,
    pub user_id: Option<i64>,
    pub entity_type: String,
    pub entity_id: i64,
    pub action: String,
    pub change_details: Value,
    pub created_at: String,
}

/// Input to the audit recorder. `user_id` stays `None` until an identity
/// layer exists; the column is nullable by design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditRecord {
    pub user_id: Option<i64>,
    pub entity_type: String,
    pub entity_id: i64,
    pub action: String,
    pub change_details: Value,
}

impl NewAuditRecord {
    #[must_use]
    pub fn asset_created(entity_id: i64, change_details: Value) -> Self {
        Self {
            user_id: None,
            entity_type: ENTITY_HARDWARE_ASSET.to_string(),
            entity_id,
            action: AUDIT_ACTION_CREATE.to_string(),
            change_details,
        }
    }
}
