// SPDX-License-Identifier: Apache-2.0

use assetprism_model::{AuditLog, NewAuditRecord};
use rusqlite::Connection;

use crate::StoreError;

/// Append one audit row. Callers on the request path treat a failure here
/// as non-fatal; the entity write has already committed.
pub fn record_audit(conn: &Connection, record: &NewAuditRecord) -> Result<i64, StoreError> {
    let id = conn.query_row(
        "INSERT INTO audit_logs (user_id, entity_type, entity_id, action, change_details) \
         VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
        rusqlite::params![
            record.user_id,
            record.entity_type,
            record.entity_id,
            record.action,
            record.change_details.to_string(),
        ],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// All audit rows for one entity, oldest first. The HTTP surface has no
/// trail endpoint yet, so this stays crate-internal.
pub(crate) fn audit_trail_for(
    conn: &Connection,
    entity_type: &str,
    entity_id: i64,
) -> Result<Vec<AuditLog>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, entity_type, entity_id, action, change_details, created_at \
         FROM audit_logs WHERE entity_type = ?1 AND entity_id = ?2 ORDER BY id",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![entity_type, entity_id], |row| {
            let raw: Option<String> = row.get(5)?;
            Ok(AuditLog {
                id: row.get(0)?,
                user_id: row.get(1)?,
                entity_type: row.get(2)?,
                entity_id: row.get(3)?,
                action: row.get(4)?,
                change_details: raw
                    .and_then(|r| serde_json::from_str(&r).ok())
                    .unwrap_or(serde_json::Value::Null),
                created_at: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use assetprism_model::{AUDIT_ACTION_CREATE, ENTITY_HARDWARE_ASSET};
    use serde_json::json;

    #[test]
    fn record_and_read_back() {
        let db = Database::open_in_memory().expect("open");
        let conn = db.conn.blocking_lock();
        let record =
            NewAuditRecord::asset_created(42, json!({"created": {"serialNumber": "SN1"}}));
        record_audit(&conn, &record).expect("record");

        let trail =
            audit_trail_for(&conn, ENTITY_HARDWARE_ASSET, 42).expect("trail");
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].action, AUDIT_ACTION_CREATE);
        assert!(trail[0].user_id.is_none());
        assert_eq!(trail[0].change_details["created"]["serialNumber"], "SN1");
    }

    #[test]
    fn trail_is_scoped_to_entity() {
        let db = Database::open_in_memory().expect("open");
        let conn = db.conn.blocking_lock();
        record_audit(&conn, &NewAuditRecord::asset_created(1, json!({})))
            .expect("first");
        record_audit(&conn, &NewAuditRecord::asset_created(2, json!({})))
            .expect("second");
        let trail = audit_trail_for(&conn, ENTITY_HARDWARE_ASSET, 1).expect("trail");
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].entity_id, 1);
    }
}
