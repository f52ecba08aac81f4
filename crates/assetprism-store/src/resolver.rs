// SPDX-License-Identifier: Apache-2.0

//! Get-or-create resolution for reference rows. Lookups are exact-match on
//! the natural key; a lost insert race is absorbed by re-reading once.

use assetprism_model::ModelKey;
use rusqlite::{Connection, OptionalExtension};

use crate::StoreError;

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Select, then insert, then on a unique-constraint loss select again. Any
/// other failure propagates; a second miss after the conflict is
/// `ResolutionFailed`.
fn get_or_create<S, I>(
    conn: &Connection,
    what: &'static str,
    select: S,
    insert: I,
) -> Result<i64, StoreError>
where
    S: Fn(&Connection) -> rusqlite::Result<Option<i64>>,
    I: Fn(&Connection) -> rusqlite::Result<i64>,
{
    if let Some(id) = select(conn)? {
        return Ok(id);
    }
    match insert(conn) {
        Ok(id) => Ok(id),
        Err(err) if is_unique_violation(&err) => {
            select(conn)?.ok_or(StoreError::ResolutionFailed(what))
        }
        Err(err) => Err(err.into()),
    }
}

pub fn resolve_manufacturer(conn: &Connection, name: &str) -> Result<i64, StoreError> {
    get_or_create(
        conn,
        "manufacturer",
        |conn| {
            conn.query_row(
                "SELECT id FROM manufacturers WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .optional()
        },
        |conn| {
            conn.query_row(
                "INSERT INTO manufacturers (name) VALUES (?1) RETURNING id",
                [name],
                |row| row.get(0),
            )
        },
    )
}

pub fn resolve_category(conn: &Connection, name: &str) -> Result<i64, StoreError> {
    get_or_create(
        conn,
        "asset category",
        |conn| {
            conn.query_row(
                "SELECT id FROM asset_categories WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .optional()
        },
        |conn| {
            conn.query_row(
                "INSERT INTO asset_categories (name) VALUES (?1) RETURNING id",
                [name],
                |row| row.get(0),
            )
        },
    )
}

/// Resolve an asset model by its three-part natural key. The category and
/// specifications only land on a fresh insert; an existing model keeps what
/// it was first created with.
pub fn resolve_model(
    conn: &Connection,
    key: &ModelKey,
    category_id: i64,
    specifications: &str,
) -> Result<i64, StoreError> {
    get_or_create(
        conn,
        "asset model",
        |conn| {
            conn.query_row(
                "SELECT id FROM asset_models \
                 WHERE name = ?1 AND manufacturer_id = ?2 AND model_number = ?3",
                rusqlite::params![key.name, key.manufacturer_id, key.model_number],
                |row| row.get(0),
            )
            .optional()
        },
        |conn| {
            conn.query_row(
                "INSERT INTO asset_models \
                 (name, manufacturer_id, asset_category_id, model_number, specifications) \
                 VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
                rusqlite::params![
                    key.name,
                    key.manufacturer_id,
                    category_id,
                    key.model_number,
                    specifications
                ],
                |row| row.get(0),
            )
        },
    )
}
