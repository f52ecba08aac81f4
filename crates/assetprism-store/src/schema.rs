// SPDX-License-Identifier: Apache-2.0

use rusqlite::Connection;

use crate::StoreError;

/// Create every table the service touches. All statements are
/// `IF NOT EXISTS`, so bootstrap is safe to run on an existing database.
pub fn bootstrap_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS manufacturers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS asset_categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS asset_models (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            manufacturer_id INTEGER NOT NULL REFERENCES manufacturers(id),
            asset_category_id INTEGER NOT NULL REFERENCES asset_categories(id),
            model_number TEXT NOT NULL DEFAULT '',
            specifications TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (name, manufacturer_id, model_number)
        );

        CREATE TABLE IF NOT EXISTS vendors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            contact_person TEXT,
            email TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id TEXT,
            full_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            department_id INTEGER,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS locations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            address_line1 TEXT,
            city TEXT,
            state_province TEXT,
            country TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS hardware_assets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            asset_tag TEXT UNIQUE,
            serial_number TEXT NOT NULL UNIQUE,
            asset_model_id INTEGER NOT NULL REFERENCES asset_models(id),
            status TEXT NOT NULL DEFAULT 'in_stock',
            purchase_date TEXT,
            purchase_cost REAL,
            po_number TEXT,
            vendor_id INTEGER REFERENCES vendors(id),
            warranty_expiration_date TEXT,
            notes TEXT,
            mac_addresses TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS hardware_asset_assignments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            hardware_asset_id INTEGER NOT NULL REFERENCES hardware_assets(id),
            assigned_to_user_id INTEGER NOT NULL REFERENCES users(id),
            location_id INTEGER NOT NULL REFERENCES locations(id),
            assignment_date TEXT,
            unassignment_date TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS audit_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            entity_type TEXT NOT NULL,
            entity_id INTEGER NOT NULL,
            action TEXT NOT NULL,
            change_details TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_hardware_assets_status
            ON hardware_assets (status);
        CREATE INDEX IF NOT EXISTS idx_assignments_open
            ON hardware_asset_assignments (hardware_asset_id)
            WHERE unassignment_date IS NULL;
        CREATE INDEX IF NOT EXISTS idx_audit_logs_entity
            ON audit_logs (entity_type, entity_id);",
    )?;
    Ok(())
}
