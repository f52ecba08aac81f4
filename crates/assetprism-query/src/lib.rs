#![forbid(unsafe_code)]
//! Read path of the asset engine: the filtered/sorted/paginated list query
//! builder, the single-asset detail reader, and the pass-through reference
//! reads. All functions operate on a borrowed [`rusqlite::Connection`]; the
//! store crate owns opening and bootstrapping the database.

use assetprism_model::{
    AssetCategory, AssetDetail, AssetSummaryRow, CurrentAssignment, HardwareAsset, LocationRow,
    Manufacturer, UserRow,
};
use rusqlite::{params_from_iter, types::Value, Connection, Row};

pub const CRATE_NAME: &str = "assetprism-query";

/// Hard ceiling on page size, applied regardless of what the caller asks for.
pub const MAX_PAGE_LIMIT: u32 = 100;

#[derive(Debug)]
pub struct QueryError(pub String);

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for QueryError {}

impl From<rusqlite::Error> for QueryError {
    fn from(e: rusqlite::Error) -> Self {
        Self(e.to_string())
    }
}

/// Conjunctive list filters. `asset_type` matches the joined category name,
/// not a raw asset column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetFilter {
    pub status: Option<String>,
    pub asset_type: Option<String>,
}

/// Sortable columns of the list query. Anything outside this allow-list
/// silently falls back to `CreatedAt`; sorting never errors on user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    PurchaseDate,
    Status,
    SerialNumber,
}

impl SortField {
    #[must_use]
    pub fn parse_or_default(raw: &str) -> Self {
        match raw {
            "updated_at" => Self::UpdatedAt,
            "purchase_date" => Self::PurchaseDate,
            "status" => Self::Status,
            "serial_number" => Self::SerialNumber,
            _ => Self::CreatedAt,
        }
    }

    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "ha.created_at",
            Self::UpdatedAt => "ha.updated_at",
            Self::PurchaseDate => "ha.purchase_date",
            Self::Status => "ha.status",
            Self::SerialNumber => "ha.serial_number",
        }
    }
}

/// Only a case-insensitive `asc` sorts ascending; everything else, including
/// omission, is descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        if raw.is_some_and(|v| v.eq_ignore_ascii_case("asc")) {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Page window. The constructor clamps `limit` into `1..=MAX_PAGE_LIMIT`
/// and `page` to at least 1, so an offset is always well defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }

    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    #[must_use]
    pub const fn offset(self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

const LIST_SELECT: &str = "SELECT ha.id, ha.asset_tag, ha.serial_number, ha.status, \
     ha.purchase_date, ha.purchase_cost, ha.warranty_expiration_date, ha.notes, \
     ha.created_at, ha.updated_at, \
     am.name AS model_name, am.model_number, \
     m.name AS manufacturer_name, ac.name AS category_name";

const ASSET_JOINS: &str = " FROM hardware_assets ha \
     JOIN asset_models am ON ha.asset_model_id = am.id \
     JOIN manufacturers m ON am.manufacturer_id = m.id \
     JOIN asset_categories ac ON am.asset_category_id = ac.id";

fn where_clause(filter: &AssetFilter) -> (String, Vec<Value>) {
    let mut where_parts: Vec<String> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(status) = &filter.status {
        where_parts.push("ha.status = ?".to_string());
        params.push(Value::Text(status.clone()));
    }
    if let Some(asset_type) = &filter.asset_type {
        where_parts.push("ac.name = ?".to_string());
        params.push(Value::Text(asset_type.clone()));
    }

    if where_parts.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", where_parts.join(" AND ")), params)
    }
}

/// List SQL without the trailing LIMIT/OFFSET values; `list_assets` appends
/// them as the final two positional parameters.
#[must_use]
pub fn build_list_sql(filter: &AssetFilter, sort: SortField, order: SortOrder) -> (String, Vec<Value>) {
    let (where_sql, params) = where_clause(filter);
    let sql = format!(
        "{LIST_SELECT}{ASSET_JOINS}{where_sql} ORDER BY {} {} LIMIT ? OFFSET ?",
        sort.column(),
        order.keyword(),
    );
    (sql, params)
}

/// Count query mirroring the list query's joins and WHERE exactly, with no
/// ORDER/LIMIT/OFFSET, so the total describes the filtered set.
#[must_use]
pub fn build_count_sql(filter: &AssetFilter) -> (String, Vec<Value>) {
    let (where_sql, params) = where_clause(filter);
    (
        format!("SELECT COUNT(*){ASSET_JOINS}{where_sql}"),
        params,
    )
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<AssetSummaryRow> {
    Ok(AssetSummaryRow {
        id: row.get(0)?,
        asset_tag: row.get(1)?,
        serial_number: row.get(2)?,
        status: row.get(3)?,
        purchase_date: row.get(4)?,
        purchase_cost: row.get(5)?,
        warranty_expiration_date: row.get(6)?,
        notes: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
        model_name: row.get(10)?,
        model_number: row.get(11)?,
        manufacturer_name: row.get(12)?,
        category_name: row.get(13)?,
    })
}

/// Run the list and count queries for one page; returns the rows and the
/// filtered total.
pub fn list_assets(
    conn: &Connection,
    filter: &AssetFilter,
    page: PageRequest,
    sort: SortField,
    order: SortOrder,
) -> Result<(Vec<AssetSummaryRow>, u64), QueryError> {
    let (sql, mut params) = build_list_sql(filter, sort, order);
    params.push(Value::Integer(i64::from(page.limit())));
    params.push(Value::Integer(page.offset()));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(params.iter()), summary_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    let total = count_assets(conn, filter)?;
    Ok((rows, total))
}

pub fn count_assets(conn: &Connection, filter: &AssetFilter) -> Result<u64, QueryError> {
    let (sql, params) = build_count_sql(filter);
    let total: i64 = conn.query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))?;
    Ok(total.max(0) as u64)
}

const DETAIL_SQL: &str = "SELECT ha.id, ha.asset_tag, ha.serial_number, ha.asset_model_id, \
     ha.status, ha.purchase_date, ha.purchase_cost, ha.po_number, ha.vendor_id, \
     ha.warranty_expiration_date, ha.notes, ha.mac_addresses, ha.created_at, ha.updated_at, \
     am.name AS model_name, am.model_number, am.specifications, \
     m.name AS manufacturer_name, ac.name AS category_name, \
     v.name AS vendor_name, v.contact_person AS vendor_contact, v.email AS vendor_email \
     FROM hardware_assets ha \
     JOIN asset_models am ON ha.asset_model_id = am.id \
     JOIN manufacturers m ON am.manufacturer_id = m.id \
     JOIN asset_categories ac ON am.asset_category_id = ac.id \
     LEFT JOIN vendors v ON ha.vendor_id = v.id \
     WHERE ha.id = ?1";

const CURRENT_ASSIGNMENT_SQL: &str = "SELECT haa.id, haa.hardware_asset_id, \
     haa.assigned_to_user_id, haa.location_id, haa.assignment_date, haa.unassignment_date, \
     u.full_name AS assigned_user_name, u.email AS assigned_user_email, \
     l.name AS location_name \
     FROM hardware_asset_assignments haa \
     JOIN users u ON haa.assigned_to_user_id = u.id \
     JOIN locations l ON haa.location_id = l.id \
     WHERE haa.hardware_asset_id = ?1 AND haa.unassignment_date IS NULL";

fn detail_from_row(row: &Row<'_>) -> rusqlite::Result<AssetDetail> {
    let specifications: Option<String> = row.get(16)?;
    Ok(AssetDetail {
        asset: HardwareAsset {
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
        },
        model_name: row.get(14)?,
        model_number: row.get(15)?,
        specifications: specifications
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or(serde_json::Value::Null),
        manufacturer_name: row.get(17)?,
        category_name: row.get(18)?,
        vendor_name: row.get(19)?,
        vendor_contact: row.get(20)?,
        vendor_email: row.get(21)?,
        current_assignment: None,
    })
}

fn assignment_from_row(row: &Row<'_>) -> rusqlite::Result<CurrentAssignment> {
    Ok(CurrentAssignment {
        id: row.get(0)?,
        hardware_asset_id: row.get(1)?,
        assigned_to_user_id: row.get(2)?,
        location_id: row.get(3)?,
        assignment_date: row.get(4)?,
        unassignment_date: row.get(5)?,
        assigned_user_name: row.get(6)?,
        assigned_user_email: row.get(7)?,
        location_name: row.get(8)?,
    })
}

/// Fetch one asset with its mandatory reference chain, optional vendor
/// fields, and current (open) assignment. `Ok(None)` is the not-found case,
/// which the HTTP layer maps to 404.
pub fn fetch_asset_detail(conn: &Connection, id: i64) -> Result<Option<AssetDetail>, QueryError> {
    let mut stmt = conn.prepare(DETAIL_SQL)?;
    let mut rows = stmt.query([id])?;
    let Some(row) = rows.next()? else {
        return Ok(None);
    };
    let mut detail = detail_from_row(row)?;

    let mut stmt = conn.prepare(CURRENT_ASSIGNMENT_SQL)?;
    let mut assignments = stmt.query([id])?;
    if let Some(row) = assignments.next()? {
        detail.current_assignment = Some(assignment_from_row(row)?);
    }
    Ok(Some(detail))
}

pub fn list_users(conn: &Connection) -> Result<Vec<UserRow>, QueryError> {
    let mut stmt = conn.prepare(
        "SELECT id, employee_id, full_name, email, department_id, is_active \
         FROM users WHERE is_active = 1 ORDER BY full_name",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                employee_id: row.get(1)?,
                full_name: row.get(2)?,
                email: row.get(3)?,
                department_id: row.get(4)?,
                is_active: row.get::<_, i64>(5)? != 0,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn list_locations(conn: &Connection) -> Result<Vec<LocationRow>, QueryError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, address_line1, city, state_province, country \
         FROM locations ORDER BY name",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(LocationRow {
                id: row.get(0)?,
                name: row.get(1)?,
                address_line1: row.get(2)?,
                city: row.get(3)?,
                state_province: row.get(4)?,
                country: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn list_manufacturers(conn: &Connection) -> Result<Vec<Manufacturer>, QueryError> {
    let mut stmt = conn.prepare("SELECT id, name FROM manufacturers ORDER BY name")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Manufacturer {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn list_asset_categories(conn: &Connection) -> Result<Vec<AssetCategory>, QueryError> {
    let mut stmt = conn.prepare("SELECT id, name FROM asset_categories ORDER BY name")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(AssetCategory {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
