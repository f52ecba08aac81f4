#![forbid(unsafe_code)]
//! Wire contract of the AssetPrism API: the error envelope, list-query
//! parameter parsing, and the asset-creation request body.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const CRATE_NAME: &str = "assetprism-api";
pub const API_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ApiErrorCode {
    ValidationError,
    NotFound,
    FetchError,
    CreateError,
}

/// Error body serialized under an `"error"` key:
/// `{"error": {"code", "message", "details"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn validation(missing: &[&str]) -> Self {
        Self::new(
            ApiErrorCode::ValidationError,
            "Missing required fields",
            json!({
                "required": ["make", "model", "serialNumber", "assetType"],
                "missing": missing,
            }),
        )
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::NotFound, message, Value::Null)
    }

    #[must_use]
    pub fn fetch_failed(message: impl Into<String>, detail: &str) -> Self {
        Self::new(
            ApiErrorCode::FetchError,
            message,
            json!({"message": detail}),
        )
    }

    #[must_use]
    pub fn create_failed(detail: &str) -> Self {
        Self::new(
            ApiErrorCode::CreateError,
            "Failed to create hardware asset",
            json!({"message": detail}),
        )
    }
}

pub mod params {
    use std::collections::BTreeMap;

    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 25;
    pub const MAX_LIMIT: u32 = 100;
    pub const DEFAULT_SORT_BY: &str = "created_at";

    /// Parsed list-query parameters. `sort_by`/`sort_order` stay raw here;
    /// the query builder owns the allow-list and its silent fallback.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ListAssetsParams {
        pub page: u32,
        pub limit: u32,
        pub status: Option<String>,
        pub asset_type: Option<String>,
        pub sort_by: String,
        pub sort_order: Option<String>,
    }

    /// Never fails: unparsable or non-positive `page`/`limit` fall back to
    /// the documented defaults, and `limit` is clamped to [`MAX_LIMIT`].
    #[must_use]
    pub fn parse_list_assets_params(query: &BTreeMap<String, String>) -> ListAssetsParams {
        let page = query
            .get("page")
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|v| *v >= 1)
            .unwrap_or(DEFAULT_PAGE);
        let limit = query
            .get("limit")
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|v| *v >= 1)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);

        ListAssetsParams {
            page,
            limit,
            status: query.get("status").cloned(),
            asset_type: query.get("assetType").cloned(),
            sort_by: query
                .get("sortBy")
                .cloned()
                .unwrap_or_else(|| DEFAULT_SORT_BY.to_string()),
            sort_order: query.get("sortOrder").cloned(),
        }
    }
}

/// Creation request body. Field names follow the JSON wire contract
/// (`serialNumber`, `assetType`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAssetRequest {
    pub make: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub asset_tag: Option<String>,
    pub asset_type: Option<String>,
    pub cpu: Option<String>,
    pub ram: Option<String>,
    pub storage: Option<String>,
    pub mac_addresses: Option<Vec<String>>,
    pub purchase_date: Option<String>,
    pub purchase_cost: Option<f64>,
    pub po_number: Option<String>,
    pub vendor_id: Option<i64>,
    pub warranty_expiration_date: Option<String>,
    pub initial_status: Option<String>,
    pub model_number: Option<String>,
    pub notes: Option<String>,
}

impl CreateAssetRequest {
    /// Fail-fast required-field check, run before any datastore access.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut missing = Vec::new();
        if is_blank(&self.make) {
            missing.push("make");
        }
        if is_blank(&self.model) {
            missing.push("model");
        }
        if is_blank(&self.serial_number) {
            missing.push("serialNumber");
        }
        if is_blank(&self.asset_type) {
            missing.push("assetType");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(&missing))
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.is_empty())
}

/// Pagination envelope of the list response. Keys are camelCase on the wire
/// (`currentPage`, `totalPages`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u32,
}

impl Pagination {
    /// `total_pages = ceil(total_items / items_per_page)`.
    #[must_use]
    pub fn new(current_page: u32, items_per_page: u32, total_items: u64) -> Self {
        Self {
            current_page,
            total_pages: total_items.div_ceil(u64::from(items_per_page.max(1))),
            total_items,
            items_per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::params::{parse_list_assets_params, DEFAULT_LIMIT, MAX_LIMIT};
    use super::{ApiError, ApiErrorCode, CreateAssetRequest, Pagination};
    use std::collections::BTreeMap;

    fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn parse_params_defaults() {
        let parsed = parse_list_assets_params(&BTreeMap::new());
        assert_eq!(parsed.page, 1);
        assert_eq!(parsed.limit, DEFAULT_LIMIT);
        assert_eq!(parsed.sort_by, "created_at");
        assert!(parsed.sort_order.is_none());
    }

    #[test]
    fn parse_params_clamps_limit() {
        let parsed = parse_list_assets_params(&query(&[("limit", "200")]));
        assert_eq!(parsed.limit, MAX_LIMIT);
    }

    #[test]
    fn parse_params_rejects_garbage_numbers() {
        let parsed = parse_list_assets_params(&query(&[("page", "abc"), ("limit", "0")]));
        assert_eq!(parsed.page, 1);
        assert_eq!(parsed.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn validate_reports_every_missing_field() {
        let err = CreateAssetRequest::default().validate().expect_err("invalid");
        assert_eq!(err.code, ApiErrorCode::ValidationError);
        let missing = err.details["missing"].as_array().expect("missing array");
        assert_eq!(missing.len(), 4);
    }

    #[test]
    fn validate_treats_empty_string_as_missing() {
        let req = CreateAssetRequest {
            make: Some("Dell".to_string()),
            model: Some("Latitude 5420".to_string()),
            serial_number: Some(String::new()),
            asset_type: Some("Laptop".to_string()),
            ..Default::default()
        };
        let err = req.validate().expect_err("blank serial");
        assert_eq!(err.details["missing"], serde_json::json!(["serialNumber"]));
    }

    #[test]
    fn validate_accepts_complete_request() {
        let req = CreateAssetRequest {
            make: Some("Dell".to_string()),
            model: Some("Latitude 5420".to_string()),
            serial_number: Some("SN123".to_string()),
            asset_type: Some("Laptop".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn pagination_rounds_up() {
        assert_eq!(Pagination::new(1, 25, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 25, 25).total_pages, 1);
        assert_eq!(Pagination::new(1, 25, 26).total_pages, 2);
    }

    #[test]
    fn error_codes_serialize_screaming_snake() {
        let err = ApiError::not_found("Hardware asset not found");
        let value = serde_json::to_value(&err).expect("serialize");
        assert_eq!(value["code"], "NOT_FOUND");
    }

    #[test]
    fn create_request_round_trips_camel_case() {
        let body = serde_json::json!({
            "make": "Dell",
            "model": "Latitude 5420",
            "serialNumber": "SN123",
            "assetType": "Laptop",
            "macAddresses": ["aa:bb:cc:dd:ee:ff"],
        });
        let req: CreateAssetRequest = serde_json::from_value(body).expect("deserialize");
        assert_eq!(req.serial_number.as_deref(), Some("SN123"));
        assert_eq!(
            req.mac_addresses.as_deref(),
            Some(&["aa:bb:cc:dd:ee:ff".to_string()][..])
        );
    }
}
