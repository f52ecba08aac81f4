// SPDX-License-Identifier: Apache-2.0

//! The three hardware-asset endpoints: filtered list, single detail, and
//! create. Handlers convert datastore failures to the error envelope at the
//! boundary; only a message string crosses it.

use std::collections::BTreeMap;
use std::time::Instant;

use assetprism_api::{
    params::parse_list_assets_params, ApiError, CreateAssetRequest, Pagination,
};
use assetprism_query::{
    fetch_asset_detail, list_assets, AssetFilter, PageRequest, SortField, SortOrder,
};
use assetprism_store::create_asset;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, info};

use super::handlers::{api_error_response, propagated_request_id, with_request_id};
use crate::AppState;

pub(crate) async fn list_assets_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let parsed = parse_list_assets_params(&params);
    let filter = AssetFilter {
        status: parsed.status.clone(),
        asset_type: parsed.asset_type.clone(),
    };
    let page = PageRequest::new(parsed.page, parsed.limit);
    let sort = SortField::parse_or_default(&parsed.sort_by);
    let order = SortOrder::parse_or_default(parsed.sort_order.as_deref());

    let conn = state.db.conn().await;
    let result = list_assets(&conn, &filter, page, sort, order);
    drop(conn);

    match result {
        Ok((rows, total)) => {
            let pagination = Pagination::new(page.page(), page.limit(), total);
            let resp = Json(json!({"data": rows, "pagination": pagination})).into_response();
            state
                .metrics
                .observe_request("/api/v1/hardware-assets", StatusCode::OK, started.elapsed())
                .await;
            with_request_id(resp, &request_id)
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "asset list query failed");
            let resp = api_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::fetch_failed("Failed to fetch hardware assets", &e.to_string()),
            );
            state
                .metrics
                .observe_request(
                    "/api/v1/hardware-assets",
                    StatusCode::INTERNAL_SERVER_ERROR,
                    started.elapsed(),
                )
                .await;
            with_request_id(resp, &request_id)
        }
    }
}

pub(crate) async fn asset_detail_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    // A non-numeric id can never match a row, so it is a plain 404.
    let Ok(asset_id) = id.parse::<i64>() else {
        let resp = api_error_response(
            StatusCode::NOT_FOUND,
            ApiError::not_found("Hardware asset not found"),
        );
        state
            .metrics
            .observe_request(
                "/api/v1/hardware-assets/{id}",
                StatusCode::NOT_FOUND,
                started.elapsed(),
            )
            .await;
        return with_request_id(resp, &request_id);
    };

    let conn = state.db.conn().await;
    let result = fetch_asset_detail(&conn, asset_id);
    drop(conn);

    match result {
        Ok(Some(detail)) => {
            let resp = Json(detail).into_response();
            state
                .metrics
                .observe_request(
                    "/api/v1/hardware-assets/{id}",
                    StatusCode::OK,
                    started.elapsed(),
                )
                .await;
            with_request_id(resp, &request_id)
        }
        Ok(None) => {
            let resp = api_error_response(
                StatusCode::NOT_FOUND,
                ApiError::not_found("Hardware asset not found"),
            );
            state
                .metrics
                .observe_request(
                    "/api/v1/hardware-assets/{id}",
                    StatusCode::NOT_FOUND,
                    started.elapsed(),
                )
                .await;
            with_request_id(resp, &request_id)
        }
        Err(e) => {
            error!(request_id = %request_id, asset_id, error = %e, "asset detail query failed");
            let resp = api_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::fetch_failed("Failed to fetch hardware asset", &e.to_string()),
            );
            state
                .metrics
                .observe_request(
                    "/api/v1/hardware-assets/{id}",
                    StatusCode::INTERNAL_SERVER_ERROR,
                    started.elapsed(),
                )
                .await;
            with_request_id(resp, &request_id)
        }
    }
}

pub(crate) async fn create_asset_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    // The audit trail wants the body exactly as the caller sent it, so the
    // typed request is decoded from the retained raw value.
    let parsed = serde_json::from_slice::<serde_json::Value>(&body).and_then(|raw| {
        serde_json::from_value::<CreateAssetRequest>(raw.clone()).map(|req| (raw, req))
    });
    let (raw, req) = match parsed {
        Ok(v) => v,
        Err(e) => {
            let resp = api_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::create_failed(&e.to_string()),
            );
            state
                .metrics
                .observe_request(
                    "/api/v1/hardware-assets",
                    StatusCode::INTERNAL_SERVER_ERROR,
                    started.elapsed(),
                )
                .await;
            return with_request_id(resp, &request_id);
        }
    };
    if let Err(err) = req.validate() {
        let resp = api_error_response(StatusCode::BAD_REQUEST, err);
        state
            .metrics
            .observe_request(
                "/api/v1/hardware-assets",
                StatusCode::BAD_REQUEST,
                started.elapsed(),
            )
            .await;
        return with_request_id(resp, &request_id);
    }

    let conn = state.db.conn().await;
    let result = create_asset(&conn, &req, &raw);
    drop(conn);

    match result {
        Ok(asset) => {
            info!(request_id = %request_id, asset_id = asset.id, "hardware asset created");
            let resp = (StatusCode::CREATED, Json(asset)).into_response();
            state
                .metrics
                .observe_request(
                    "/api/v1/hardware-assets",
                    StatusCode::CREATED,
                    started.elapsed(),
                )
                .await;
            with_request_id(resp, &request_id)
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "asset creation failed");
            let resp = api_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::create_failed(&e.to_string()),
            );
            state
                .metrics
                .observe_request(
                    "/api/v1/hardware-assets",
                    StatusCode::INTERNAL_SERVER_ERROR,
                    started.elapsed(),
                )
                .await;
            with_request_id(resp, &request_id)
        }
    }
}
