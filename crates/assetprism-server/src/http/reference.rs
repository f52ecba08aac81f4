// SPDX-License-Identifier: Apache-2.0

//! Pass-through reads for the reference tables backing asset assignment.

use std::time::Instant;

use assetprism_api::ApiError;
use assetprism_query::{list_asset_categories, list_locations, list_manufacturers, list_users};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rusqlite::Connection;
use tracing::error;

use super::handlers::{api_error_response, propagated_request_id, with_request_id};
use crate::AppState;

async fn reference_response<T, F>(
    state: &AppState,
    headers: &HeaderMap,
    route: &'static str,
    failure_message: &'static str,
    query: F,
) -> Response
where
    T: serde::Serialize,
    F: FnOnce(&Connection) -> Result<Vec<T>, assetprism_query::QueryError>,
{
    let started = Instant::now();
    let request_id = propagated_request_id(headers, state);
    let conn = state.db.conn().await;
    let result = query(&conn);
    drop(conn);

    match result {
        Ok(rows) => {
            let resp = Json(rows).into_response();
            state
                .metrics
                .observe_request(route, StatusCode::OK, started.elapsed())
                .await;
            with_request_id(resp, &request_id)
        }
        Err(e) => {
            error!(request_id = %request_id, route, error = %e, "reference query failed");
            let resp = api_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::fetch_failed(failure_message, &e.to_string()),
            );
            state
                .metrics
                .observe_request(route, StatusCode::INTERNAL_SERVER_ERROR, started.elapsed())
                .await;
            with_request_id(resp, &request_id)
        }
    }
}

pub(crate) async fn users_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    reference_response(
        &state,
        &headers,
        "/api/v1/users",
        "Failed to fetch users",
        list_users,
    )
    .await
}

pub(crate) async fn locations_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    reference_response(
        &state,
        &headers,
        "/api/v1/locations",
        "Failed to fetch locations",
        list_locations,
    )
    .await
}

pub(crate) async fn manufacturers_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    reference_response(
        &state,
        &headers,
        "/api/v1/manufacturers",
        "Failed to fetch manufacturers",
        list_manufacturers,
    )
    .await
}

pub(crate) async fn asset_categories_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    reference_response(
        &state,
        &headers,
        "/api/v1/asset-categories",
        "Failed to fetch asset categories",
        list_asset_categories,
    )
    .await
}
