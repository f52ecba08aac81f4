// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use assetprism_server::{build_router, AppState};
use assetprism_store::Database;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn spawn_server() -> std::net::SocketAddr {
    let db = Database::open_in_memory().expect("open db");
    let app = build_router(AppState::new(Arc::new(db)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

async fn send_raw(
    addr: std::net::SocketAddr,
    method: &str,
    path: &str,
    body: Option<&Value>,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let req = match body {
        Some(payload) => {
            let encoded = payload.to_string();
            format!(
                "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\
                 Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{encoded}",
                encoded.len()
            )
        }
        None => format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n"),
    };
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    (status, head.to_string(), body.to_string())
}

fn laptop_payload(serial: &str) -> Value {
    json!({
        "make": "Dell",
        "model": "Latitude 5420",
        "serialNumber": serial,
        "assetType": "Laptop",
        "cpu": "i7-1185G7",
        "ram": "16GB",
    })
}

#[tokio::test]
async fn health_and_landing_respond() {
    let addr = spawn_server().await;

    let (status, head, body) = send_raw(addr, "GET", "/health", None).await;
    assert_eq!(status, 200);
    assert!(head.to_lowercase().contains("x-request-id"));
    let health: Value = serde_json::from_str(&body).expect("health json");
    assert_eq!(health["status"], "healthy");
    assert!(health["version"].is_string());

    let (status, _, body) = send_raw(addr, "GET", "/", None).await;
    assert_eq!(status, 200);
    let landing: Value = serde_json::from_str(&body).expect("landing json");
    assert!(landing["endpoints"]
        .as_array()
        .expect("endpoint list")
        .iter()
        .any(|e| e == "/api/v1/hardware-assets"));
}

#[tokio::test]
async fn create_then_list_then_detail_round_trip() {
    let addr = spawn_server().await;

    let (status, _, body) = send_raw(
        addr,
        "POST",
        "/api/v1/hardware-assets",
        Some(&laptop_payload("SN-1001")),
    )
    .await;
    assert_eq!(status, 201);
    let created: Value = serde_json::from_str(&body).expect("created json");
    assert_eq!(created["serial_number"], "SN-1001");
    assert_eq!(created["status"], "in_stock");
    let id = created["id"].as_i64().expect("id");

    let (status, _, body) = send_raw(addr, "GET", "/api/v1/hardware-assets", None).await;
    assert_eq!(status, 200);
    let list: Value = serde_json::from_str(&body).expect("list json");
    assert_eq!(list["pagination"]["totalItems"], 1);
    assert_eq!(list["pagination"]["currentPage"], 1);
    assert_eq!(list["pagination"]["itemsPerPage"], 25);
    let rows = list["data"].as_array().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["model_name"], "Latitude 5420");
    assert_eq!(rows[0]["manufacturer_name"], "Dell");
    assert_eq!(rows[0]["category_name"], "Laptop");

    let (status, _, body) =
        send_raw(addr, "GET", &format!("/api/v1/hardware-assets/{id}"), None).await;
    assert_eq!(status, 200);
    let detail: Value = serde_json::from_str(&body).expect("detail json");
    assert_eq!(detail["serial_number"], "SN-1001");
    assert_eq!(detail["specifications"]["cpu"], "i7-1185G7");
    assert!(detail["specifications"]["storage"].is_null());
    assert!(detail["current_assignment"].is_null());
}

#[tokio::test]
async fn missing_asset_returns_not_found_envelope() {
    let addr = spawn_server().await;

    let (status, _, body) = send_raw(addr, "GET", "/api/v1/hardware-assets/9999", None).await;
    assert_eq!(status, 404);
    let err: Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"]["code"], "NOT_FOUND");
    assert_eq!(err["error"]["message"], "Hardware asset not found");

    let (status, _, _) = send_raw(addr, "GET", "/api/v1/hardware-assets/not-a-number", None).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn invalid_create_reports_missing_fields() {
    let addr = spawn_server().await;

    let (status, _, body) = send_raw(
        addr,
        "POST",
        "/api/v1/hardware-assets",
        Some(&json!({"make": "Dell"})),
    )
    .await;
    assert_eq!(status, 400);
    let err: Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"]["code"], "VALIDATION_ERROR");
    let missing = err["error"]["details"]["missing"]
        .as_array()
        .expect("missing list");
    assert!(missing.iter().any(|m| m == "serialNumber"));

    // Nothing may land in the table on a validation failure.
    let (_, _, body) = send_raw(addr, "GET", "/api/v1/hardware-assets", None).await;
    let list: Value = serde_json::from_str(&body).expect("list json");
    assert_eq!(list["pagination"]["totalItems"], 0);
}

#[tokio::test]
async fn list_filters_sorts_and_paginates() {
    let addr = spawn_server().await;

    for (serial, asset_type, status) in [
        ("SN-A", "Laptop", "in_stock"),
        ("SN-B", "Laptop", "deployed"),
        ("SN-C", "Monitor", "deployed"),
    ] {
        let mut payload = laptop_payload(serial);
        payload["assetType"] = json!(asset_type);
        payload["initialStatus"] = json!(status);
        let (code, _, _) =
            send_raw(addr, "POST", "/api/v1/hardware-assets", Some(&payload)).await;
        assert_eq!(code, 201);
    }

    let (status, _, body) = send_raw(
        addr,
        "GET",
        "/api/v1/hardware-assets?status=deployed&assetType=Laptop",
        None,
    )
    .await;
    assert_eq!(status, 200);
    let list: Value = serde_json::from_str(&body).expect("list json");
    assert_eq!(list["pagination"]["totalItems"], 1);
    assert_eq!(list["data"][0]["serial_number"], "SN-B");

    let (status, _, body) = send_raw(
        addr,
        "GET",
        "/api/v1/hardware-assets?sortBy=serial_number&sortOrder=asc&limit=2&page=2",
        None,
    )
    .await;
    assert_eq!(status, 200);
    let list: Value = serde_json::from_str(&body).expect("list json");
    assert_eq!(list["pagination"]["totalPages"], 2);
    assert_eq!(list["pagination"]["currentPage"], 2);
    let rows = list["data"].as_array().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["serial_number"], "SN-C");

    // Unknown sort column silently falls back rather than erroring.
    let (status, _, _) = send_raw(
        addr,
        "GET",
        "/api/v1/hardware-assets?sortBy=id;%20DROP%20TABLE",
        None,
    )
    .await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn duplicate_serial_surfaces_create_error() {
    let addr = spawn_server().await;

    let (status, _, _) = send_raw(
        addr,
        "POST",
        "/api/v1/hardware-assets",
        Some(&laptop_payload("SN-1")),
    )
    .await;
    assert_eq!(status, 201);

    let (status, _, body) = send_raw(
        addr,
        "POST",
        "/api/v1/hardware-assets",
        Some(&laptop_payload("SN-1")),
    )
    .await;
    assert_eq!(status, 500);
    let err: Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"]["code"], "CREATE_ERROR");
}

#[tokio::test]
async fn reference_endpoints_return_arrays() {
    let addr = spawn_server().await;

    let (status, _, _) = send_raw(
        addr,
        "POST",
        "/api/v1/hardware-assets",
        Some(&laptop_payload("SN-1")),
    )
    .await;
    assert_eq!(status, 201);

    let (status, _, body) = send_raw(addr, "GET", "/api/v1/manufacturers", None).await;
    assert_eq!(status, 200);
    let makers: Value = serde_json::from_str(&body).expect("makers json");
    assert_eq!(makers[0]["name"], "Dell");

    let (status, _, body) = send_raw(addr, "GET", "/api/v1/asset-categories", None).await;
    assert_eq!(status, 200);
    let categories: Value = serde_json::from_str(&body).expect("categories json");
    assert_eq!(categories[0]["name"], "Laptop");

    let (status, _, body) = send_raw(addr, "GET", "/api/v1/users", None).await;
    assert_eq!(status, 200);
    let users: Value = serde_json::from_str(&body).expect("users json");
    assert!(users.as_array().expect("users array").is_empty());

    let (status, _, body) = send_raw(addr, "GET", "/api/v1/locations", None).await;
    assert_eq!(status, 200);
    assert!(serde_json::from_str::<Value>(&body)
        .expect("locations json")
        .as_array()
        .expect("locations array")
        .is_empty());
}

#[tokio::test]
async fn request_id_is_propagated_from_the_caller() {
    let addr = spawn_server().await;

    for path in ["/api/v1/hardware-assets", "/health"] {
        let mut stream = tokio::net::TcpStream::connect(addr)
            .await
            .expect("connect server");
        let req = format!(
            "GET {path} HTTP/1.1\r\nHost: {addr}\r\n\
             X-Request-Id: caller-abc-123\r\nConnection: close\r\n\r\n"
        );
        stream.write_all(req.as_bytes()).await.expect("write");
        let mut response = String::new();
        stream.read_to_string(&mut response).await.expect("read");
        let head = response
            .split_once("\r\n\r\n")
            .map(|(h, _)| h.to_lowercase())
            .expect("head");
        assert!(head.contains("x-request-id: caller-abc-123"), "{path}");
    }
}

#[tokio::test]
async fn metrics_report_served_requests() {
    let addr = spawn_server().await;

    let (status, _, _) = send_raw(addr, "GET", "/health", None).await;
    assert_eq!(status, 200);
    let (status, _, _) = send_raw(addr, "GET", "/api/v1/hardware-assets", None).await;
    assert_eq!(status, 200);
    let (status, _, _) = send_raw(addr, "GET", "/api/v1/hardware-assets/9999", None).await;
    assert_eq!(status, 404);

    let (status, _, body) = send_raw(addr, "GET", "/metrics", None).await;
    assert_eq!(status, 200);
    assert!(body.contains(
        "route=\"/health\",status=\"200\"} 1"
    ));
    assert!(body.contains(
        "route=\"/api/v1/hardware-assets\",status=\"200\"} 1"
    ));
    assert!(body.contains(
        "route=\"/api/v1/hardware-assets/{id}\",status=\"404\"} 1"
    ));
    assert!(body.contains("assetprism_http_request_latency_p95_seconds"));

    // A second scrape sees the first one counted too.
    let (_, _, body) = send_raw(addr, "GET", "/metrics", None).await;
    assert!(body.contains("route=\"/metrics\",status=\"200\"} 1"));
}
