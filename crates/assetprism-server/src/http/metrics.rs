// SPDX-License-Identifier: Apache-2.0

//! Prometheus text exposition for the per-route request counters and
//! latency percentiles collected by [`crate::AppState`].

use std::time::Instant;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use super::handlers::{propagated_request_id, with_request_id};
use crate::AppState;

const METRIC_VERSION: &str = env!("CARGO_PKG_VERSION");

fn percentile_ns(values: &[u64], pct: f64) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let mut v = values.to_vec();
    v.sort_unstable();
    let idx = ((v.len() as f64 - 1.0) * pct).round() as usize;
    v[idx]
}

pub(crate) async fn metrics_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);

    let mut body = String::new();
    // Sorted so successive scrapes emit series in a stable order.
    let mut counts: Vec<_> = state
        .metrics
        .counts
        .lock()
        .await
        .iter()
        .map(|((route, status), count)| (route.clone(), *status, *count))
        .collect();
    counts.sort();
    for (route, status, count) in counts {
        body.push_str(&format!(
            "assetprism_http_requests_total{{version=\"{METRIC_VERSION}\",route=\"{route}\",status=\"{status}\"}} {count}\n"
        ));
    }
    let mut latency: Vec<_> = state
        .metrics
        .latency_ns
        .lock()
        .await
        .iter()
        .map(|(route, samples)| (route.clone(), samples.clone()))
        .collect();
    latency.sort();
    for (route, samples) in latency {
        body.push_str(&format!(
            "assetprism_http_request_latency_p95_seconds{{version=\"{METRIC_VERSION}\",route=\"{route}\"}} {:.6}\n",
            percentile_ns(&samples, 0.95) as f64 / 1_000_000_000.0
        ));
    }

    let resp = (StatusCode::OK, body).into_response();
    state
        .metrics
        .observe_request("/metrics", StatusCode::OK, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

#[cfg(test)]
mod tests {
    use super::percentile_ns;

    #[test]
    fn percentile_of_empty_sample_set_is_zero() {
        assert_eq!(percentile_ns(&[], 0.95), 0);
    }

    #[test]
    fn percentile_picks_the_upper_tail() {
        let samples: Vec<u64> = (1..=100).collect();
        assert_eq!(percentile_ns(&samples, 0.95), 95);
        assert_eq!(percentile_ns(&samples, 0.5), 51);
    }
}
