// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Prometheus metrics module
//!
//! Provides global metrics using the default Prometheus registry via macros and
//! an Axum-compatible metrics handler.

use std::{sync::LazyLock, time::Instant};

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use prometheus::{
    Encoder, HistogramVec, IntCounterVec, TextEncoder, register_histogram_vec,
    register_int_counter_vec,
};
use tracing::error;

/// Total number of catalog requests received, labeled by route.
pub static REQUESTS_BY_ROUTE: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "catalog_api_requests_total",
        "Total number of catalog API requests, labeled by route",
        &["route"]
    )
    .expect("Failed to create catalog_api_requests_total counter vec")
});

/// Histogram for product store query durations in seconds.
pub static STORE_QUERY_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "catalog_api_store_query_duration_seconds",
        "Product store query durations in seconds",
        &["operation", "result"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to create store query duration histogram")
});

/// Increment the requests counter with `route` label
pub fn inc_requests(route: &str) {
    REQUESTS_BY_ROUTE.with_label_values(&[route]).inc();
}

/// Observe the duration of a store query
///
/// # Arguments
/// * `operation` - The store operation (`find_page`, `count`, `distinct_values`)
/// * `result` - `ok` or `error`
/// * `started` - When the query was issued
pub fn observe_store_query(operation: &str, result: &str, started: Instant) {
    STORE_QUERY_DURATION
        .with_label_values(&[operation, result])
        .observe(started.elapsed().as_secs_f64());
}

/// Run a store query and record how long it took
pub async fn timed<T, E>(
    operation: &'static str,
    query: impl Future<Output = Result<T, E>>,
) -> Result<T, E> {
    let started = Instant::now();
    let result = query.await;
    let label = if result.is_ok() { "ok" } else { "error" };
    observe_store_query(operation, label, started);
    result
}

/// Axum handler that exports metrics in Prometheus text format
pub async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    match String::from_utf8(buffer) {
        Ok(body) => ([(header::CONTENT_TYPE, encoder.format_type().to_owned())], body).into_response(),
        Err(e) => {
            error!(error = %e, "metrics buffer is not valid UTF-8");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    #[tokio::test]
    async fn timed_records_outcome() {
        let ok: Result<u8, ()> = timed("count", async { Ok(1) }).await;
        let err: Result<u8, ()> = timed("count", async { Err(()) }).await;
        assert!(ok.is_ok());
        assert!(err.is_err());

        assert!(
            STORE_QUERY_DURATION
                .with_label_values(&["count", "error"])
                .get_sample_count()
                >= 1
        );
    }

    #[tokio::test]
    async fn handler_exports_text_format() {
        inc_requests("/brands");

        let response = metrics_handler().await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let text = String::from_utf8(bytes.to_vec()).expect("utf8");
        assert!(text.contains("catalog_api_requests_total"));
    }
}
