// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Middleware module for HTTP request processing
//!
//! Browser access to the catalog is limited to a fixed list of origins. Two
//! pieces cooperate:
//!
//! - [`origin_guard`] rejects any request whose `Origin` header is not on the
//!   list with `403 Forbidden` before it reaches a handler. Requests without an
//!   `Origin` (curl, server-to-server, probes) pass through.
//! - [`OriginAllowList::cors_layer`] answers preflights and adds the
//!   `Access-Control-Allow-*` headers for allowed origins.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{debug, warn};

use crate::error::{ServerError, ServerResult};

/// Exact-match list of origins allowed to call the API
#[derive(Debug, Clone)]
pub struct OriginAllowList {
    origins: Arc<[HeaderValue]>,
}

impl OriginAllowList {
    /// Build the list from configured origins
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if an entry cannot be a header value, since
    /// such an origin could never match a request.
    pub fn new<I, O>(origins: I) -> ServerResult<Self>
    where
        I: IntoIterator<Item = O>,
        O: AsRef<str>,
    {
        let origins = origins
            .into_iter()
            .map(|origin| {
                let origin = origin.as_ref();
                HeaderValue::from_str(origin).map_err(|e| ServerError::Config {
                    message: format!("invalid allowed origin {origin:?}: {e}"),
                })
            })
            .collect::<ServerResult<Arc<[HeaderValue]>>>()?;
        Ok(Self { origins })
    }

    /// Whether `origin` is on the list
    pub fn is_allowed(&self, origin: &HeaderValue) -> bool {
        self.origins.iter().any(|allowed| allowed == origin)
    }

    /// Number of allowed origins
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    /// Whether no origin is allowed
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// CORS layer advertising exactly these origins for `GET` requests
    pub fn cors_layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.origins.iter().cloned()))
            .allow_methods([Method::GET, Method::OPTIONS])
    }
}

/// Reject requests from origins outside the allow-list
pub async fn origin_guard(
    State(allow_list): State<OriginAllowList>,
    req: Request,
    next: Next,
) -> Response {
    if let Some(origin) = req.headers().get(header::ORIGIN) {
        if !allow_list.is_allowed(origin) {
            warn!(
                origin = ?origin,
                path = %req.uri().path(),
                "rejecting request from origin outside the allow-list"
            );
            return StatusCode::FORBIDDEN.into_response();
        }
        debug!(origin = ?origin, "allowed origin");
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, middleware::from_fn_with_state, routing::get};
    use tower::ServiceExt;

    use super::*;
    use crate::config::DEFAULT_ALLOWED_ORIGINS;

    fn app() -> Router {
        let allow_list = OriginAllowList::new(DEFAULT_ALLOWED_ORIGINS).expect("valid origins");
        Router::new()
            .route("/brands", get(|| async { "[]" }))
            .layer(allow_list.cors_layer())
            .layer(from_fn_with_state(allow_list, origin_guard))
    }

    fn request(method: Method, origin: Option<&str>) -> Request {
        let mut builder = Request::builder().method(method).uri("/brands");
        if let Some(origin) = origin {
            builder = builder.header(header::ORIGIN, origin);
        }
        builder.body(Body::empty()).expect("request")
    }

    #[test]
    fn invalid_entries_are_rejected() {
        let err = OriginAllowList::new(["http://localhost:5173", "bad\norigin"])
            .expect_err("newline is not a header value");
        assert!(matches!(err, ServerError::Config { .. }));
    }

    #[test]
    fn matching_is_exact() {
        let list = OriginAllowList::new(DEFAULT_ALLOWED_ORIGINS).expect("valid origins");
        assert_eq!(list.len(), 3);
        assert!(list.is_allowed(&HeaderValue::from_static(
            "https://gadget-world-client.vercel.app"
        )));
        assert!(!list.is_allowed(&HeaderValue::from_static(
            "https://gadget-world-client.vercel.app/"
        )));
        assert!(!list.is_allowed(&HeaderValue::from_static("http://LOCALHOST:5173")));
    }

    #[tokio::test]
    async fn allowed_origin_gets_cors_headers() {
        let response = app()
            .oneshot(request(Method::GET, Some("http://localhost:5174")))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("http://localhost:5174"))
        );
    }

    #[tokio::test]
    async fn foreign_origin_is_forbidden() {
        let response = app()
            .oneshot(request(Method::GET, Some("https://evil.example")))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn requests_without_origin_pass() {
        let response = app()
            .oneshot(request(Method::GET, None))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }

    #[tokio::test]
    async fn preflight_from_allowed_origin_succeeds() {
        let mut req = request(Method::OPTIONS, Some("http://localhost:5173"));
        req.headers_mut().insert(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("GET"),
        );

        let response = app().oneshot(req).await.expect("response");
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("http://localhost:5173"))
        );
    }
}
