//! HTTP caching middleware

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_METHODS, CACHE_CONTROL, CONTENT_SECURITY_POLICY, CONTENT_TYPE,
            X_CONTENT_TYPE_OPTIONS,
        },
        HeaderValue, Request,
    },
    middleware::Next,
    response::Response,
};

pub const DISCOVERY_METHODS: &str = "GET, HEAD, OPTIONS";
pub const DISCOVERY_CSP: &str = "default-src 'none'; style-src 'unsafe-inline'";

/// Header set shared by every discovery document response, whatever the method.
pub async fn discovery_cache(
    State(max_age_sec): State<usize>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_str(&format!("public, max-age={}", max_age_sec))
            .unwrap_or_else(|_| HeaderValue::from_static("no-cache")),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(DISCOVERY_METHODS),
    );
    headers.insert(
        CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(DISCOVERY_CSP),
    );
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    response
}

/// Proxied responses carry live P6 data and must not be cached.
pub async fn no_store(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
