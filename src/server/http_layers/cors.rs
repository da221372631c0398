//! CORS headers for browser-based MCP clients.

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
        },
        HeaderValue, Request, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";
pub const PREFLIGHT_MAX_AGE_SEC: u32 = 600;
pub const READ_METHODS: &str = "GET, HEAD, OPTIONS";
pub const WRITE_METHODS: &str = "POST, OPTIONS";
/// Sent on responses whose route did not declare its own methods, e.g. 404s.
pub const DEFAULT_ALLOWED_METHODS: &str = "GET, HEAD, POST, OPTIONS";

/// Adds the allowed origin, headers and methods to every response, leaving
/// headers a route already set untouched.
pub async fn cors_headers(
    State(origin): State<HeaderValue>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers
        .entry(ACCESS_CONTROL_ALLOW_ORIGIN)
        .or_insert(origin);
    headers
        .entry(ACCESS_CONTROL_ALLOW_HEADERS)
        .or_insert(HeaderValue::from_static(ALLOWED_HEADERS));
    headers
        .entry(ACCESS_CONTROL_ALLOW_METHODS)
        .or_insert(HeaderValue::from_static(DEFAULT_ALLOWED_METHODS));

    response
}

/// Route layer declaring the methods a route supports on its actual
/// (non-preflight) responses.
pub async fn allow_methods(
    State(methods): State<&'static str>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .entry(ACCESS_CONTROL_ALLOW_METHODS)
        .or_insert(HeaderValue::from_static(methods));
    response
}

/// Preflight answer for a route supporting `methods`.
pub fn preflight(methods: &'static str) -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(methods)),
            (
                ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOWED_HEADERS),
            ),
            (
                ACCESS_CONTROL_MAX_AGE,
                HeaderValue::from(PREFLIGHT_MAX_AGE_SEC),
            ),
        ],
    )
        .into_response()
}
