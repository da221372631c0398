//! Routes serving the MCP discovery documents.
//!
//! GET, HEAD and OPTIONS all go through the same header layer so clients see
//! an identical header set whichever method they use.

use axum::{
    extract::State,
    http::{
        header::{ETAG, HOST, IF_NONE_MATCH},
        HeaderMap, HeaderValue, StatusCode,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

use super::state::ServerState;
use super::{discovery_cache, ApiError, ServerConfig};
use crate::discovery::{
    etag_for, etag_matches, Manifest, ToolSchema, MANIFEST_PATH, TOOL_SCHEMA_PATH,
};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Base URL under which the caller reached this server.
pub fn public_base_url(config: &ServerConfig, headers: &HeaderMap) -> String {
    if let Some(url) = &config.public_base_url {
        return url.clone();
    }

    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty());

    match host {
        Some(host) => {
            let scheme = headers
                .get(FORWARDED_PROTO)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|p| *p == "http" || *p == "https")
                .unwrap_or("http");
            format!("{}://{}", scheme, host)
        }
        None => format!("http://localhost:{}", config.port),
    }
}

fn document_response<T: Serialize>(
    document: &T,
    request_headers: &HeaderMap,
) -> Result<Response, ApiError> {
    let body = serde_json::to_vec(document)
        .map_err(|e| ApiError::Internal(format!("Could not serialize document: {}", e)))?;
    let etag = etag_for(&body);
    let etag_value = HeaderValue::from_str(&etag).map_err(|e| ApiError::Internal(e.to_string()))?;

    let not_modified = request_headers
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| etag_matches(v, &etag));

    if not_modified {
        return Ok((StatusCode::NOT_MODIFIED, [(ETAG, etag_value)]).into_response());
    }
    Ok((StatusCode::OK, [(ETAG, etag_value)], body).into_response())
}

async fn get_manifest(
    State(config): State<ServerConfig>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let manifest = Manifest::build(&public_base_url(&config, &headers));
    document_response(&manifest, &headers)
}

async fn get_tool_schema(
    State(config): State<ServerConfig>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let schema = ToolSchema::build(&public_base_url(&config, &headers));
    document_response(&schema, &headers)
}

async fn discovery_preflight() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

pub fn make_discovery_routes(cache_age_sec: usize) -> Router<ServerState> {
    Router::new()
        .route(
            MANIFEST_PATH,
            get(get_manifest).options(discovery_preflight),
        )
        .route(
            TOOL_SCHEMA_PATH,
            get(get_tool_schema).options(discovery_preflight),
        )
        .route_layer(middleware::from_fn_with_state(cache_age_sec, discovery_cache))
}
