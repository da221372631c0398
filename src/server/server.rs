use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use axum::{
    extract::{OriginalUri, State},
    http::{
        header::{CACHE_CONTROL, EXPIRES, PRAGMA},
        HeaderValue, StatusCode,
    },
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::discovery_routes::make_discovery_routes;
use super::error::ErrorBody;
use super::p6_routes::make_p6_routes;
use super::state::{OptionalP6Api, ServerState};
use super::{allow_methods, cors_headers, log_requests, preflight, ServerConfig, READ_METHODS};
use crate::discovery::tools::{LOGIN_PATH, OBS_FIND_PATH, PROJECTS_BY_OBS_PATH};
use crate::discovery::{MANIFEST_PATH, TOOL_SCHEMA_PATH};
use crate::p6::{P6Api, P6Client};

pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub status: String,
    pub time: i64,
    pub timestamp: String,
    pub uptime: String,
    pub version: String,
    pub mcp_ready: bool,
    pub upstream: UpstreamStatus,
    pub warnings: Vec<String>,
    pub endpoints: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpstreamStatus {
    pub configured: bool,
    pub base_url: Option<String>,
    pub timeout_sec: u64,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

fn endpoint_map() -> BTreeMap<String, String> {
    [
        ("health", HEALTH_PATH),
        ("mcp_manifest", MANIFEST_PATH),
        ("tool_schema", TOOL_SCHEMA_PATH),
        ("login", LOGIN_PATH),
        ("obs_find", OBS_FIND_PATH),
        ("projects_by_obs", PROJECTS_BY_OBS_PATH),
    ]
    .into_iter()
    .map(|(name, path)| (name.to_string(), path.to_string()))
    .collect()
}

/// Always 200 while the process is alive; problems are reported in the body.
async fn health(State(state): State<ServerState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let upstream_ready = state.p6.is_some();
    let warnings: Vec<String> = state.config.upstream.problem().into_iter().collect();

    let response = HealthResponse {
        ok: true,
        status: if upstream_ready && warnings.is_empty() {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        time: now.timestamp(),
        timestamp: now.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mcp_ready: true,
        upstream: UpstreamStatus {
            configured: upstream_ready,
            base_url: state.config.upstream.base_url().map(str::to_string),
            timeout_sec: state.config.upstream_timeout_sec,
        },
        warnings,
        endpoints: endpoint_map(),
    };

    (
        [
            (
                CACHE_CONTROL,
                HeaderValue::from_static("no-cache, no-store, must-revalidate"),
            ),
            (PRAGMA, HeaderValue::from_static("no-cache")),
            (EXPIRES, HeaderValue::from_static("0")),
        ],
        Json(response),
    )
}

async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "not_found".to_string(),
            detail: format!("No route for {}", uri.path()),
        }),
    )
}

pub fn make_app(config: ServerConfig, p6: OptionalP6Api) -> Result<Router> {
    let origin = HeaderValue::from_str(&config.cors_origin)
        .with_context(|| format!("Invalid CORS origin: {:?}", config.cors_origin))?;
    let state = ServerState::new(config.clone(), p6);

    let app: Router = Router::new()
        .route(
            HEALTH_PATH,
            get(health)
                .options(|| async { preflight(READ_METHODS) })
                .route_layer(middleware::from_fn_with_state(READ_METHODS, allow_methods)),
        )
        .merge(make_discovery_routes(config.discovery_cache_age_sec))
        .merge(make_p6_routes())
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(origin, cors_headers))
        .layer(middleware::from_fn_with_state(
            config.requests_logging_level.clone(),
            log_requests,
        ));

    Ok(app)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutting down...");
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    let p6: OptionalP6Api = match config.upstream.base_url() {
        Some(base_url) => {
            info!("Forwarding tool calls to P6 at {}", base_url);
            let client = P6Client::new(
                base_url,
                Duration::from_secs(config.upstream_timeout_sec),
            )?;
            Some(Arc::new(client) as Arc<dyn P6Api>)
        }
        None => {
            if let Some(problem) = config.upstream.problem() {
                warn!("{}, proxied tools will fail until it is fixed", problem);
            }
            None
        }
    };

    let port = config.port;
    let app = make_app(config, p6)?;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    info!("Ready to serve at port {}!", port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}
