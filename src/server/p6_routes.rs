//! Routes forwarding tool calls to P6.
//!
//! Provides endpoints for:
//! - Login (opens a P6 session and hands its id back)
//! - OBS search by name
//! - Project listing by OBS

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::header::SET_COOKIE,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::session::{CallerSession, COOKIE_SESSION_KEY};
use super::state::ServerState;
use super::{allow_methods, no_store, preflight, ApiError, READ_METHODS, WRITE_METHODS};
use crate::discovery::tools::{LOGIN_PATH, OBS_FIND_PATH, PROJECTS_BY_OBS_PATH};
use crate::p6::{query, ListOptions, ObsNode, ObsSelector, P6Credentials, ProjectRecord};

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
    #[serde(rename = "databaseName")]
    pub database_name: String,
    /// Accepted for client compatibility. Credentials are never kept, so there
    /// is nothing to remember.
    #[serde(default)]
    pub remember: bool,
}

impl LoginBody {
    fn into_credentials(self) -> Result<P6Credentials, ApiError> {
        for (name, value) in [
            ("username", &self.username),
            ("password", &self.password),
            ("databaseName", &self.database_name),
        ] {
            if value.trim().is_empty() {
                return Err(ApiError::Validation(format!("'{}' must not be empty", name)));
            }
        }
        Ok(P6Credentials {
            username: self.username.trim().to_string(),
            password: self.password,
            database_name: self.database_name.trim().to_string(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginSuccessResponse {
    pub success: bool,
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ObsFindQuery {
    #[serde(alias = "query")]
    pub q: Option<String>,
    pub fields: Option<String>,
    pub order_by: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectsByObsQuery {
    pub obs_id: Option<String>,
    pub obs_name: Option<String>,
    pub fields: Option<String>,
    pub order_by: Option<String>,
    pub limit: Option<usize>,
}

/// Envelope of every list response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    pub results: Vec<T>,
    /// Number of records P6 returned, before `limit` was applied.
    pub total: usize,
    pub truncated: bool,
}

impl<T> ListEnvelope<T> {
    pub fn from_upstream(mut results: Vec<T>, limit: usize) -> Self {
        let total = results.len();
        results.truncate(limit);
        ListEnvelope {
            truncated: results.len() < total,
            results,
            total,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /login - Open a P6 session
async fn login(
    State(state): State<ServerState>,
    body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let api = state.p6_api()?;
    let Json(body) = body?;
    if body.remember {
        debug!("Ignoring remember flag, credentials are never stored");
    }
    let credentials = body.into_credentials()?;

    let session = api.login(&credentials).await?;
    info!(
        "Opened P6 session for {} on {}",
        credentials.username, credentials.database_name
    );

    let cookie = Cookie::build((COOKIE_SESSION_KEY, session.as_str().to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    let body = LoginSuccessResponse {
        success: true,
        message: format!("Logged in to P6 database {}", credentials.database_name),
        session_id: session.0,
    };
    Ok(([(SET_COOKIE, cookie.to_string())], Json(body)).into_response())
}

/// GET /obs/find - Fuzzy OBS search by name
async fn find_obs(
    State(state): State<ServerState>,
    session: CallerSession,
    params: Result<Query<ObsFindQuery>, QueryRejection>,
) -> Result<Json<ListEnvelope<ObsNode>>, ApiError> {
    let api = state.p6_api()?;
    let Query(params) = params?;
    let query = query::obs_by_name(
        params.q.as_deref(),
        ListOptions {
            fields: params.fields.as_deref(),
            order_by: params.order_by.as_deref(),
            limit: params.limit,
        },
    )?;
    let session = session.require()?;

    debug!("Searching OBS with filter {:?}", query.filter);
    let nodes = api.find_obs(&session, &query).await?;
    Ok(Json(ListEnvelope::from_upstream(nodes, query.limit)))
}

/// GET /projects/by_obs - Projects belonging to an OBS
async fn projects_by_obs(
    State(state): State<ServerState>,
    session: CallerSession,
    params: Result<Query<ProjectsByObsQuery>, QueryRejection>,
) -> Result<Json<ListEnvelope<ProjectRecord>>, ApiError> {
    let api = state.p6_api()?;
    let Query(params) = params?;
    let selector = ObsSelector::from_params(params.obs_id.as_deref(), params.obs_name.as_deref())?;
    let query = query::projects_by_obs(
        &selector,
        ListOptions {
            fields: params.fields.as_deref(),
            order_by: params.order_by.as_deref(),
            limit: params.limit,
        },
    )?;
    let session = session.require()?;

    debug!("Listing projects with filter {:?}", query.filter);
    let projects = api.list_projects(&session, &query).await?;
    Ok(Json(ListEnvelope::from_upstream(projects, query.limit)))
}

pub fn make_p6_routes() -> Router<ServerState> {
    Router::new()
        .route(
            LOGIN_PATH,
            post(login)
                .options(|| async { preflight(WRITE_METHODS) })
                .route_layer(middleware::from_fn_with_state(WRITE_METHODS, allow_methods)),
        )
        .route(
            OBS_FIND_PATH,
            get(find_obs)
                .options(|| async { preflight(READ_METHODS) })
                .route_layer(middleware::from_fn_with_state(READ_METHODS, allow_methods)),
        )
        .route(
            PROJECTS_BY_OBS_PATH,
            get(projects_by_obs)
                .options(|| async { preflight(READ_METHODS) })
                .route_layer(middleware::from_fn_with_state(READ_METHODS, allow_methods)),
        )
        .route_layer(middleware::from_fn(no_store))
}
