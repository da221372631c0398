//! HTTP client for the Oracle Primavera P6 REST API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, COOKIE, SET_COOKIE};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::models::{ObsNode, P6Credentials, P6Session, ProjectRecord};
use super::query::ListQuery;

/// Name of the cookie P6 uses to carry its session.
pub const P6_SESSION_COOKIE: &str = "JSESSIONID";

/// Upstream error bodies are cut to this many characters before being echoed.
const MAX_ERROR_DETAIL_CHARS: usize = 512;

#[derive(Debug, Error)]
pub enum P6Error {
    #[error("P6 responded with status {status}")]
    Status { status: u16, body: String },

    #[error("P6 did not respond within {0:?}")]
    Timeout(Duration),

    #[error("Could not reach P6: {0}")]
    Transport(String),

    #[error("Unexpected P6 response: {0}")]
    Decode(String),

    #[error("Could not build the P6 request: {0}")]
    InvalidRequest(String),
}

/// Operations the server proxies to P6.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait P6Api: Send + Sync {
    /// Opens a P6 session for the given credentials.
    async fn login(&self, credentials: &P6Credentials) -> Result<P6Session, P6Error>;

    /// Lists OBS nodes matching the query, in upstream order.
    async fn find_obs(&self, session: &P6Session, query: &ListQuery)
        -> Result<Vec<ObsNode>, P6Error>;

    /// Lists projects matching the query, in upstream order.
    async fn list_projects(
        &self,
        session: &P6Session,
        query: &ListQuery,
    ) -> Result<Vec<ProjectRecord>, P6Error>;
}

pub struct P6Client {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl P6Client {
    /// Create a new P6 client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the P6 REST API (e.g., "https://host/p6ws/restapi")
    /// * `timeout` - Upper bound for a whole upstream call, body included
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create P6 HTTP client")?;

        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> P6Error {
        if err.is_timeout() {
            P6Error::Timeout(self.timeout)
        } else if err.is_decode() {
            P6Error::Decode(err.to_string())
        } else if err.is_builder() {
            P6Error::InvalidRequest(err.to_string())
        } else {
            P6Error::Transport(err.to_string())
        }
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, P6Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(P6Error::Status {
            status: status.as_u16(),
            body: body.trim().chars().take(MAX_ERROR_DETAIL_CHARS).collect(),
        })
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        session: &P6Session,
        query: &ListQuery,
    ) -> Result<Vec<T>, P6Error> {
        let url = self.url(path);
        debug!("GET {} filter={:?}", url, query.filter);

        let response = self
            .client
            .get(&url)
            .header(COOKIE, format!("{}={}", P6_SESSION_COOKIE, session.as_str()))
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let response = Self::ensure_success(response).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        // P6 answers an empty body, not `[]`, when nothing matches.
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&body).map_err(|e| P6Error::Decode(e.to_string()))
    }
}

#[async_trait]
impl P6Api for P6Client {
    async fn login(&self, credentials: &P6Credentials) -> Result<P6Session, P6Error> {
        let url = self.url("login");
        debug!(
            "POST {} user={} database={}",
            url, credentials.username, credentials.database_name
        );

        let response = self
            .client
            .post(&url)
            .query(&[("DatabaseName", credentials.database_name.as_str())])
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let response = Self::ensure_success(response).await?;
        session_from_set_cookie(response.headers()).ok_or_else(|| {
            P6Error::Decode(format!(
                "login succeeded but no {} cookie was set",
                P6_SESSION_COOKIE
            ))
        })
    }

    async fn find_obs(
        &self,
        session: &P6Session,
        query: &ListQuery,
    ) -> Result<Vec<ObsNode>, P6Error> {
        self.get_list("obs", session, query).await
    }

    async fn list_projects(
        &self,
        session: &P6Session,
        query: &ListQuery,
    ) -> Result<Vec<ProjectRecord>, P6Error> {
        self.get_list("project", session, query).await
    }
}

/// Pulls the P6 session id out of the `Set-Cookie` headers of a login response.
pub fn session_from_set_cookie(headers: &HeaderMap) -> Option<P6Session> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, value)| name.trim() == P6_SESSION_COOKIE && !value.trim().is_empty())
        .map(|(_, value)| P6Session(value.trim().to_string()))
}
