//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all bridge endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::{Method, Response};
use serde_json::json;
use std::time::Duration;

/// HTTP test client with cookie-based session management
#[allow(dead_code)]
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

#[allow(dead_code)]
impl TestClient {
    /// Creates a new client without a P6 session
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true) // Keeps the p6_session cookie set by /login
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// Creates a client already logged in to the fake P6
    ///
    /// # Panics
    ///
    /// Panics if login fails (indicates test infrastructure problem).
    pub async fn authenticated(base_url: String) -> Self {
        let client = Self::new(base_url);

        let response = client.login(P6_USER, P6_PASS).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "P6 login failed: {:?}",
            response.text().await
        );

        client
    }

    // ========================================================================
    // Discovery Endpoints
    // ========================================================================

    /// GET /health
    pub async fn health(&self) -> Response {
        self.request(Method::GET, "/health").await
    }

    /// GET /.well-known/mcp.json
    pub async fn get_manifest(&self) -> Response {
        self.request(Method::GET, "/.well-known/mcp.json").await
    }

    /// GET /tool_schema.json
    pub async fn get_tool_schema(&self) -> Response {
        self.request(Method::GET, "/tool_schema.json").await
    }

    /// Any method on any path, for HEAD/OPTIONS checks
    pub async fn request(&self, method: Method, path: &str) -> Response {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // P6 Endpoints
    // ========================================================================

    /// POST /login
    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.client
            .post(format!("{}/login", self.base_url))
            .json(&json!({
                "username": username,
                "password": password,
                "databaseName": P6_DATABASE,
                "remember": true
            }))
            .send()
            .await
            .expect("Login request failed")
    }

    /// GET /obs/find?q=...
    pub async fn find_obs(&self, q: &str) -> Response {
        self.find_obs_with(&[("q", q)]).await
    }

    /// GET /obs/find with arbitrary query parameters
    pub async fn find_obs_with(&self, params: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/obs/find", self.base_url))
            .query(params)
            .send()
            .await
            .expect("OBS find request failed")
    }

    /// GET /projects/by_obs with arbitrary query parameters
    pub async fn projects_by_obs(&self, params: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/projects/by_obs", self.base_url))
            .query(params)
            .send()
            .await
            .expect("Projects request failed")
    }
}
