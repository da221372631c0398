mod file_config;

pub use file_config::FileConfig;

use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{bail, Context, Result};
use axum::http::HeaderValue;
use clap::ValueEnum;
use reqwest::Url;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub p6_base_url: Option<String>,
    pub public_base_url: Option<String>,
    pub upstream_timeout_sec: u64,
    pub discovery_cache_age_sec: usize,
    pub cors_origin: String,
    pub logging_level: RequestsLoggingLevel,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            port: 8000,
            p6_base_url: None,
            public_base_url: None,
            upstream_timeout_sec: 10,
            discovery_cache_age_sec: 3600,
            cors_origin: "*".to_string(),
            logging_level: RequestsLoggingLevel::Path,
        }
    }
}

/// Where the P6 REST API lives, as far as configuration could tell.
///
/// A missing or malformed URL does not stop the process: health reports it and
/// proxied calls fail with a configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamTarget {
    Configured(String),
    Missing,
    Invalid { value: String, reason: String },
}

impl UpstreamTarget {
    pub fn parse(raw: Option<&str>) -> UpstreamTarget {
        let value = match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(value) => value,
            None => return UpstreamTarget::Missing,
        };
        match parse_http_url(value) {
            Ok(url) => UpstreamTarget::Configured(url),
            Err(reason) => UpstreamTarget::Invalid {
                value: value.to_string(),
                reason,
            },
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        match self {
            UpstreamTarget::Configured(url) => Some(url),
            _ => None,
        }
    }

    /// Human readable description of what is wrong, if anything.
    pub fn problem(&self) -> Option<String> {
        match self {
            UpstreamTarget::Configured(_) => None,
            UpstreamTarget::Missing => Some("P6_BASE_URL is not set".to_string()),
            UpstreamTarget::Invalid { value, reason } => {
                Some(format!("P6_BASE_URL {:?} is invalid: {}", value, reason))
            }
        }
    }
}

fn parse_http_url(value: &str) -> std::result::Result<String, String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(value.trim_end_matches('/').to_string())
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub upstream: UpstreamTarget,
    pub public_base_url: Option<String>,
    pub upstream_timeout_sec: u64,
    pub discovery_cache_age_sec: usize,
    pub cors_origin: String,
    pub logging_level: RequestsLoggingLevel,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);

        let p6_base_url = file.p6_base_url.or_else(|| cli.p6_base_url.clone());
        let upstream = UpstreamTarget::parse(p6_base_url.as_deref());

        let public_base_url = match file
            .public_base_url
            .or_else(|| cli.public_base_url.clone())
            .filter(|s| !s.trim().is_empty())
        {
            Some(raw) => Some(
                parse_http_url(raw.trim())
                    .map_err(|reason| anyhow::anyhow!(reason))
                    .with_context(|| format!("Invalid public base URL: {:?}", raw))?,
            ),
            None => None,
        };

        let upstream_timeout_sec = file
            .upstream_timeout_sec
            .unwrap_or(cli.upstream_timeout_sec);
        if upstream_timeout_sec == 0 {
            bail!("upstream_timeout_sec must be greater than zero");
        }

        let discovery_cache_age_sec = file
            .discovery_cache_age_sec
            .unwrap_or(cli.discovery_cache_age_sec);

        let cors_origin = file.cors_origin.unwrap_or_else(|| cli.cors_origin.clone());
        HeaderValue::from_str(&cors_origin)
            .with_context(|| format!("Invalid CORS origin: {:?}", cors_origin))?;

        let logging_level = match file.logging_level {
            Some(s) => parse_logging_level(&s)
                .ok_or_else(|| anyhow::anyhow!("Invalid logging_level: {:?}", s))?,
            None => cli.logging_level.clone(),
        };

        Ok(AppConfig {
            port,
            upstream,
            public_base_url,
            upstream_timeout_sec,
            discovery_cache_age_sec,
            cors_origin,
            logging_level,
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            port: self.port,
            upstream: self.upstream.clone(),
            public_base_url: self.public_base_url.clone(),
            upstream_timeout_sec: self.upstream_timeout_sec,
            discovery_cache_age_sec: self.discovery_cache_age_sec,
            cors_origin: self.cors_origin.clone(),
        }
    }
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
