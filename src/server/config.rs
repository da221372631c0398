use super::RequestsLoggingLevel;
use crate::config::UpstreamTarget;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub upstream: UpstreamTarget,
    /// Base URL advertised in the discovery documents. When unset it is
    /// derived from the `Host` of each request.
    pub public_base_url: Option<String>,
    pub upstream_timeout_sec: u64,
    pub discovery_cache_age_sec: usize,
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 8000,
            upstream: UpstreamTarget::Missing,
            public_base_url: None,
            upstream_timeout_sec: 10,
            discovery_cache_age_sec: 3600,
            cors_origin: "*".to_string(),
        }
    }
}
