use axum::extract::FromRef;

use crate::p6::P6Api;
use std::sync::Arc;
use std::time::Instant;

use super::{ApiError, ServerConfig};

pub type OptionalP6Api = Option<Arc<dyn P6Api>>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub p6: OptionalP6Api,
}

impl ServerState {
    pub fn new(config: ServerConfig, p6: OptionalP6Api) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            p6,
        }
    }

    /// The upstream client, or the configuration error explaining its absence.
    pub fn p6_api(&self) -> Result<Arc<dyn P6Api>, ApiError> {
        self.p6.clone().ok_or_else(|| {
            ApiError::Configuration(
                self.config
                    .upstream
                    .problem()
                    .unwrap_or_else(|| "P6 upstream is not available".to_string()),
            )
        })
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for OptionalP6Api {
    fn from_ref(input: &ServerState) -> Self {
        input.p6.clone()
    }
}
