pub mod config;
mod discovery_routes;
pub mod error;
mod http_layers;
mod p6_routes;
pub mod server;
pub(self) mod session;
pub mod state;
#[cfg(test)]
mod testing;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorBody};
pub use http_layers::*;
pub use p6_routes::{ListEnvelope, LoginSuccessResponse};
pub use server::{make_app, HealthResponse, HEALTH_PATH};
#[allow(unused_imports)] // Used by main.rs
pub use server::run_server;
pub use session::{COOKIE_SESSION_KEY, QUERY_SESSION_KEY};
