//! MCP discovery bridge for the Oracle Primavera P6 REST API.
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod config;
pub mod discovery;
pub mod p6;
pub mod server;

// Re-export commonly used types for convenience
pub use p6::{P6Api, P6Client};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
