mod cors;
mod http_cache;
mod requests_logging;

pub use cors::{
    allow_methods, cors_headers, preflight, ALLOWED_HEADERS, DEFAULT_ALLOWED_METHODS,
    PREFLIGHT_MAX_AGE_SEC, READ_METHODS, WRITE_METHODS,
};
pub use http_cache::{discovery_cache, no_store, DISCOVERY_CSP, DISCOVERY_METHODS};
pub use requests_logging::{log_requests, RequestsLoggingLevel};
