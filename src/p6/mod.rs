mod client;
pub mod models;
pub mod query;

#[cfg(feature = "mock")]
pub use client::MockP6Api;
pub use client::{session_from_set_cookie, P6Api, P6Client, P6Error, P6_SESSION_COOKIE};
pub use models::{ObsNode, P6Credentials, P6Session, ProjectRecord};
pub use query::{ListOptions, ListQuery, ObsSelector, QueryError};
