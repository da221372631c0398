//! Documents MCP clients fetch to discover the server and its tools.

pub mod manifest;
pub mod tool_schema;
pub mod tools;

pub use manifest::{Manifest, MANIFEST_PATH};
pub use tool_schema::{ToolSchema, TOOL_SCHEMA_PATH};
pub use tools::ToolDefinition;

use sha2::{Digest, Sha256};

/// Strong entity tag for a serialized document.
pub fn etag_for(body: &[u8]) -> String {
    format!("\"{:x}\"", Sha256::digest(body))
}

/// True when an `If-None-Match` header value matches `etag`.
pub fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    if_none_match
        .split(',')
        .map(|candidate| candidate.trim().trim_start_matches("W/"))
        .any(|candidate| candidate == "*" || candidate == etag)
}
