//! Registry of the tools the server exposes to MCP clients.
//!
//! The manifest and the tool schema are both rendered from this list, and each
//! entry names the route that implements it.

use axum::http::Method;
use serde_json::{json, Value};

use crate::p6::query::{
    DEFAULT_OBS_FIELDS, DEFAULT_OBS_LIMIT, DEFAULT_ORDER_BY, DEFAULT_PROJECT_FIELDS,
    DEFAULT_PROJECT_LIMIT, MAX_LIMIT,
};

pub const LOGIN_PATH: &str = "/login";
pub const OBS_FIND_PATH: &str = "/obs/find";
pub const PROJECTS_BY_OBS_PATH: &str = "/projects/by_obs";

/// A tool definition with the HTTP route backing it.
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub method: Method,
    pub path: &'static str,
    parameters: fn() -> Value,
}

impl ToolDefinition {
    /// JSON schema of the tool arguments.
    pub fn parameters(&self) -> Value {
        (self.parameters)()
    }
}

static TOOLS: [ToolDefinition; 3] = [
    ToolDefinition {
        name: "p6_login",
        description: "Login to Oracle P6 and start a session. Returns a session_id to pass to the other tools.",
        method: Method::POST,
        path: LOGIN_PATH,
        parameters: login_parameters,
    },
    ToolDefinition {
        name: "p6_obs_find",
        description: "Fuzzy search OBS (Organizational Breakdown Structure) by name (LIKE %q%). \
                      '%' and '_' in q are passed through as LIKE wildcards.",
        method: Method::GET,
        path: OBS_FIND_PATH,
        parameters: obs_find_parameters,
    },
    ToolDefinition {
        name: "p6_projects_by_obs",
        description: "List projects that belong to a given OBS, by name or by ObjectId.",
        method: Method::GET,
        path: PROJECTS_BY_OBS_PATH,
        parameters: projects_by_obs_parameters,
    },
];

pub fn all() -> &'static [ToolDefinition] {
    &TOOLS
}

fn login_parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "username": {"type": "string", "description": "P6 username"},
            "password": {"type": "string", "description": "P6 password"},
            "databaseName": {"type": "string", "description": "P6 database name"},
            "remember": {"type": "boolean", "default": false}
        },
        "required": ["username", "password", "databaseName"]
    })
}

fn session_parameter() -> Value {
    json!({
        "type": "string",
        "description": "Session id returned by p6_login. May also be sent as a Bearer token."
    })
}

fn limit_parameter(default: usize) -> Value {
    json!({"type": "integer", "default": default, "minimum": 1, "maximum": MAX_LIMIT})
}

fn obs_find_parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "session_id": session_parameter(),
            "q": {
                "type": "string",
                "description": "Search query for OBS name; '%' matches any run of characters and '_' any single character"
            },
            "fields": {"type": "string", "default": DEFAULT_OBS_FIELDS},
            "order_by": {"type": "string", "default": DEFAULT_ORDER_BY},
            "limit": limit_parameter(DEFAULT_OBS_LIMIT)
        },
        "required": ["q"]
    })
}

fn projects_by_obs_parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "session_id": session_parameter(),
            "obs_name": {"type": "string", "description": "OBS name to search for"},
            "obs_id": {"type": "string", "description": "OBS ObjectId, takes precedence over obs_name"},
            "fields": {"type": "string", "default": DEFAULT_PROJECT_FIELDS},
            "order_by": {"type": "string", "default": DEFAULT_ORDER_BY},
            "limit": limit_parameter(DEFAULT_PROJECT_LIMIT)
        }
    })
}
