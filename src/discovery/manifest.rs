//! The MCP discovery manifest served at `/.well-known/mcp.json`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::tools;

pub const MANIFEST_PATH: &str = "/.well-known/mcp.json";
pub const SCHEMA_VERSION: &str = "1.0";
pub const SERVER_NAME: &str = "primavera-p6-mcp-server";
pub const SERVER_DESCRIPTION: &str = "Oracle Primavera P6 MCP Server for project management";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub schema_version: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub auth: ManifestAuth,
    pub tool_schema_url: String,
    pub tools: Vec<ManifestTool>,
    pub api: ManifestApi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestAuth {
    #[serde(rename = "type")]
    pub kind: String,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestTool {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestApi {
    #[serde(rename = "type")]
    pub kind: String,
    pub base_url: String,
}

impl Manifest {
    /// Builds the manifest for clients that reach the server at `base_url`.
    pub fn build(base_url: &str) -> Manifest {
        let base_url = base_url.trim_end_matches('/');
        Manifest {
            schema_version: SCHEMA_VERSION.to_string(),
            name: SERVER_NAME.to_string(),
            description: SERVER_DESCRIPTION.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            auth: ManifestAuth {
                kind: "none".to_string(),
                instructions: "No credentials are needed to call this server. P6 access is \
                    obtained with the p6_login tool, whose session_id is passed to the other tools."
                    .to_string(),
            },
            tool_schema_url: format!("{}{}", base_url, super::tool_schema::TOOL_SCHEMA_PATH),
            tools: tools::all()
                .iter()
                .map(|tool| ManifestTool {
                    name: tool.name.to_string(),
                    description: tool.description.to_string(),
                    parameters: tool.parameters(),
                })
                .collect(),
            api: ManifestApi {
                kind: "rest".to_string(),
                base_url: base_url.to_string(),
            },
        }
    }
}
