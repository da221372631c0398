//! The function-calling tool schema served at `/tool_schema.json`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::tools;

pub const TOOL_SCHEMA_PATH: &str = "/tool_schema.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub tools: Vec<FunctionTool>,
    pub tool_server: ToolServer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionTool {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolServer {
    pub base_url: String,
    pub endpoints: BTreeMap<String, ToolEndpoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolEndpoint {
    pub method: String,
    pub path: String,
}

impl ToolSchema {
    pub fn build(base_url: &str) -> ToolSchema {
        let registry = tools::all();
        ToolSchema {
            tools: registry
                .iter()
                .map(|tool| FunctionTool {
                    kind: "function".to_string(),
                    function: FunctionSpec {
                        name: tool.name.to_string(),
                        description: tool.description.to_string(),
                        parameters: tool.parameters(),
                    },
                })
                .collect(),
            tool_server: ToolServer {
                base_url: base_url.trim_end_matches('/').to_string(),
                endpoints: registry
                    .iter()
                    .map(|tool| {
                        (
                            tool.name.to_string(),
                            ToolEndpoint {
                                method: tool.method.to_string(),
                                path: tool.path.to_string(),
                            },
                        )
                    })
                    .collect(),
            },
        }
    }
}
