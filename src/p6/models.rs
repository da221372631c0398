//! Typed shapes of the P6 entities the server passes through.
//!
//! P6 field names (PascalCase) are preserved on the wire. Fields the server
//! does not know about, but that the caller asked for via `Fields`, are kept
//! in `extra` so nothing requested is dropped.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque P6 session, the value of the `JSESSIONID` cookie handed out by P6 login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct P6Session(pub String);

impl P6Session {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone)]
pub struct P6Credentials {
    pub username: String,
    pub password: String,
    pub database_name: String,
}

impl fmt::Debug for P6Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("P6Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database_name", &self.database_name)
            .finish()
    }
}

/// An Organizational Breakdown Structure node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObsNode {
    #[serde(
        rename = "ObjectId",
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub object_id: Option<i64>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "Description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        rename = "ParentObjectId",
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_object_id: Option<i64>,
    #[serde(rename = "GUID", default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(
        rename = "SequenceNumber",
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub sequence_number: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A P6 project as returned by the project listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(
        rename = "ObjectId",
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub object_id: Option<i64>,
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "StartDate", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(rename = "FinishDate", default, skip_serializing_if = "Option::is_none")]
    pub finish_date: Option<String>,
    #[serde(rename = "GUID", default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(
        rename = "OBSObjectId",
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub obs_object_id: Option<i64>,
    #[serde(rename = "OBSName", default, skip_serializing_if = "Option::is_none")]
    pub obs_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Str(String),
}

/// P6 serializes object ids as numbers or numeric strings depending on version.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntOrString::Int(value)) => Ok(Some(value)),
        Some(IntOrString::Str(value)) if value.trim().is_empty() => Ok(None),
        Some(IntOrString::Str(value)) => value
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("not an integer id: {:?}", value))),
    }
}
