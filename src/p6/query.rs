//! Building validated list queries for the P6 REST API.
//!
//! P6 list endpoints take `Fields`, `Filter` and `OrderBy` query parameters.
//! Caller input is checked here so a malformed request fails with a clear
//! message instead of an opaque upstream error.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

pub const DEFAULT_OBS_FIELDS: &str = "CreateDate,CreateUser,Description,GUID,LastUpdateDate,LastUpdateUser,Name,ObjectId,ParentObjectId,SequenceNumber";
pub const DEFAULT_PROJECT_FIELDS: &str =
    "Id,Name,StartDate,FinishDate,GUID,Status,OBSObjectId,OBSName,ObjectId";
pub const DEFAULT_ORDER_BY: &str = "Name";
pub const DEFAULT_OBS_LIMIT: usize = 50;
pub const DEFAULT_PROJECT_LIMIT: usize = 100;
pub const MAX_LIMIT: usize = 1000;

lazy_static! {
    static ref FIELD_NAME: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").unwrap();
    static ref ORDER_TERM: Regex =
        Regex::new(r"^[A-Za-z][A-Za-z0-9]*(\s+(?i:asc|desc))?$").unwrap();
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("query parameter '{0}' is required")]
    Missing(&'static str),

    #[error("invalid value for '{name}': {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// A list request that passed validation and can be sent to P6.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub fields: String,
    pub filter: String,
    pub order_by: String,
    /// Applied by the server after the upstream answers.
    pub limit: usize,
}

impl ListQuery {
    pub fn to_params(&self) -> [(&'static str, &str); 3] {
        [
            ("Fields", self.fields.as_str()),
            ("Filter", self.filter.as_str()),
            ("OrderBy", self.order_by.as_str()),
        ]
    }
}

/// Optional shaping knobs shared by every list tool.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListOptions<'a> {
    pub fields: Option<&'a str>,
    pub order_by: Option<&'a str>,
    pub limit: Option<usize>,
}

/// How the caller identifies the OBS whose projects should be listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObsSelector {
    Id(i64),
    Name(String),
}

impl ObsSelector {
    /// `obs_id` wins when both are present.
    pub fn from_params(
        obs_id: Option<&str>,
        obs_name: Option<&str>,
    ) -> Result<ObsSelector, QueryError> {
        if let Some(raw) = obs_id.map(str::trim).filter(|s| !s.is_empty()) {
            return raw
                .parse::<i64>()
                .map(ObsSelector::Id)
                .map_err(|_| QueryError::Invalid {
                    name: "obs_id",
                    reason: format!("expected a numeric ObjectId, got {:?}", raw),
                });
        }
        match obs_name.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => Ok(ObsSelector::Name(name.to_string())),
            None => Err(QueryError::Missing("obs_id or obs_name")),
        }
    }
}

/// Quotes a value for a P6 filter expression.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Fuzzy OBS search by name. `%` and `_` in `q` stay LIKE wildcards.
pub fn obs_by_name(q: Option<&str>, options: ListOptions) -> Result<ListQuery, QueryError> {
    let q = q
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(QueryError::Missing("q"))?;

    Ok(ListQuery {
        fields: parse_fields(options.fields.unwrap_or(DEFAULT_OBS_FIELDS))?,
        filter: format!("Name :like: {}", quote(&format!("%{}%", q))),
        order_by: parse_order_by(options.order_by.unwrap_or(DEFAULT_ORDER_BY))?,
        limit: parse_limit(options.limit, DEFAULT_OBS_LIMIT)?,
    })
}

/// Projects that belong to the given OBS.
pub fn projects_by_obs(
    selector: &ObsSelector,
    options: ListOptions,
) -> Result<ListQuery, QueryError> {
    let filter = match selector {
        ObsSelector::Id(id) => format!("OBSObjectId :eq: {}", id),
        ObsSelector::Name(name) => format!("OBSName :eq: {}", quote(name)),
    };

    Ok(ListQuery {
        fields: parse_fields(options.fields.unwrap_or(DEFAULT_PROJECT_FIELDS))?,
        filter,
        order_by: parse_order_by(options.order_by.unwrap_or(DEFAULT_ORDER_BY))?,
        limit: parse_limit(options.limit, DEFAULT_PROJECT_LIMIT)?,
    })
}

fn parse_fields(raw: &str) -> Result<String, QueryError> {
    let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
    if let Some(bad) = fields.iter().find(|f| !FIELD_NAME.is_match(f)) {
        return Err(QueryError::Invalid {
            name: "fields",
            reason: format!("{:?} is not a P6 field name", bad),
        });
    }
    Ok(fields.join(","))
}

fn parse_order_by(raw: &str) -> Result<String, QueryError> {
    let terms: Vec<String> = raw
        .split(',')
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();
    if let Some(bad) = terms.iter().find(|t| !ORDER_TERM.is_match(t)) {
        return Err(QueryError::Invalid {
            name: "order_by",
            reason: format!("{:?} is not a sortable field", bad),
        });
    }
    Ok(terms.join(", "))
}

fn parse_limit(limit: Option<usize>, default: usize) -> Result<usize, QueryError> {
    match limit {
        None => Ok(default),
        Some(n) if (1..=MAX_LIMIT).contains(&n) => Ok(n),
        Some(n) => Err(QueryError::Invalid {
            name: "limit",
            reason: format!("{} is outside 1..={}", n, MAX_LIMIT),
        }),
    }
}
