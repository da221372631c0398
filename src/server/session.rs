use axum::{
    extract::{FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts, Uri},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::convert::Infallible;

use super::ApiError;
use crate::p6::P6Session;

pub const COOKIE_SESSION_KEY: &str = "p6_session";
pub const QUERY_SESSION_KEY: &str = "session_id";

/// The P6 session presented by the caller.
///
/// Looked up in the `session_id` query parameter, then an
/// `Authorization: Bearer` header, then the `p6_session` cookie. Blank values
/// are skipped so the next source is tried.
#[derive(Debug, PartialEq)]
pub enum CallerSession {
    Missing,
    Present(P6Session),
    /// A value was sent but it cannot be forwarded as a cookie value.
    Malformed,
}

impl CallerSession {
    pub fn require(self) -> Result<P6Session, ApiError> {
        match self {
            CallerSession::Present(session) => Ok(session),
            CallerSession::Missing => Err(ApiError::Unauthenticated(format!(
                "No P6 session: call p6_login and pass its {} to this tool",
                QUERY_SESSION_KEY
            ))),
            CallerSession::Malformed => Err(ApiError::Validation(format!(
                "'{}' is not a valid P6 session id",
                QUERY_SESSION_KEY
            ))),
        }
    }

    fn from_token(token: String) -> CallerSession {
        if is_cookie_value(&token) {
            CallerSession::Present(P6Session(token))
        } else {
            CallerSession::Malformed
        }
    }
}

/// RFC 6265 `cookie-octet`: visible ASCII except `"`, `,`, `;` and `\`.
fn is_cookie_value(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|b| {
            matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
        })
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Deserialize)]
struct SessionQuery {
    session_id: Option<String>,
}

fn extract_session_from_query(uri: &Uri) -> Option<String> {
    Query::<SessionQuery>::try_from_uri(uri)
        .ok()
        .and_then(|Query(q)| q.session_id)
        .and_then(non_blank)
}

fn extract_session_from_headers(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string())
        .and_then(non_blank)
}

fn extract_session_from_cookies(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(COOKIE_SESSION_KEY)
        .map(|c| c.value().to_string())
        .and_then(non_blank)
}

impl<S> FromRequestParts<S> for CallerSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = extract_session_from_query(&parts.uri)
            .or_else(|| extract_session_from_headers(parts))
            .or_else(|| extract_session_from_cookies(parts))
            .map(CallerSession::from_token)
            .unwrap_or(CallerSession::Missing);
        Ok(session)
    }
}
