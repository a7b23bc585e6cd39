use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use uuid::Uuid;

pub const CLIENT_ID_COOKIE: &str = "yarikiri_client_id";

/// One year, in seconds.
pub const CLIENT_ID_MAX_AGE: u64 = 60 * 60 * 24 * 365;

/// Browser-scoped owner token. Not an account: whoever presents the cookie
/// owns the goals stored under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId {
    pub value: String,
    pub is_new: bool,
}

impl ClientId {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Short prefix for log lines.
    pub fn short(&self) -> &str {
        self.value.get(..8).unwrap_or(&self.value)
    }

    pub fn cookie_header(&self) -> String {
        format!(
            "{CLIENT_ID_COOKIE}={}; Max-Age={CLIENT_ID_MAX_AGE}; Path=/; SameSite=Lax; HttpOnly",
            self.value
        )
    }

    /// Adds `Set-Cookie` to the response, but only for a freshly minted token.
    pub fn attach(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.is_new {
            if let Ok(value) = HeaderValue::from_str(&self.cookie_header()) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

pub fn resolve_client_id(headers: &HeaderMap) -> ClientId {
    match find_cookie(headers, CLIENT_ID_COOKIE) {
        Some(value) => ClientId {
            value,
            is_new: false,
        },
        None => ClientId {
            value: Uuid::new_v4().to_string(),
            is_new: true,
        },
    }
}

fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for ClientId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(resolve_client_id(&parts.headers))
    }
}
