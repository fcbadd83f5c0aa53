//! Identity supplied by the upstream auth gate, as request headers.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use uuid::Uuid;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const GUEST_SESSION_HEADER: &str = "x-session-id";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionKey {
    User(String),
    /// Transient visitor session; never persisted.
    Guest(Uuid),
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionKey::User(id) => write!(f, "user:{id}"),
            SessionKey::Guest(id) => write!(f, "guest:{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub key: SessionKey,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl Identity {
    pub fn user(id: &str) -> Self {
        Identity {
            key: SessionKey::User(id.to_string()),
            email: None,
            display_name: None,
        }
    }

    pub fn guest(id: Uuid) -> Self {
        Identity {
            key: SessionKey::Guest(id),
            email: None,
            display_name: None,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match &self.key {
            SessionKey::User(id) => Some(id),
            SessionKey::Guest(_) => None,
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self.key, SessionKey::Guest(_))
    }

    /// Reads the identity headers. A user id wins over a guest session id.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        if let Some(user_id) = header_str(headers, USER_ID_HEADER) {
            return Ok(Identity {
                key: SessionKey::User(user_id),
                email: header_str(headers, USER_EMAIL_HEADER),
                display_name: header_str(headers, USER_NAME_HEADER),
            });
        }

        let guest = header_str(headers, GUEST_SESSION_HEADER).ok_or(AppError::Unauthorized)?;
        let id = Uuid::parse_str(&guest)
            .map_err(|_| AppError::Validation("X-Session-Id must be a UUID".to_string()))?;
        Ok(Identity::guest(id))
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Identity::from_headers(&parts.headers)
    }
}
