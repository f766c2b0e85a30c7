//! Acting user for audit columns.
//!
//! Token validation happens upstream at the identity provider; by the time a request
//! reaches this service the user id is carried in the `X-User-Id` header.

use crate::core::ledger::AuditStamp;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Header carrying the authenticated user id
pub const USER_HEADER: &str = "x-user-id";

/// Recorded when no user header is present
pub const SYSTEM_USER: &str = "sistema";

/// The user on whose behalf a request runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor(pub String);

impl Actor {
    /// Audit stamp for this actor at the current time.
    #[must_use]
    pub fn stamp(&self) -> AuditStamp {
        AuditStamp::now(self.0.clone())
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(SYSTEM_USER);
        Ok(Self(user.to_string()))
    }
}
