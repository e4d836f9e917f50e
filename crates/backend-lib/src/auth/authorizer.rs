//! Per-request bearer-token authorization.
//!
//! A request moves `Unauthenticated -> TokenResolved -> Authorized`, or ends in
//! `Rejected` at either step. Resource-scoped handlers additionally call
//! [`Principal::ensure_owns`] before touching a row.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use conch_common::UserId;
use thiserror::Error;

use super::token::TokenService;
use crate::error::AppError;
use crate::AppState;

/// Why a request was refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("unauthorized: missing bearer token")]
    MissingToken,

    #[error("unauthorized: invalid or expired token")]
    UnknownToken,

    #[error("unauthorized: resource belongs to another user")]
    ForeignResource,
}

impl From<Rejection> for AppError {
    fn from(rejection: Rejection) -> Self {
        metrics::counter!(crate::metrics::AUTH_REJECTED).increment(1);
        AppError::Unauthorized(rejection.to_string())
    }
}

/// The authenticated caller of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub token: String,
}

impl Principal {
    /// Refuse access to rows owned by someone else
    pub fn ensure_owns(&self, owner: UserId) -> Result<(), Rejection> {
        if self.user_id == owner {
            Ok(())
        } else {
            tracing::warn!(caller = self.user_id, owner, "access to foreign resource refused");
            Err(Rejection::ForeignResource)
        }
    }
}

#[derive(Debug)]
enum AuthState {
    Unauthenticated,
    TokenResolved(String),
    Authorized(Principal),
    Rejected(Rejection),
}

/// Accepts `Bearer <token>` or a bare `<token>`
pub fn extract_token(header: Option<&str>) -> Result<&str, Rejection> {
    let value = header.map(str::trim).unwrap_or_default();
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .unwrap_or(value)
        .trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(Rejection::MissingToken);
    }
    Ok(token)
}

#[derive(Clone)]
pub struct RequestAuthorizer {
    tokens: TokenService,
}

impl RequestAuthorizer {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }

    /// Resolve the `Authorization` header value to a caller
    pub async fn authorize(&self, header: Option<&str>) -> Result<Principal, AppError> {
        let mut state = AuthState::Unauthenticated;
        loop {
            state = match state {
                AuthState::Unauthenticated => match extract_token(header) {
                    Ok(token) => AuthState::TokenResolved(token.to_string()),
                    Err(rejection) => AuthState::Rejected(rejection),
                },
                AuthState::TokenResolved(token) => match self.tokens.resolve_user(&token).await {
                    Ok(user_id) => AuthState::Authorized(Principal { user_id, token }),
                    Err(AppError::NotFound(_)) => AuthState::Rejected(Rejection::UnknownToken),
                    Err(other) => return Err(other),
                },
                AuthState::Authorized(principal) => return Ok(principal),
                AuthState::Rejected(rejection) => {
                    tracing::debug!(%rejection, "request not authorized");
                    return Err(rejection.into());
                },
            };
        }
    }
}

impl FromRequestParts<Arc<AppState>> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        state.authorizer.authorize(header).await
    }
}
