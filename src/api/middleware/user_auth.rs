//! Bearer token authentication extractor

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::{AuthError, AuthenticatedIdentity};

/// Extractor that requires a valid bearer token.
///
/// The identity comes from the token alone; the directory is not consulted,
/// so a deactivated salesperson keeps access until the token expires.
#[derive(Debug, Clone)]
pub struct RequireUser(pub AuthenticatedIdentity);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        let claims = state.token_service.verify(token)?;
        debug!(salesperson_id = %claims.subject, "Bearer token accepted");

        Ok(RequireUser(claims.into()))
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// A missing header, a non-UTF-8 value, another scheme and an empty token
/// all reject the same way an invalid token does.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::InvalidToken)?;

    let (scheme, token) = value.split_once(' ').ok_or(AuthError::InvalidToken)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidToken);
    }

    match token.trim() {
        "" => Err(AuthError::InvalidToken),
        token => Ok(token),
    }
}
