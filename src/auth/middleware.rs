use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde_json::json;

use super::session::{Claims, Role};
use crate::server::AppState;

/// Name of the http-only session cookie mirrored alongside the bearer token.
pub const SESSION_COOKIE: &str = "token";

/// Extractor that requires any valid session (admin or student).
pub struct RequireAuth(pub Claims);

/// Extractor that requires an admin session.
pub struct RequireAdmin(pub Claims);

#[derive(Debug)]
pub enum AuthError {
    MissingAuth,
    InvalidToken,
    NotAdmin,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingAuth => (StatusCode::UNAUTHORIZED, "Not authenticated"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::NotAdmin => (StatusCode::FORBIDDEN, "Admin access required"),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl FromRequestParts<Arc<AppState>> for RequireAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let claims = extract_and_verify(parts, state)?;
        Ok(RequireAuth(claims))
    }
}

impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let claims = extract_and_verify(parts, state)?;

        if claims.role != Role::Admin {
            return Err(AuthError::NotAdmin);
        }

        Ok(RequireAdmin(claims))
    }
}

/// Pulls the raw token out of the request, cookie first, then the
/// `Authorization: Bearer` header.
fn extract_token(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn extract_and_verify(parts: &Parts, state: &Arc<AppState>) -> Result<Claims, AuthError> {
    let raw_token = extract_token(parts).ok_or(AuthError::MissingAuth)?;

    state
        .sessions
        .verify(&raw_token)
        .map_err(|_| AuthError::InvalidToken)
}
