use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, header::AUTHORIZATION, header::WWW_AUTHENTICATE, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::helpers::{TokenExtractError, extract_token_from_header};
use crate::error::Error;
use crate::server::AppState;
use crate::types::{Session, User};

/// Extractor that requires a live session of any role.
pub struct RequireSession {
    pub session: Session,
    pub user: User,
}

/// Extractor that requires a live session belonging to an admin.
pub struct RequireAdmin(pub User);

#[derive(Debug)]
pub enum AuthError {
    MissingAuth,
    InvalidScheme,
    InvalidToken,
    TokenExpired,
    NotAdmin,
    StoreUnavailable,
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingAuth => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthError::InvalidScheme => (StatusCode::UNAUTHORIZED, "Invalid authorization scheme"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
            AuthError::NotAdmin => (StatusCode::FORBIDDEN, "Admin access required"),
            AuthError::StoreUnavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Store not configured")
            }
            AuthError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let mut response = (status, Json(json!({ "error": message }))).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer realm=\"sleepos\""),
            );
        }

        response
    }
}

impl FromRequestParts<Arc<AppState>> for RequireSession {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let (session, user) = extract_and_validate_session(parts, state).await?;
        Ok(RequireSession { session, user })
    }
}

impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let (_session, user) = extract_and_validate_session(parts, state).await?;

        if !user.role.is_admin() {
            return Err(AuthError::NotAdmin);
        }

        Ok(RequireAdmin(user))
    }
}

async fn extract_and_validate_session(
    parts: &mut Parts,
    state: &Arc<AppState>,
) -> Result<(Session, User), AuthError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let raw_token = extract_token_from_header(auth_header)
        .map_err(|e| match e {
            TokenExtractError::InvalidScheme => AuthError::InvalidScheme,
            TokenExtractError::EmptyToken => AuthError::InvalidToken,
        })?
        .ok_or(AuthError::MissingAuth)?;

    let gateway = state.gateway().ok_or(AuthError::StoreUnavailable)?;

    gateway
        .resolve_session(raw_token)
        .await
        .map_err(|e| match e {
            Error::InvalidTokenFormat | Error::Unauthorized => AuthError::InvalidToken,
            Error::TokenExpired => AuthError::TokenExpired,
            e => {
                tracing::error!("Session validation failed: {e}");
                AuthError::InternalError
            }
        })
}
