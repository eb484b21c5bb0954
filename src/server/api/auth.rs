use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireSession;
use crate::error::Error;
use crate::gateway::Gateway;
use crate::server::AppState;
use crate::server::dto::{LoginRequest, LoginResponse};
use crate::server::response::ApiError;
use crate::server::validation::JsonBody;

pub async fn login(
    State(state): State<Arc<AppState>>,
    Extension(gateway): Extension<Gateway>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> impl IntoResponse {
    let issued = gateway
        .login(req.email, req.password, state.session_ttl)
        .await
        .map_err(|e| match e {
            Error::Unauthorized => ApiError::unauthorized("Invalid email or password"),
            e => ApiError::from(e),
        })?;

    tracing::info!("Session issued for {}", issued.user.email);

    Ok::<_, ApiError>(Json(LoginResponse {
        token: issued.token,
        expires_at: issued.session.expires_at,
        user: issued.user,
    }))
}

pub async fn logout(
    auth: RequireSession,
    Extension(gateway): Extension<Gateway>,
) -> impl IntoResponse {
    gateway
        .revoke_session(auth.session.id)
        .await
        .map_err(ApiError::from)?;
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

/// The account behind the presented token.
pub async fn session(auth: RequireSession) -> impl IntoResponse {
    Json(auth.user)
}
