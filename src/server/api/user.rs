use axum::{Extension, Json, response::IntoResponse};

use crate::auth::RequireAdmin;
use crate::gateway::Gateway;
use crate::server::response::{ApiError, StoreResultExt};
use crate::server::validation::JsonBody;
use crate::types::UserUpdate;

pub async fn get_user(
    _admin: RequireAdmin,
    Extension(gateway): Extension<Gateway>,
) -> impl IntoResponse {
    let user = gateway.get_user().await.or_not_found("User not found")?;
    Ok::<_, ApiError>(Json(user))
}

pub async fn update_user(
    _admin: RequireAdmin,
    Extension(gateway): Extension<Gateway>,
    JsonBody(update): JsonBody<UserUpdate>,
) -> impl IntoResponse {
    let user = gateway
        .update_user(update)
        .await
        .or_not_found("User not found")?;
    Ok::<_, ApiError>(Json(user))
}
