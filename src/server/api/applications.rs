use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireAdmin;
use crate::gateway::Gateway;
use crate::server::response::{ApiError, StoreResultExt};
use crate::server::validation::{JsonBody, parse_id};
use crate::types::{ApplicationInput, ApplicationUpdate};

pub async fn list_applications(
    _admin: RequireAdmin,
    Extension(gateway): Extension<Gateway>,
) -> impl IntoResponse {
    let applications = gateway.list_applications().await.map_err(ApiError::from)?;
    Ok::<_, ApiError>(Json(applications))
}

/// Public submission endpoint for the team application form.
pub async fn create_application(
    Extension(gateway): Extension<Gateway>,
    JsonBody(input): JsonBody<ApplicationInput>,
) -> impl IntoResponse {
    let application = gateway
        .create_application(input)
        .await
        .map_err(ApiError::from)?;
    Ok::<_, ApiError>((StatusCode::CREATED, Json(application)))
}

pub async fn update_application(
    _admin: RequireAdmin,
    Extension(gateway): Extension<Gateway>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<ApplicationUpdate>,
) -> impl IntoResponse {
    let id = parse_id(&id, "Invalid application ID")?;
    let application = gateway
        .update_application(id, update)
        .await
        .or_not_found("Application not found")?;
    Ok::<_, ApiError>(Json(application))
}
