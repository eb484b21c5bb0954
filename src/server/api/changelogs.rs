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
use crate::types::ChangelogInput;

const INVALID_CHANGELOG_ID: &str = "Invalid changelog ID";
const CHANGELOG_NOT_FOUND: &str = "Changelog not found";

pub async fn list_changelogs(Extension(gateway): Extension<Gateway>) -> impl IntoResponse {
    let changelogs = gateway.list_changelogs().await.map_err(ApiError::from)?;
    Ok::<_, ApiError>(Json(changelogs))
}

pub async fn create_changelog(
    _admin: RequireAdmin,
    Extension(gateway): Extension<Gateway>,
    JsonBody(input): JsonBody<ChangelogInput>,
) -> impl IntoResponse {
    let changelog = gateway.create_changelog(input).await.map_err(ApiError::from)?;
    Ok::<_, ApiError>((StatusCode::CREATED, Json(changelog)))
}

pub async fn update_changelog(
    _admin: RequireAdmin,
    Extension(gateway): Extension<Gateway>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<ChangelogInput>,
) -> impl IntoResponse {
    let id = parse_id(&id, INVALID_CHANGELOG_ID)?;
    let changelog = gateway
        .update_changelog(id, input)
        .await
        .or_not_found(CHANGELOG_NOT_FOUND)?;
    Ok::<_, ApiError>(Json(changelog))
}

pub async fn delete_changelog(
    _admin: RequireAdmin,
    Extension(gateway): Extension<Gateway>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = parse_id(&id, INVALID_CHANGELOG_ID)?;
    gateway
        .delete_changelog(id)
        .await
        .or_not_found(CHANGELOG_NOT_FOUND)?;
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
